// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{future::Future, num::NonZeroU32};

use serde::{Deserialize, Serialize};
use trackman_repo::prelude::*;
use trackman_repo_sqlite::Connection;
use trackman_storage_sqlite::connection::{
    Config as ConnectionConfig, Storage,
    pool::{
        Config as PoolConfig, create_connection_pool, gatekeeper::Config as GatekeeperConfig,
        gatekeeper::Gatekeeper, get_pooled_connection,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub connection: ConnectionConfig,
    pub migrate_schema: bool,
}

impl DatabaseConfig {
    /// A private, volatile database with an up-to-date schema.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            connection: ConnectionConfig {
                storage: Storage::InMemory,
                pool: PoolConfig {
                    max_size: NonZeroU32::MIN,
                    gatekeeper: GatekeeperConfig::default(),
                },
            },
            migrate_schema: true,
        }
    }
}

pub fn commission_database(config: &DatabaseConfig) -> crate::Result<Gatekeeper> {
    // The maximum size of the pool defines the maximum number of
    // allowed readers while writers require exclusive access.
    log::info!(
        "Creating SQLite connection pool of max. size {max_size} for {storage}",
        max_size = config.connection.pool.max_size,
        storage = config.connection.storage,
    );
    let connection_pool =
        create_connection_pool(&config.connection.storage, config.connection.pool.max_size)?;

    log::info!("Initializing database");
    trackman_repo_sqlite::initialize_database(&mut *get_pooled_connection(&connection_pool)?)
        .map_err(trackman_storage_sqlite::Error::from)?;

    if config.migrate_schema {
        log::info!("Migrating database schema");
        let mut connection = get_pooled_connection(&connection_pool)?;
        let migrations = trackman_repo_sqlite::run_migrations(&mut connection)
            .map_err(|err| anyhow::anyhow!("failed to migrate database schema: {err}"))?;
        for version in migrations {
            log::info!("Applied database migration {version}");
        }
    }

    let gatekeeper = Gatekeeper::new(connection_pool, config.connection.pool.gatekeeper);

    Ok(gatekeeper)
}

fn storage_error(err: trackman_storage_sqlite::Error) -> RepoError {
    anyhow::Error::from(err).into()
}

/// The local store, backed by an embedded `SQLite` database.
#[allow(missing_debug_implementations)]
pub struct LocalDatabase {
    gatekeeper: Gatekeeper,
    hooks: HookRegistry,
}

impl LocalDatabase {
    #[must_use]
    pub fn new(gatekeeper: Gatekeeper) -> Self {
        Self {
            gatekeeper,
            hooks: HookRegistry::new(),
        }
    }

    pub fn commission(config: &DatabaseConfig) -> crate::Result<Self> {
        commission_database(config).map(Self::new)
    }

    #[must_use]
    pub const fn gatekeeper(&self) -> &Gatekeeper {
        &self.gatekeeper
    }

    /// Reject all subsequent requests.
    pub fn decommission(&self) {
        self.gatekeeper.decommission();
    }
}

impl LocalStore for LocalDatabase {
    fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    fn read<F, T>(&self, read: F) -> impl Future<Output = RepoResult<T>> + Send
    where
        F: FnOnce(&mut dyn RecordReader) -> RepoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        async move {
            self.gatekeeper
                .spawn_blocking_read_task(move |mut pooled_connection| {
                    let mut connection = Connection::new(&mut pooled_connection);
                    read(&mut connection)
                })
                .await
                .map_err(storage_error)?
        }
    }

    fn write<F, T>(&self, write: F) -> impl Future<Output = RepoResult<T>> + Send
    where
        F: FnOnce(&mut dyn RecordStore) -> RepoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let hooks = self.hooks.clone();
        async move {
            self.gatekeeper
                .spawn_blocking_write_task(move |mut pooled_connection| {
                    let mut connection = Connection::new(&mut pooled_connection);
                    let mut store = HookedRepo::new(&mut connection, &hooks);
                    write(&mut store)
                })
                .await
                .map_err(storage_error)?
        }
    }
}
