// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroU32;

use diesel::{Connection as _, r2d2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Result;

use super::Storage;

pub type ConnectionManager = r2d2::ConnectionManager<diesel::SqliteConnection>;

pub type ConnectionPool = r2d2::Pool<ConnectionManager>;

pub type PooledConnection = r2d2::PooledConnection<ConnectionManager>;

#[cfg(feature = "tokio")]
pub mod gatekeeper;

pub fn create_connection_pool(storage: &Storage, max_size: NonZeroU32) -> Result<ConnectionPool> {
    let connection = storage.connection_string();
    let max_size = if storage.is_in_memory() {
        if max_size.get() > 1 {
            log::info!("Limiting connection pool for in-memory storage to a single connection");
        }
        1
    } else {
        max_size.get()
    };
    // Establish a test connection before creating the connection pool to fail early.
    // If the given file is inaccessible r2d2 does multiple retries and logs errors
    // instead of failing immediately.
    std::mem::drop(diesel::SqliteConnection::establish(&connection)?);
    let manager = ConnectionManager::new(connection);
    let mut builder = ConnectionPool::builder().max_size(max_size);
    if storage.is_in_memory() {
        // Closing the only connection would discard the database.
        builder = builder
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = builder.build(manager)?;
    Ok(pool)
}

pub fn get_pooled_connection(pool: &ConnectionPool) -> Result<PooledConnection> {
    pool.get().map_err(Into::into)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub max_size: NonZeroU32,

    #[cfg(feature = "tokio")]
    pub gatekeeper: self::gatekeeper::Config,
}
