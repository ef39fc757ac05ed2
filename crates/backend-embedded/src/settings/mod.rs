// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fs,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use trackman_storage_sqlite::connection::{
    Config as ConnectionConfig, Storage,
    pool::{Config as PoolConfig, gatekeeper::Config as GatekeeperConfig},
};

use crate::storage::DatabaseConfig;

pub const FILE_NAME: &str = "trackman_settings";

pub const FILE_SUFFIX: &str = "ron";

pub const DEFAULT_DATABASE_FILE_NAME: &str = "trackman";

pub const DEFAULT_DATABASE_FILE_SUFFIX: &str = "sqlite";

const DEFAULT_MAX_CONNECTIONS: NonZeroU32 = NonZeroU32::new(8).unwrap();

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// File path of the `SQLite` database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_file_path: Option<PathBuf>,
}

impl Settings {
    /// Load saved settings and fill in defaults.
    pub fn restore_from_parent_dir(parent_dir: &Path) -> Self {
        log::info!("Loading saved settings from: {}", parent_dir.display());
        let mut settings = Self::load(parent_dir)
            .map_err(|err| {
                log::warn!("Failed to load saved settings: {err}");
            })
            .unwrap_or_default();
        if settings.database_file_path.is_none() {
            let database_file_path = default_database_file_path(parent_dir.to_path_buf());
            log::info!(
                "Using default SQLite database: {}",
                database_file_path.display()
            );
            settings.database_file_path = Some(database_file_path);
        }
        settings
    }

    pub fn load(parent_dir: &Path) -> anyhow::Result<Self> {
        let file_path = new_settings_file_path(parent_dir.to_path_buf());
        log::info!("Loading settings from file: {}", file_path.display());
        match fs::read(&file_path) {
            Ok(bytes) => ron::de::from_bytes(&bytes).map_err(Into::into),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Default::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, parent_dir: &Path) -> anyhow::Result<()> {
        let file_path = new_settings_file_path(parent_dir.to_path_buf());
        log::info!("Saving current settings into file: {}", file_path.display());
        let text = ron::ser::to_string_pretty(self, Default::default())?;
        if let Some(parent_path) = file_path.parent() {
            fs::create_dir_all(parent_path)?;
        }
        fs::write(&file_path, text)?;
        Ok(())
    }

    pub async fn save_spawn_blocking(self, parent_dir: PathBuf) -> anyhow::Result<()> {
        match tokio::task::spawn_blocking(move || self.save(&parent_dir)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                anyhow::bail!("failed to save: {err}");
            }
            Err(err) => {
                anyhow::bail!("failed to join blocking task after saving: {err}");
            }
        }
    }

    pub fn create_database_config(&self) -> anyhow::Result<DatabaseConfig> {
        let path = self
            .database_file_path
            .clone()
            .ok_or_else(|| anyhow::anyhow!("missing database file path"))?;
        let config = DatabaseConfig {
            connection: ConnectionConfig {
                storage: Storage::File { path },
                pool: PoolConfig {
                    max_size: DEFAULT_MAX_CONNECTIONS,
                    gatekeeper: GatekeeperConfig::default(),
                },
            },
            migrate_schema: true,
        };
        Ok(config)
    }
}

#[must_use]
fn new_settings_file_path(parent_dir: PathBuf) -> PathBuf {
    let mut path_buf = parent_dir;
    path_buf.push(FILE_NAME);
    path_buf.set_extension(FILE_SUFFIX);
    path_buf
}

#[must_use]
fn default_database_file_path(parent_dir: PathBuf) -> PathBuf {
    let mut path_buf = parent_dir;
    path_buf.push(DEFAULT_DATABASE_FILE_NAME);
    path_buf.set_extension(DEFAULT_DATABASE_FILE_SUFFIX);
    path_buf
}

#[cfg(test)]
mod tests;
