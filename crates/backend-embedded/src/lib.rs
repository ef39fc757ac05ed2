// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The embedded local database and the use cases operating on it.
//!
//! All use cases write through [`trackman_repo::prelude::LocalStore`] and
//! are therefore observed by registered write hooks.

use semval::prelude::*;
use thiserror::Error;
use trackman_repo::prelude::RepoError;
use trackman_storage_sqlite::Error as StorageError;

pub mod program;
pub mod release;
pub mod settings;
pub mod storage;
pub mod track;
pub mod workout;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected input, e.g. an invalid or duplicate entity.
    #[error(transparent)]
    Input(anyhow::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn validate_input<T>(input: &T) -> Result<()>
where
    T: Validate,
    T::Invalidity: std::fmt::Debug,
{
    input
        .validate()
        .map_err(|err| Error::Input(anyhow::anyhow!("invalid input: {err:?}")))
}

pub mod prelude {
    pub use trackman_repo::prelude::{LocalStore, RepoError};

    pub use super::{
        Error, Result,
        storage::{DatabaseConfig, LocalDatabase},
    };

    #[cfg(test)]
    pub(crate) mod tests {
        use super::{DatabaseConfig, LocalDatabase};

        pub(crate) fn establish_database() -> LocalDatabase {
            LocalDatabase::commission(&DatabaseConfig::in_memory()).expect("in-memory database")
        }
    }
}
