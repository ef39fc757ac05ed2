// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, path::PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod pool;

const IN_MEMORY_STORAGE: &str = ":memory:";

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Storage {
    /// A private, volatile database.
    ///
    /// Each connection would open a separate database. Connection
    /// pools for in-memory storage are therefore limited to a
    /// single connection.
    InMemory,
    File { path: PathBuf },
}

impl Storage {
    #[must_use]
    pub const fn is_in_memory(&self) -> bool {
        matches!(self, Self::InMemory)
    }

    /// The connection string for `SQLite`.
    #[must_use]
    pub fn connection_string(&self) -> String {
        match self {
            Self::InMemory => IN_MEMORY_STORAGE.to_owned(),
            Self::File { path } => path.display().to_string(),
        }
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory => f.write_str(IN_MEMORY_STORAGE),
            Self::File { path } => fmt::Display::fmt(&path.display(), f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub storage: Storage,
    pub pool: pool::Config,
}
