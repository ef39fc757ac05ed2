// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Track library for group fitness instructors.
//!
//! Programs, releases, tracks, and workouts are stored in an embedded
//! database and optionally mirrored into a per-user remote document
//! collection. The sub-crates are re-exported behind cargo features.

pub use trackman_core as core;

#[cfg(feature = "repo")]
pub use trackman_repo as repo;

#[cfg(feature = "remote")]
pub use trackman_remote as remote;

#[cfg(feature = "sqlite")]
pub mod storage {
    pub use trackman_repo_sqlite as repo_sqlite;
    pub use trackman_storage_sqlite as sqlite;
}

#[cfg(feature = "backend-embedded")]
pub use trackman_backend_embedded as backend_embedded;

#[cfg(feature = "sync")]
pub use trackman_sync as sync;
