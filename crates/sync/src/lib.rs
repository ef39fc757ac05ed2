// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Keeps the local store and the remote collections of a user in sync.
//!
//! Local writes are observed by a write hook and propagated to the
//! remote store by a single outbox worker. Remote changes are applied
//! to the local store by one listener task per table while the loop
//! guard suppresses their propagation.

use thiserror::Error;
use trackman_repo::prelude::RepoError;

pub mod context;
pub mod inbound;
pub mod interceptor;
pub mod lifecycle;
pub mod outbound;
pub mod status;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Remote(#[from] trackman_remote::Error),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{
        Error, Result,
        context::{LoopGuard, SyncContext},
        inbound::{InboundReport, apply_batch},
        interceptor::ChangeInterceptor,
        lifecycle::{SyncService, SyncSession},
        outbound::{Operation, OutboundIntent, PropagationOutcome, propagate},
        status::{StatusObservable, SyncStatus},
    };
}
