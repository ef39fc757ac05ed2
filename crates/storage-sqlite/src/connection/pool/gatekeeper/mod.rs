// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    num::NonZeroU64,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::{sync::RwLock, task::spawn_blocking, time::timeout};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

use super::{ConnectionPool, PooledConnection, get_pooled_connection};

/// Manage database connections for asynchronous tasks
///
/// Only a single writer is allowed to access the `SQLite` database
/// at any given time while readers may run concurrently. Access is
/// granted until the blocking task has finished, even if the awaiting
/// future is dropped early.
#[allow(missing_debug_implementations)]
pub struct Gatekeeper {
    connection_pool: Arc<RwLock<ConnectionPool>>,
    acquire_read_timeout: Duration,
    acquire_write_timeout: Duration,
    request_counter_state: Arc<RequestCounterState>,
    decommissioned: AtomicBool,
}

#[derive(Debug, Default)]
struct RequestCounterState {
    read_count: AtomicUsize,
    write_count: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestCounterMode {
    Read,
    Write,
}

impl RequestCounterMode {
    const fn counter(self, state: &RequestCounterState) -> &AtomicUsize {
        match self {
            Self::Read => &state.read_count,
            Self::Write => &state.write_count,
        }
    }
}

struct RequestCounterScope {
    shared_state: Arc<RequestCounterState>,
    mode: RequestCounterMode,
}

impl RequestCounterScope {
    fn new(shared_state: Arc<RequestCounterState>, mode: RequestCounterMode) -> Self {
        let pending_before = mode.counter(&shared_state).fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "Starting {mode:?} request: {pending} pending request(s)",
            pending = pending_before + 1
        );
        Self { shared_state, mode }
    }
}

impl Drop for RequestCounterScope {
    fn drop(&mut self) {
        let Self { shared_state, mode } = self;
        let pending_before = mode.counter(shared_state).fetch_sub(1, Ordering::Relaxed);
        debug_assert!(pending_before > 0);
        log::debug!(
            "Finished {mode:?} request: {pending} pending request(s)",
            pending = pending_before - 1
        );
    }
}

impl Gatekeeper {
    #[must_use]
    pub fn new(connection_pool: ConnectionPool, config: Config) -> Self {
        let Config {
            acquire_read_timeout_millis,
            acquire_write_timeout_millis,
        } = config;
        let acquire_read_timeout = Duration::from_millis(acquire_read_timeout_millis.get());
        let acquire_write_timeout = Duration::from_millis(acquire_write_timeout_millis.get());
        Self {
            connection_pool: Arc::new(RwLock::new(connection_pool)),
            acquire_read_timeout,
            acquire_write_timeout,
            request_counter_state: Default::default(),
            decommissioned: AtomicBool::new(false),
        }
    }

    /// Reject all subsequent requests.
    pub fn decommission(&self) {
        self.decommissioned.store(true, Ordering::Release);
    }

    fn check_not_decommissioned(&self) -> Result<()> {
        if self.decommissioned.load(Ordering::Acquire) {
            return Err(Error::TaskTimeout {
                reason: "connection pool has been decommissioned".to_owned(),
            });
        }
        Ok(())
    }

    pub async fn spawn_blocking_read_task<H, R>(&self, connection_handler: H) -> Result<R>
    where
        H: FnOnce(PooledConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.check_not_decommissioned()?;
        let _request_counter_scope = RequestCounterScope::new(
            Arc::clone(&self.request_counter_state),
            RequestCounterMode::Read,
        );
        let guard = timeout(
            self.acquire_read_timeout,
            Arc::clone(&self.connection_pool).read_owned(),
        )
        .await
        .map_err(|_| Error::TaskTimeout {
            reason: "database is locked".to_owned(),
        })?;
        self.check_not_decommissioned()?;
        let connection = get_pooled_connection(&guard)?;
        spawn_blocking(move || {
            let _guard = guard;
            connection_handler(connection)
        })
        .await
        .map_err(Error::TaskScheduling)
    }

    pub async fn spawn_blocking_write_task<H, R>(&self, connection_handler: H) -> Result<R>
    where
        H: FnOnce(PooledConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.check_not_decommissioned()?;
        let _request_counter_scope = RequestCounterScope::new(
            Arc::clone(&self.request_counter_state),
            RequestCounterMode::Write,
        );
        let guard = timeout(
            self.acquire_write_timeout,
            Arc::clone(&self.connection_pool).write_owned(),
        )
        .await
        .map_err(|_| Error::TaskTimeout {
            reason: "database is locked".to_owned(),
        })?;
        self.check_not_decommissioned()?;
        let connection = get_pooled_connection(&guard)?;
        spawn_blocking(move || {
            // Exclusive access ends when the task has finished.
            let _guard = guard;
            connection_handler(connection)
        })
        .await
        .map_err(Error::TaskScheduling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub acquire_read_timeout_millis: NonZeroU64,
    pub acquire_write_timeout_millis: NonZeroU64,
}

impl Config {
    pub const DEFAULT_ACQUIRE_READ_TIMEOUT_MILLIS: NonZeroU64 = NonZeroU64::new(10_000).unwrap();
    pub const DEFAULT_ACQUIRE_WRITE_TIMEOUT_MILLIS: NonZeroU64 = NonZeroU64::new(30_000).unwrap();
}

impl Default for Config {
    fn default() -> Self {
        Self {
            acquire_read_timeout_millis: Self::DEFAULT_ACQUIRE_READ_TIMEOUT_MILLIS,
            acquire_write_timeout_millis: Self::DEFAULT_ACQUIRE_WRITE_TIMEOUT_MILLIS,
        }
    }
}

#[cfg(test)]
mod tests;
