// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::atomic::{AtomicBool, Ordering};

use trackman_core::{RecordId, Table};
use trackman_remote::path::{CollectionPath, DocumentPath, UserId};

/// Marks local writes that originate from the remote store.
///
/// Engaged while remote changes are applied so that the change
/// interceptor does not echo them back. All local writes are
/// serialized, so at most one writer observes or mutates the flag
/// at any time.
#[derive(Debug, Default)]
pub struct LoopGuard {
    engaged: AtomicBool,
}

impl LoopGuard {
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Acquire)
    }

    /// Engage the guard until the returned token is dropped.
    pub(crate) fn engage(&self) -> Engaged<'_> {
        let was_engaged = self.engaged.swap(true, Ordering::AcqRel);
        Engaged {
            guard: self,
            was_engaged,
        }
    }
}

/// Releases the [`LoopGuard`] when dropped, also during unwinding.
#[derive(Debug)]
#[must_use]
pub(crate) struct Engaged<'a> {
    guard: &'a LoopGuard,
    was_engaged: bool,
}

impl Drop for Engaged<'_> {
    fn drop(&mut self) {
        self.guard
            .engaged
            .store(self.was_engaged, Ordering::Release);
    }
}

/// State shared by all parts of a single sync service.
#[derive(Debug)]
pub struct SyncContext {
    user_id: UserId,
    loop_guard: LoopGuard,
    closed: AtomicBool,
}

impl SyncContext {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            loop_guard: LoopGuard::default(),
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub const fn loop_guard(&self) -> &LoopGuard {
        &self.loop_guard
    }

    /// Remote changes must not be applied after the service has been
    /// destroyed, not even those of a batch that is already running.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn collection(&self, table: Table) -> CollectionPath {
        CollectionPath::for_user_table(&self.user_id, table)
    }

    #[must_use]
    pub fn document_path(&self, table: Table, id: RecordId) -> DocumentPath {
        DocumentPath::for_user_record(&self.user_id, table, id)
    }
}
