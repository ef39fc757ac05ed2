// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Observe local writes while they happen.
//!
//! Hooks are invoked synchronously within the write transaction, before
//! the change is applied. Work that must only happen if the transaction
//! succeeds is deferred by [`TransactionScope::on_complete`].

use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use trackman_core::{Record, RecordFields, Table};

use crate::RecordId;

#[derive(Debug, Clone, Copy)]
pub enum WriteEvent<'a> {
    /// A new record is about to be created.
    ///
    /// The id is `None` if it will be assigned by the store.
    Creating {
        table: Table,
        id: Option<RecordId>,
        record: &'a Record,
    },

    /// An existing record is about to be modified.
    Updating {
        table: Table,
        id: RecordId,
        prior: &'a Record,
        modifications: &'a RecordFields,
    },

    /// An existing record is about to be deleted.
    Deleting {
        table: Table,
        id: RecordId,
        prior: &'a Record,
    },
}

impl WriteEvent<'_> {
    #[must_use]
    pub const fn table(&self) -> Table {
        match self {
            Self::Creating { table, .. }
            | Self::Updating { table, .. }
            | Self::Deleting { table, .. } => *table,
        }
    }
}

/// The outcome of a successfully committed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Committed {
    pub table: Table,
    pub id: RecordId,
}

pub type AfterCommit = Box<dyn FnOnce(&Committed) + Send>;

/// Collects deferred work of hooks during a single write.
#[derive(Default)]
pub struct TransactionScope {
    after_commit: Vec<AfterCommit>,
}

impl fmt::Debug for TransactionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionScope")
            .field("after_commit", &self.after_commit.len())
            .finish()
    }
}

impl TransactionScope {
    /// Defer `callback` until the transaction has been committed.
    ///
    /// Dropped without being invoked if the transaction fails.
    pub fn on_complete(&mut self, callback: impl FnOnce(&Committed) + Send + 'static) {
        self.after_commit.push(Box::new(callback));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.after_commit.is_empty()
    }

    /// Invoke all deferred callbacks in registration order.
    pub fn complete(self, committed: &Committed) {
        let Self { after_commit } = self;
        for callback in after_commit {
            callback(committed);
        }
    }
}

pub trait WriteHook: Send + Sync {
    /// Invoked before the change of `event` is applied.
    ///
    /// Errors are logged and never fail the write.
    fn before_write(
        &self,
        event: &WriteEvent<'_>,
        scope: &mut TransactionScope,
    ) -> anyhow::Result<()>;
}

/// Identifies a registered hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle(u64);

#[derive(Default)]
struct Registrations {
    next_handle: u64,
    hooks: Vec<(HookHandle, Arc<dyn WriteHook>)>,
}

/// Shared registry of write hooks.
///
/// Clones share the same registrations.
#[derive(Clone, Default)]
pub struct HookRegistry {
    registrations: Arc<RwLock<Registrations>>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("len", &self.len())
            .finish()
    }
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hook: Arc<dyn WriteHook>) -> HookHandle {
        let mut registrations = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let handle = HookHandle(registrations.next_handle);
        registrations.next_handle += 1;
        registrations.hooks.push((handle, hook));
        log::debug!("Registered write hook {handle:?}");
        handle
    }

    /// Returns `false` if the hook has already been unregistered.
    pub fn unregister(&self, handle: HookHandle) -> bool {
        let mut registrations = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let len_before = registrations.hooks.len();
        registrations
            .hooks
            .retain(|(registered, _)| *registered != handle);
        let unregistered = registrations.hooks.len() < len_before;
        if unregistered {
            log::debug!("Unregistered write hook {handle:?}");
        }
        unregistered
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .hooks
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notify all registered hooks about an upcoming write.
    ///
    /// Hooks are invoked in registration order. The registry is not
    /// locked while invoking them.
    #[must_use]
    pub fn fire(&self, event: &WriteEvent<'_>) -> TransactionScope {
        let hooks: Vec<_> = self
            .registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .hooks
            .iter()
            .map(|(_, hook)| Arc::clone(hook))
            .collect();
        let mut scope = TransactionScope::default();
        for hook in hooks {
            if let Err(err) = hook.before_write(event, &mut scope) {
                log::error!(
                    "Write hook failed on {table} record: {err:#}",
                    table = event.table()
                );
            }
        }
        scope
    }
}
