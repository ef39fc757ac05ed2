// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use trackman_core::{RecordFields, record::merge_fields};
use trackman_repo::prelude::*;

use crate::{
    context::SyncContext,
    outbound::{Operation, OutboundIntent},
};

pub type OutboxSender = mpsc::UnboundedSender<OutboundIntent>;

/// Turns local writes into outbound intents.
///
/// Intents are only issued after the write has been committed and
/// never while the loop guard is engaged.
#[derive(Debug)]
pub struct ChangeInterceptor {
    context: Arc<SyncContext>,
    outbox: Mutex<Option<OutboxSender>>,
}

impl ChangeInterceptor {
    #[must_use]
    pub fn new(context: Arc<SyncContext>, outbox: OutboxSender) -> Self {
        Self {
            context,
            outbox: Mutex::new(Some(outbox)),
        }
    }

    /// Stop issuing intents.
    ///
    /// Intents of writes that are already in progress are still
    /// delivered.
    pub fn close(&self) {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn outbox(&self) -> Option<OutboxSender> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl WriteHook for ChangeInterceptor {
    fn before_write(
        &self,
        event: &WriteEvent<'_>,
        scope: &mut TransactionScope,
    ) -> anyhow::Result<()> {
        let table = event.table();
        if self.context.loop_guard().is_engaged() {
            log::trace!("Ignoring {table} write from the remote store");
            return Ok(());
        }
        let Some(outbox) = self.outbox() else {
            log::debug!("Ignoring {table} write after closing the outbox");
            return Ok(());
        };
        let (operation, fields) = match *event {
            WriteEvent::Creating { record, .. } => (Operation::Add, record.to_fields()?),
            WriteEvent::Updating {
                prior,
                modifications,
                ..
            } => {
                let mut fields = prior.to_fields()?;
                merge_fields(&mut fields, modifications);
                (Operation::Update, fields)
            }
            WriteEvent::Deleting { .. } => (Operation::Delete, RecordFields::new()),
        };
        scope.on_complete(move |committed| {
            let intent = OutboundIntent {
                table,
                operation,
                id: Some(committed.id),
                fields,
            };
            if outbox.send(intent).is_err() {
                log::warn!(
                    "Discarding {operation:?} of {table} record {id}: outbox closed",
                    id = committed.id,
                );
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests;
