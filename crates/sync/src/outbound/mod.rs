// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use tokio::sync::mpsc;
use trackman_core::{RecordFields, RecordId, Table, query::ID_FIELD};
use trackman_remote::{
    RemoteStore,
    document::{Document, FieldValue},
    path::DocumentPath,
};

use crate::{
    context::SyncContext,
    status::{StatusObservable, SyncStatus},
};

/// Set on every written document, resolved by the remote store.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Update,
    Delete,
}

/// A committed local write that needs to be propagated.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundIntent {
    pub table: Table,
    pub operation: Operation,
    pub id: Option<RecordId>,

    /// All fields of the record after the write, empty for deletions.
    pub fields: RecordFields,
}

#[derive(Debug)]
pub enum PropagationOutcome {
    Written(DocumentPath),
    Deleted(DocumentPath),

    /// The intent could not be mapped onto a document.
    Dropped,

    Failed {
        path: DocumentPath,
        error: trackman_remote::Error,
    },
}

impl PropagationOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Written(_) | Self::Deleted(_))
    }
}

/// Mirror a single local write in the remote store.
///
/// Documents are always replaced as a whole. Failures are logged and
/// reported, but never retried.
pub async fn propagate(
    remote: &dyn RemoteStore,
    context: &SyncContext,
    intent: OutboundIntent,
) -> PropagationOutcome {
    let OutboundIntent {
        table,
        operation,
        id,
        mut fields,
    } = intent;
    let Some(id) = id else {
        log::error!("Dropping {operation:?} of {table} record without an id");
        return PropagationOutcome::Dropped;
    };
    let path = context.document_path(table, id);
    let result = match operation {
        Operation::Delete => remote.delete_document(&path).await,
        Operation::Add | Operation::Update => {
            fields.remove(ID_FIELD);
            let mut document = Document::from_data(fields);
            document.set(UPDATED_AT_FIELD, FieldValue::ServerTimestamp);
            remote.set_document(&path, document).await
        }
    };
    match result {
        Ok(()) => {
            log::debug!("Propagated {operation:?} of {path}");
            if operation == Operation::Delete {
                PropagationOutcome::Deleted(path)
            } else {
                PropagationOutcome::Written(path)
            }
        }
        Err(error) => {
            log::error!("Failed to propagate {operation:?} of {path}: {error}");
            PropagationOutcome::Failed { path, error }
        }
    }
}

/// Propagate intents one after another until all senders are gone.
pub(crate) async fn run_outbox(
    mut rx: mpsc::UnboundedReceiver<OutboundIntent>,
    remote: Arc<dyn RemoteStore>,
    context: Arc<SyncContext>,
    status: Arc<StatusObservable>,
) {
    log::debug!(
        "Propagating local changes of {user_id}",
        user_id = context.user_id()
    );
    while let Some(intent) = rx.recv().await {
        status.update(SyncStatus::Syncing);
        match propagate(remote.as_ref(), &context, intent).await {
            PropagationOutcome::Written(_) | PropagationOutcome::Deleted(_) => {
                if rx.is_empty() {
                    status.update(SyncStatus::Synced);
                }
            }
            PropagationOutcome::Dropped => {
                status.update(SyncStatus::Error);
            }
            PropagationOutcome::Failed { error, .. } => {
                status.update(SyncStatus::from_remote_error(&error));
            }
        }
    }
    log::debug!(
        "Stopped propagating local changes of {user_id}",
        user_id = context.user_id()
    );
}
