// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use trackman_core::{Record, Table};
use trackman_remote::{
    ChangeStream,
    document::{ChangeBatch, ChangeKind, DocumentChange},
};
use trackman_repo::prelude::*;

use crate::{
    context::SyncContext,
    status::{StatusObservable, SyncStatus},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InboundReport {
    /// Created or replaced records.
    pub stored: usize,

    pub deleted: usize,

    /// Documents with an invalid id or contents.
    pub skipped: usize,
}

/// Apply remote changes of a table to the local store.
///
/// All changes are applied in order within a single exclusive write
/// while the loop guard is engaged. A store error aborts the remaining
/// changes of the batch. So does closing the context, which fails with
/// [`RepoError::Aborted`].
pub async fn apply_batch<S: LocalStore>(
    store: &S,
    context: &Arc<SyncContext>,
    table: Table,
    batch: ChangeBatch,
) -> RepoResult<InboundReport> {
    let context = Arc::clone(context);
    store
        .write(move |store| {
            let _engaged = context.loop_guard().engage();
            let mut report = InboundReport::default();
            for DocumentChange { kind, id, data } in batch.changes {
                if context.is_closed() {
                    log::debug!("Aborting changes of {table} after closing");
                    return Err(RepoError::Aborted);
                }
                let Some(record_id) = id.parse_record_id() else {
                    log::error!("Skipping {table} document with invalid id \"{id}\"");
                    report.skipped += 1;
                    continue;
                };
                match kind {
                    ChangeKind::Added | ChangeKind::Modified => {
                        let record = match Record::from_fields(table, data) {
                            Ok(record) => record,
                            Err(err) => {
                                log::error!("Skipping {table} document {id}: {err}");
                                report.skipped += 1;
                                continue;
                            }
                        };
                        store.put(record_id, record)?;
                        report.stored += 1;
                    }
                    ChangeKind::Removed => {
                        if store.delete(table, record_id)? {
                            report.deleted += 1;
                        } else {
                            log::debug!("Removed {table} record {record_id} does not exist");
                        }
                    }
                }
            }
            Ok(report)
        })
        .await
}

/// Apply all batches of the stream until it is closed.
pub(crate) async fn run_listener<S: LocalStore>(
    store: Arc<S>,
    context: Arc<SyncContext>,
    table: Table,
    mut stream: ChangeStream,
    status: Arc<StatusObservable>,
) {
    let collection = context.collection(table);
    while let Some(next_batch) = stream.next_batch().await {
        if context.is_closed() {
            break;
        }
        let batch = match next_batch {
            Ok(batch) => batch,
            Err(err) => {
                log::error!("Failed to receive changes of {collection}: {err}");
                status.update(SyncStatus::from_remote_error(&err));
                continue;
            }
        };
        if batch.is_empty() {
            continue;
        }
        log::debug!(
            "Applying {num_changes} change(s) of {collection}",
            num_changes = batch.len()
        );
        match apply_batch(store.as_ref(), &context, table, batch).await {
            Ok(report) => {
                log::debug!("Applied changes of {collection}: {report:?}");
            }
            Err(RepoError::Aborted) if context.is_closed() => {
                break;
            }
            Err(err) => {
                log::error!("Failed to apply changes of {collection}: {err}");
                status.update(SyncStatus::Error);
            }
        }
    }
    log::debug!("Subscription of {collection} closed");
}
