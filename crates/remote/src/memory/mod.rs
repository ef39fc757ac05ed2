// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-process document store.
//!
//! Behaves like a hosted document database with a single client
//! connection that could be switched offline.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::mpsc;
use trackman_core::QuerySpec;

use crate::{
    BatchWrite, ChangeStream, Error, RemoteStore, Result,
    document::{ChangeBatch, ChangeKind, Document, DocumentChange, DocumentData},
    path::{CollectionPath, DocumentId, DocumentPath},
};

#[derive(Debug)]
struct Subscriber {
    collection: CollectionPath,
    tx: mpsc::UnboundedSender<Result<ChangeBatch>>,
}

#[derive(Debug, Default)]
struct State {
    collections: HashMap<CollectionPath, BTreeMap<DocumentId, DocumentData>>,
    subscribers: Vec<Subscriber>,
    next_auto_id: u64,
}

impl State {
    fn apply(
        &mut self,
        write: BatchWrite,
        server_time: Timestamp,
        changes: &mut Vec<(CollectionPath, DocumentChange)>,
    ) {
        match write {
            BatchWrite::Set { path, document } => {
                let data = document.resolve(server_time);
                let documents = self
                    .collections
                    .entry(path.collection().clone())
                    .or_default();
                let kind = if documents.insert(path.id().clone(), data.clone()).is_some() {
                    ChangeKind::Modified
                } else {
                    ChangeKind::Added
                };
                changes.push((
                    path.collection().clone(),
                    DocumentChange {
                        kind,
                        id: path.id().clone(),
                        data,
                    },
                ));
            }
            BatchWrite::Delete { path } => {
                let Some(data) = self
                    .collections
                    .get_mut(path.collection())
                    .and_then(|documents| documents.remove(path.id()))
                else {
                    return;
                };
                changes.push((
                    path.collection().clone(),
                    DocumentChange {
                        kind: ChangeKind::Removed,
                        id: path.id().clone(),
                        data,
                    },
                ));
            }
        }
    }

    /// Deliver the changes of each collection as a single batch.
    fn publish(&mut self, changes: &[(CollectionPath, DocumentChange)]) {
        if changes.is_empty() {
            return;
        }
        self.subscribers.retain(|subscriber| {
            let batch = ChangeBatch {
                changes: changes
                    .iter()
                    .filter(|(collection, _)| *collection == subscriber.collection)
                    .map(|(_, change)| change.clone())
                    .collect(),
            };
            if batch.is_empty() {
                return !subscriber.tx.is_closed();
            }
            subscriber.tx.send(Ok(batch)).is_ok()
        });
    }
}

#[derive(Debug)]
pub struct MemoryRemoteStore {
    state: Mutex<State>,
    available: AtomicBool,
    write_count: AtomicUsize,
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Default::default(),
            available: AtomicBool::new(true),
            write_count: AtomicUsize::new(0),
        }
    }

    /// Simulate loss or recovery of connectivity.
    ///
    /// Existing subscriptions are kept while offline.
    pub fn set_available(&self, available: bool) {
        log::debug!(
            "Remote store is {}",
            if available { "available" } else { "unavailable" }
        );
        self.available.store(available, Ordering::Release);
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// The number of document writes that have been accepted.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.lock_state();
        state.subscribers.retain(|subscriber| !subscriber.tx.is_closed());
        state.subscribers.len()
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(Error::Unavailable)
        }
    }

    fn commit(&self, writes: Vec<BatchWrite>) -> Result<()> {
        self.check_available()?;
        let num_writes = writes.len();
        let server_time = Timestamp::now();
        let mut changes = Vec::with_capacity(num_writes);
        let mut state = self.lock_state();
        for write in writes {
            log::trace!("Writing document {path}", path = write.path());
            state.apply(write, server_time, &mut changes);
        }
        state.publish(&changes);
        self.write_count.fetch_add(num_writes, Ordering::AcqRel);
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn set_document(&self, path: &DocumentPath, document: Document) -> Result<()> {
        self.commit(vec![BatchWrite::Set {
            path: path.clone(),
            document,
        }])
    }

    async fn add_document(
        &self,
        collection: &CollectionPath,
        document: Document,
    ) -> Result<DocumentId> {
        self.check_available()?;
        let id = {
            let mut state = self.lock_state();
            state.next_auto_id += 1;
            DocumentId::new(format!("auto-{:08}", state.next_auto_id))?
        };
        self.commit(vec![BatchWrite::Set {
            path: collection.document(id.clone()),
            document,
        }])?;
        Ok(id)
    }

    async fn delete_document(&self, path: &DocumentPath) -> Result<()> {
        self.commit(vec![BatchWrite::Delete { path: path.clone() }])
    }

    async fn get_document(&self, path: &DocumentPath) -> Result<DocumentData> {
        self.check_available()?;
        self.lock_state()
            .collections
            .get(path.collection())
            .and_then(|documents| documents.get(path.id()))
            .cloned()
            .ok_or_else(|| Error::NotFound(path.clone()))
    }

    async fn query_documents(
        &self,
        collection: &CollectionPath,
        query: &QuerySpec,
    ) -> Result<Vec<(DocumentId, DocumentData)>> {
        self.check_available()?;
        let state = self.lock_state();
        let Some(documents) = state.collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(query.evaluate(
            documents
                .iter()
                .map(|(id, data)| (id.clone(), data.clone())),
        ))
    }

    async fn commit_batch(&self, writes: Vec<BatchWrite>) -> Result<()> {
        self.commit(writes)
    }

    async fn subscribe(&self, collection: &CollectionPath) -> Result<ChangeStream> {
        self.check_available()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock_state();
        let initial = ChangeBatch {
            changes: state
                .collections
                .get(collection)
                .into_iter()
                .flatten()
                .map(|(id, data)| DocumentChange {
                    kind: ChangeKind::Added,
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect(),
        };
        log::debug!(
            "Subscribing {collection} with {num_documents} document(s)",
            num_documents = initial.len()
        );
        tx.send(Ok(initial))
            .map_err(|_| anyhow::anyhow!("subscription of {collection} closed"))?;
        state.subscribers.push(Subscriber {
            collection: collection.clone(),
            tx,
        });
        Ok(ChangeStream::new(rx))
    }
}
