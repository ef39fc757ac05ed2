// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Per-user remote document store.
//!
//! Every user owns one collection per table, addressed as
//! `users/{user}/{table}`. Documents are plain JSON objects keyed by
//! the decimal string of the local record id.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use trackman_core::QuerySpec;

pub mod document;
pub mod memory;
pub mod path;

use self::{
    document::{ChangeBatch, Document, DocumentData},
    path::{CollectionPath, DocumentId, DocumentPath},
};

#[derive(Error, Debug)]
pub enum Error {
    /// The store could not be reached.
    #[error("remote store unavailable")]
    Unavailable,

    #[error("permission denied")]
    PermissionDenied,

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("document not found: {0}")]
    NotFound(DocumentPath),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Connectivity failures that are expected to resolve themselves.
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// Status code as reported by hosted document databases.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::PermissionDenied => "permission-denied",
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound(_) => "not-found",
            Self::InvalidPath(_) => "invalid-argument",
            Self::Other(_) => "unknown",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait OptionalResult<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalResult<T> for Result<T> {
    fn optional(self) -> Result<Option<T>> {
        self.map(Some).or_else(|err| {
            if matches!(err, Error::NotFound(_)) {
                Ok(None)
            } else {
                Err(err)
            }
        })
    }
}

/// A single write of an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchWrite {
    Set { path: DocumentPath, document: Document },
    Delete { path: DocumentPath },
}

impl BatchWrite {
    #[must_use]
    pub const fn path(&self) -> &DocumentPath {
        match self {
            Self::Set { path, .. } | Self::Delete { path } => path,
        }
    }
}

/// Live query results of a single collection.
///
/// Dropping the stream unsubscribes.
#[derive(Debug)]
pub struct ChangeStream {
    rx: mpsc::UnboundedReceiver<Result<ChangeBatch>>,
}

impl ChangeStream {
    #[must_use]
    pub fn new(rx: mpsc::UnboundedReceiver<Result<ChangeBatch>>) -> Self {
        Self { rx }
    }

    /// Wait for the next batch of changes.
    ///
    /// The first batch reports all existing documents as added.
    /// Returns `None` after the store has closed the subscription.
    pub async fn next_batch(&mut self) -> Option<Result<ChangeBatch>> {
        self.rx.recv().await
    }
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create or fully replace a document.
    async fn set_document(&self, path: &DocumentPath, document: Document) -> Result<()>;

    /// Create a document with an id assigned by the store.
    async fn add_document(
        &self,
        collection: &CollectionPath,
        document: Document,
    ) -> Result<DocumentId>;

    /// Deleting a nonexistent document succeeds.
    async fn delete_document(&self, path: &DocumentPath) -> Result<()>;

    async fn get_document(&self, path: &DocumentPath) -> Result<DocumentData>;

    /// The table of the query is implied by the collection.
    async fn query_documents(
        &self,
        collection: &CollectionPath,
        query: &QuerySpec,
    ) -> Result<Vec<(DocumentId, DocumentData)>>;

    /// Apply all writes atomically.
    ///
    /// Subscribers receive the writes of each collection as one batch.
    async fn commit_batch(&self, writes: Vec<BatchWrite>) -> Result<()>;

    async fn subscribe(&self, collection: &CollectionPath) -> Result<ChangeStream>;
}

pub mod prelude {
    pub use super::{
        BatchWrite, ChangeStream, Error, OptionalResult as _, RemoteStore, Result,
        document::{ChangeBatch, ChangeKind, Document, DocumentChange, DocumentData, FieldValue},
        path::{CollectionPath, DocumentId, DocumentPath, UserId},
    };
}
