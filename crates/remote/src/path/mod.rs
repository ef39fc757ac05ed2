// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::str::FromStr;

use derive_more::Display;
use serde_json::Value;
use trackman_core::{RecordId, Table, query::QueryKey};

use crate::{Error, Result};

const SEPARATOR: char = '/';

const USERS_COLLECTION: &str = "users";

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() || segment.contains(SEPARATOR) {
        return Err(Error::InvalidPath(segment.to_owned()));
    }
    Ok(())
}

/// The authenticated owner of a set of collections.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_segment(&id)?;
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_segment(&id)?;
        Ok(Self(id))
    }

    /// The decimal representation of a local record id.
    #[must_use]
    pub fn from_record_id(id: RecordId) -> Self {
        Self(id.to_string())
    }

    /// Parse the local record id.
    ///
    /// Accepts any decimal number with an optional sign, including
    /// leading zeros. Ids that are not numeric or exceed the range of
    /// [`RecordId`] are rejected.
    #[must_use]
    pub fn parse_record_id(&self) -> Option<RecordId> {
        self.0.parse().ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl QueryKey for DocumentId {
    fn to_value(&self) -> Value {
        Value::from(self.as_str())
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// A collection of documents, e.g. `users/u1/tracks`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct CollectionPath(String);

impl CollectionPath {
    #[must_use]
    pub fn for_user_table(user_id: &UserId, table: Table) -> Self {
        Self(format!(
            "{USERS_COLLECTION}{SEPARATOR}{user_id}{SEPARATOR}{table}"
        ))
    }

    #[must_use]
    pub fn document(&self, id: DocumentId) -> DocumentPath {
        DocumentPath {
            collection: self.clone(),
            id,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single document, e.g. `users/u1/tracks/7`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{collection}/{id}")]
pub struct DocumentPath {
    collection: CollectionPath,
    id: DocumentId,
}

impl DocumentPath {
    #[must_use]
    pub fn for_user_record(user_id: &UserId, table: Table, id: RecordId) -> Self {
        CollectionPath::for_user_table(user_id, table).document(DocumentId::from_record_id(id))
    }

    #[must_use]
    pub const fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    #[must_use]
    pub const fn id(&self) -> &DocumentId {
        &self.id
    }
}

#[cfg(test)]
mod tests;
