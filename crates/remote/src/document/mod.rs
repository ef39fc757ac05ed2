// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde_json::Value;
use trackman_core::RecordFields;

use crate::path::DocumentId;

/// The contents of a stored document.
pub type DocumentData = RecordFields;

/// The value of a field in a write request.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(Value),

    /// Replaced by the time of the write, as determined by the store.
    ServerTimestamp,
}

impl From<Value> for FieldValue {
    fn from(from: Value) -> Self {
        Self::Value(from)
    }
}

/// The payload of a write request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_data(data: DocumentData) -> Self {
        data.into_iter()
            .map(|(name, value)| (name, FieldValue::Value(value)))
            .collect()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Replace all server timestamps with the given time.
    #[must_use]
    pub fn resolve(self, server_time: Timestamp) -> DocumentData {
        self.fields
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    FieldValue::Value(value) => value,
                    FieldValue::ServerTimestamp => Value::from(server_time.to_string()),
                };
                (name, value)
            })
            .collect()
    }
}

impl FromIterator<(String, FieldValue)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub kind: ChangeKind,
    pub id: DocumentId,

    /// The current contents, or the last known contents if removed.
    pub data: DocumentData,
}

/// Changes of a single collection, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeBatch {
    pub changes: Vec<DocumentChange>,
}

impl ChangeBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }
}
