// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Program, RecordId, Release, Table, Track, Workout};

/// Field names and values of a record, i.e. a JSON object.
///
/// This is the shape shared by local modifications and remote
/// documents. The record id is never part of the fields.
pub type RecordFields = serde_json::Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum RecordFieldsError {
    #[error("{table} record is not an object")]
    NotAnObject { table: Table },

    #[error("malformed {table} record: {source}")]
    Malformed {
        table: Table,
        #[source]
        source: serde_json::Error,
    },
}

/// Entity types that are stored as records of a particular table.
pub trait RecordKind: Into<Record> + TryFrom<Record, Error = Record> {
    type Id: Copy + From<RecordId> + Into<RecordId>;

    const TABLE: Table;
}

/// A record of any table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Program(Program),
    Release(Release),
    Track(Track),
    Workout(Workout),
}

impl Record {
    #[must_use]
    pub const fn table(&self) -> Table {
        match self {
            Self::Program(_) => Table::Programs,
            Self::Release(_) => Table::Releases,
            Self::Track(_) => Table::Tracks,
            Self::Workout(_) => Table::Workouts,
        }
    }

    pub fn to_fields(&self) -> Result<RecordFields, RecordFieldsError> {
        let table = self.table();
        match self {
            Self::Program(inner) => encode_fields(table, inner),
            Self::Release(inner) => encode_fields(table, inner),
            Self::Track(inner) => encode_fields(table, inner),
            Self::Workout(inner) => encode_fields(table, inner),
        }
    }

    /// Decode a record of the given table.
    ///
    /// Unknown fields like `id` or `updatedAt` are ignored.
    pub fn from_fields(table: Table, fields: RecordFields) -> Result<Self, RecordFieldsError> {
        let record = match table {
            Table::Programs => Self::Program(decode_fields(table, fields)?),
            Table::Releases => Self::Release(decode_fields(table, fields)?),
            Table::Tracks => Self::Track(decode_fields(table, fields)?),
            Table::Workouts => Self::Workout(decode_fields(table, fields)?),
        };
        Ok(record)
    }

    /// Apply a partial modification, field by field.
    pub fn merged(&self, modifications: &RecordFields) -> Result<Self, RecordFieldsError> {
        let mut fields = self.to_fields()?;
        merge_fields(&mut fields, modifications);
        Self::from_fields(self.table(), fields)
    }
}

/// Overwrite the fields of `target` with all `modifications`.
pub fn merge_fields(target: &mut RecordFields, modifications: &RecordFields) {
    for (key, value) in modifications {
        target.insert(key.clone(), value.clone());
    }
}

fn encode_fields<T: Serialize>(table: Table, inner: &T) -> Result<RecordFields, RecordFieldsError> {
    match serde_json::to_value(inner) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(RecordFieldsError::NotAnObject { table }),
        Err(source) => Err(RecordFieldsError::Malformed { table, source }),
    }
}

fn decode_fields<T: DeserializeOwned>(
    table: Table,
    fields: RecordFields,
) -> Result<T, RecordFieldsError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|source| RecordFieldsError::Malformed { table, source })
}
