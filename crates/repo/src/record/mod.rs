// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::future::Future;

use trackman_core::{QuerySpec, Record, RecordFields, RecordKind, Table};

use crate::{
    RecordId,
    hooks::HookRegistry,
    prelude::{RepoError, RepoResult},
};

pub trait RecordReader {
    fn load_record(&mut self, table: Table, id: RecordId) -> RepoResult<Record>;

    /// Load all records of [`QuerySpec::table`] that match the query.
    fn query_records(&mut self, query: &QuerySpec) -> RepoResult<Vec<(RecordId, Record)>>;
}

/// Load a record of a statically known kind.
pub fn load_typed<T: RecordKind>(
    reader: &mut (impl RecordReader + ?Sized),
    id: T::Id,
) -> RepoResult<T> {
    let record = reader.load_record(T::TABLE, id.into())?;
    T::try_from(record).map_err(|record| unexpected_record(&record))
}

/// Query records of a statically known kind.
pub fn query_typed<T: RecordKind>(
    reader: &mut (impl RecordReader + ?Sized),
    query: &QuerySpec,
) -> RepoResult<Vec<(T::Id, T)>> {
    debug_assert_eq!(T::TABLE, query.table);
    reader
        .query_records(query)?
        .into_iter()
        .map(|(id, record)| {
            T::try_from(record)
                .map(|record| (T::Id::from(id), record))
                .map_err(|record| unexpected_record(&record))
        })
        .collect()
}

fn unexpected_record(record: &Record) -> RepoError {
    anyhow::anyhow!("unexpected {table} record", table = record.table()).into()
}

/// Raw storage backend without any write hooks.
pub trait RecordRepo: RecordReader {
    /// Insert a new record with an auto-assigned id.
    fn insert_record(&mut self, record: &Record) -> RepoResult<RecordId>;

    /// Insert or replace the record with the given id.
    fn replace_record(&mut self, id: RecordId, record: &Record) -> RepoResult<()>;

    /// Returns `false` if no such record existed.
    fn delete_record(&mut self, table: Table, id: RecordId) -> RepoResult<bool>;
}

pub trait Transactional {
    /// Run `f` in a transaction.
    ///
    /// Commits if `f` succeeds and rolls back all changes otherwise.
    fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<RepoError>;
}

/// Write operations of the local store.
///
/// Every write runs in its own transaction and notifies the
/// registered [`crate::hooks::WriteHook`]s.
pub trait RecordStore: RecordReader {
    /// Create a new record and return its id.
    fn add(&mut self, record: Record) -> RepoResult<RecordId>;

    /// Create or fully replace the record with the given id.
    fn put(&mut self, id: RecordId, record: Record) -> RepoResult<()>;

    /// Partially modify an existing record and return the merged result.
    fn update(
        &mut self,
        table: Table,
        id: RecordId,
        modifications: &RecordFields,
    ) -> RepoResult<Record>;

    /// Returns `false` if no such record existed.
    fn delete(&mut self, table: Table, id: RecordId) -> RepoResult<bool>;
}

/// Asynchronous access to the local store.
///
/// All writes are serialized. The closure passed to [`LocalStore::write`]
/// has exclusive write access for its whole duration.
pub trait LocalStore: Send + Sync + 'static {
    fn hooks(&self) -> &HookRegistry;

    fn read<F, T>(&self, read: F) -> impl Future<Output = RepoResult<T>> + Send
    where
        F: FnOnce(&mut dyn RecordReader) -> RepoResult<T> + Send + 'static,
        T: Send + 'static;

    fn write<F, T>(&self, write: F) -> impl Future<Output = RepoResult<T>> + Send
    where
        F: FnOnce(&mut dyn RecordStore) -> RepoResult<T> + Send + 'static,
        T: Send + 'static;
}
