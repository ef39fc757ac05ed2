// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use trackman_core::{QuerySpec, Record};

use crate::{
    db::{program, release, track, workout},
    prelude::*,
};

type Transactions = AnsiTransactionManager;

fn load_all<Q, T>(rows: Vec<Q>) -> RepoResult<Vec<(RowId, Record)>>
where
    (RowId, T): TryFrom<Q, Error = anyhow::Error>,
    T: Into<Record>,
{
    rows.into_iter()
        .map(|row| -> RepoResult<_> {
            let (id, record) = <(RowId, T)>::try_from(row)?;
            Ok((id, record.into()))
        })
        .collect()
}

impl Connection<'_> {
    fn load_table(&mut self, table: Table) -> RepoResult<Vec<(RowId, Record)>> {
        match table {
            Table::Programs => {
                use program::{models::QueryableRecord, schema::programs};
                let rows = programs::table
                    .order_by(programs::row_id)
                    .load::<QueryableRecord>(self.as_mut())
                    .map_err(repo_error)?;
                load_all::<_, trackman_core::Program>(rows)
            }
            Table::Releases => {
                use release::{models::QueryableRecord, schema::releases};
                let rows = releases::table
                    .order_by(releases::row_id)
                    .load::<QueryableRecord>(self.as_mut())
                    .map_err(repo_error)?;
                load_all::<_, trackman_core::Release>(rows)
            }
            Table::Tracks => {
                use track::{models::QueryableRecord, schema::tracks};
                let rows = tracks::table
                    .order_by(tracks::row_id)
                    .load::<QueryableRecord>(self.as_mut())
                    .map_err(repo_error)?;
                load_all::<_, trackman_core::Track>(rows)
            }
            Table::Workouts => {
                use workout::{models::QueryableRecord, schema::workouts};
                let rows = workouts::table
                    .order_by(workouts::row_id)
                    .load::<QueryableRecord>(self.as_mut())
                    .map_err(repo_error)?;
                load_all::<_, trackman_core::Workout>(rows)
            }
        }
    }
}

fn loaded<T>(row: (RowId, T)) -> Record
where
    T: Into<Record>,
{
    let (_, record) = row;
    record.into()
}

impl RecordReader for Connection<'_> {
    fn load_record(&mut self, table: Table, id: RowId) -> RepoResult<Record> {
        let record = match table {
            Table::Programs => {
                use program::{models::QueryableRecord, schema::programs};
                let row = programs::table
                    .filter(programs::row_id.eq(id))
                    .first::<QueryableRecord>(self.as_mut())
                    .map_err(repo_error)?;
                loaded::<trackman_core::Program>(row.try_into()?)
            }
            Table::Releases => {
                use release::{models::QueryableRecord, schema::releases};
                let row = releases::table
                    .filter(releases::row_id.eq(id))
                    .first::<QueryableRecord>(self.as_mut())
                    .map_err(repo_error)?;
                loaded::<trackman_core::Release>(row.try_into()?)
            }
            Table::Tracks => {
                use track::{models::QueryableRecord, schema::tracks};
                let row = tracks::table
                    .filter(tracks::row_id.eq(id))
                    .first::<QueryableRecord>(self.as_mut())
                    .map_err(repo_error)?;
                loaded::<trackman_core::Track>(row.try_into()?)
            }
            Table::Workouts => {
                use workout::{models::QueryableRecord, schema::workouts};
                let row = workouts::table
                    .filter(workouts::row_id.eq(id))
                    .first::<QueryableRecord>(self.as_mut())
                    .map_err(repo_error)?;
                loaded::<trackman_core::Workout>(row.try_into()?)
            }
        };
        Ok(record)
    }

    fn query_records(&mut self, query: &QuerySpec) -> RepoResult<Vec<(RowId, Record)>> {
        let mut records: BTreeMap<_, _> = self.load_table(query.table)?.into_iter().collect();
        let candidates = records
            .iter()
            .map(|(id, record)| {
                record
                    .to_fields()
                    .map(|fields| (*id, fields))
                    .map_err(anyhow::Error::from)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let results = query
            .evaluate(candidates)
            .into_iter()
            .filter_map(|(id, _)| records.remove(&id).map(|record| (id, record)))
            .collect();
        Ok(results)
    }
}

impl RecordRepo for Connection<'_> {
    fn insert_record(&mut self, record: &Record) -> RepoResult<RowId> {
        let id = match record {
            Record::Program(program) => {
                use program::{models::InsertableRecord, schema::programs};
                let insertable = InsertableRecord::bind(program)?;
                diesel::insert_into(programs::table)
                    .values(&insertable)
                    .returning(programs::row_id)
                    .get_result::<RowId>(self.as_mut())
            }
            Record::Release(release) => {
                use release::{models::InsertableRecord, schema::releases};
                let insertable = InsertableRecord::bind(release);
                diesel::insert_into(releases::table)
                    .values(&insertable)
                    .returning(releases::row_id)
                    .get_result::<RowId>(self.as_mut())
            }
            Record::Track(track) => {
                use track::{models::InsertableRecord, schema::tracks};
                let insertable = InsertableRecord::bind(track);
                diesel::insert_into(tracks::table)
                    .values(&insertable)
                    .returning(tracks::row_id)
                    .get_result::<RowId>(self.as_mut())
            }
            Record::Workout(workout) => {
                use workout::{models::InsertableRecord, schema::workouts};
                let insertable = InsertableRecord::bind(workout)?;
                diesel::insert_into(workouts::table)
                    .values(&insertable)
                    .returning(workouts::row_id)
                    .get_result::<RowId>(self.as_mut())
            }
        }
        .map_err(repo_error)?;
        log::trace!("Inserted {table} row {id}", table = record.table());
        Ok(id)
    }

    fn replace_record(&mut self, id: RowId, record: &Record) -> RepoResult<()> {
        let rows_affected = match record {
            Record::Program(program) => {
                use program::{models::InsertableRecord, schema::programs};
                let insertable = InsertableRecord::bind(program)?;
                diesel::replace_into(programs::table)
                    .values((programs::row_id.eq(id), &insertable))
                    .execute(self.as_mut())
            }
            Record::Release(release) => {
                use release::{models::InsertableRecord, schema::releases};
                let insertable = InsertableRecord::bind(release);
                diesel::replace_into(releases::table)
                    .values((releases::row_id.eq(id), &insertable))
                    .execute(self.as_mut())
            }
            Record::Track(track) => {
                use track::{models::InsertableRecord, schema::tracks};
                let insertable = InsertableRecord::bind(track);
                diesel::replace_into(tracks::table)
                    .values((tracks::row_id.eq(id), &insertable))
                    .execute(self.as_mut())
            }
            Record::Workout(workout) => {
                use workout::{models::InsertableRecord, schema::workouts};
                let insertable = InsertableRecord::bind(workout)?;
                diesel::replace_into(workouts::table)
                    .values((workouts::row_id.eq(id), &insertable))
                    .execute(self.as_mut())
            }
        }
        .map_err(repo_error)?;
        debug_assert_eq!(1, rows_affected);
        log::trace!("Replaced {table} row {id}", table = record.table());
        Ok(())
    }

    fn delete_record(&mut self, table: Table, id: RowId) -> RepoResult<bool> {
        let rows_affected = match table {
            Table::Programs => {
                use program::schema::programs;
                diesel::delete(programs::table.filter(programs::row_id.eq(id)))
                    .execute(self.as_mut())
            }
            Table::Releases => {
                use release::schema::releases;
                diesel::delete(releases::table.filter(releases::row_id.eq(id)))
                    .execute(self.as_mut())
            }
            Table::Tracks => {
                use track::schema::tracks;
                diesel::delete(tracks::table.filter(tracks::row_id.eq(id))).execute(self.as_mut())
            }
            Table::Workouts => {
                use workout::schema::workouts;
                diesel::delete(workouts::table.filter(workouts::row_id.eq(id)))
                    .execute(self.as_mut())
            }
        }
        .map_err(repo_error)?;
        debug_assert!(rows_affected <= 1);
        Ok(rows_affected > 0)
    }
}

impl Transactional for Connection<'_> {
    fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        Transactions::begin_transaction(self.as_mut()).map_err(|err| E::from(repo_error(err)))?;
        match f(self) {
            Ok(value) => {
                Transactions::commit_transaction(self.as_mut())
                    .map_err(|err| E::from(repo_error(err)))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = Transactions::rollback_transaction(self.as_mut()) {
                    log::warn!("Failed to roll back transaction: {rollback_err}");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests;
