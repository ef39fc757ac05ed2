// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use trackman_core::{QuerySpec, Record, RecordFields, Table};

use crate::{
    RecordId,
    hooks::{Committed, HookRegistry, WriteEvent},
    prelude::*,
};

/// A [`RecordStore`] that notifies hooks about all writes.
///
/// Each write is executed in a separate transaction of the
/// underlying repository.
#[allow(missing_debug_implementations)]
pub struct HookedRepo<'r, R> {
    repo: &'r mut R,
    hooks: &'r HookRegistry,
}

impl<'r, R> HookedRepo<'r, R> {
    pub fn new(repo: &'r mut R, hooks: &'r HookRegistry) -> Self {
        Self { repo, hooks }
    }
}

impl<R> RecordReader for HookedRepo<'_, R>
where
    R: RecordReader,
{
    fn load_record(&mut self, table: Table, id: RecordId) -> RepoResult<Record> {
        self.repo.load_record(table, id)
    }

    fn query_records(&mut self, query: &QuerySpec) -> RepoResult<Vec<(RecordId, Record)>> {
        self.repo.query_records(query)
    }
}

fn encode_fields(record: &Record) -> RepoResult<RecordFields> {
    record
        .to_fields()
        .map_err(|err| anyhow::Error::from(err).into())
}

impl<R> RecordStore for HookedRepo<'_, R>
where
    R: RecordRepo + Transactional,
{
    fn add(&mut self, record: Record) -> RepoResult<RecordId> {
        let hooks = self.hooks;
        let table = record.table();
        let (id, scope) = self.repo.transaction(|repo| {
            let scope = hooks.fire(&WriteEvent::Creating {
                table,
                id: None,
                record: &record,
            });
            let id = repo.insert_record(&record)?;
            Ok::<_, RepoError>((id, scope))
        })?;
        log::trace!("Added {table} record {id}");
        scope.complete(&Committed { table, id });
        Ok(id)
    }

    fn put(&mut self, id: RecordId, record: Record) -> RepoResult<()> {
        let hooks = self.hooks;
        let table = record.table();
        let scope = self.repo.transaction(|repo| {
            let scope = if let Some(prior) = repo.load_record(table, id).optional()? {
                let modifications = encode_fields(&record)?;
                hooks.fire(&WriteEvent::Updating {
                    table,
                    id,
                    prior: &prior,
                    modifications: &modifications,
                })
            } else {
                hooks.fire(&WriteEvent::Creating {
                    table,
                    id: Some(id),
                    record: &record,
                })
            };
            repo.replace_record(id, &record)?;
            Ok::<_, RepoError>(scope)
        })?;
        log::trace!("Put {table} record {id}");
        scope.complete(&Committed { table, id });
        Ok(())
    }

    fn update(
        &mut self,
        table: Table,
        id: RecordId,
        modifications: &RecordFields,
    ) -> RepoResult<Record> {
        let hooks = self.hooks;
        let (merged, scope) = self.repo.transaction(|repo| {
            let prior = repo.load_record(table, id)?;
            let merged = prior
                .merged(modifications)
                .map_err(anyhow::Error::from)?;
            let scope = hooks.fire(&WriteEvent::Updating {
                table,
                id,
                prior: &prior,
                modifications,
            });
            repo.replace_record(id, &merged)?;
            Ok::<_, RepoError>((merged, scope))
        })?;
        log::trace!("Updated {table} record {id}");
        scope.complete(&Committed { table, id });
        Ok(merged)
    }

    fn delete(&mut self, table: Table, id: RecordId) -> RepoResult<bool> {
        let hooks = self.hooks;
        let scope = self.repo.transaction(|repo| {
            let Some(prior) = repo.load_record(table, id).optional()? else {
                return Ok(None);
            };
            let scope = hooks.fire(&WriteEvent::Deleting {
                table,
                id,
                prior: &prior,
            });
            let deleted = repo.delete_record(table, id)?;
            debug_assert!(deleted);
            Ok::<_, RepoError>(Some(scope))
        })?;
        let Some(scope) = scope else {
            log::debug!("No {table} record {id} to delete");
            return Ok(false);
        };
        log::trace!("Deleted {table} record {id}");
        scope.complete(&Committed { table, id });
        Ok(true)
    }
}

#[cfg(test)]
mod tests;
