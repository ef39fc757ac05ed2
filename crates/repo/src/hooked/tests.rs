// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use serde_json::json;
use trackman_core::{Program, ProgramId, Release};

use super::*;
use crate::hooks::{TransactionScope, WriteHook};

/// Minimal in-memory repository with snapshot based transactions.
#[derive(Default)]
struct MemoryRepo {
    records: BTreeMap<(Table, RecordId), Record>,
    last_id: RecordId,
    fail_inserts: bool,
}

impl RecordReader for MemoryRepo {
    fn load_record(&mut self, table: Table, id: RecordId) -> RepoResult<Record> {
        self.records
            .get(&(table, id))
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    fn query_records(&mut self, query: &QuerySpec) -> RepoResult<Vec<(RecordId, Record)>> {
        Ok(self
            .records
            .iter()
            .filter(|((table, _), _)| *table == query.table)
            .map(|((_, id), record)| (*id, record.clone()))
            .collect())
    }
}

impl RecordRepo for MemoryRepo {
    fn insert_record(&mut self, record: &Record) -> RepoResult<RecordId> {
        if self.fail_inserts {
            return Err(anyhow::anyhow!("insert failed").into());
        }
        self.last_id += 1;
        self.records
            .insert((record.table(), self.last_id), record.clone());
        Ok(self.last_id)
    }

    fn replace_record(&mut self, id: RecordId, record: &Record) -> RepoResult<()> {
        self.last_id = self.last_id.max(id);
        self.records.insert((record.table(), id), record.clone());
        Ok(())
    }

    fn delete_record(&mut self, table: Table, id: RecordId) -> RepoResult<bool> {
        Ok(self.records.remove(&(table, id)).is_some())
    }
}

impl Transactional for MemoryRepo {
    fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        let snapshot = (self.records.clone(), self.last_id);
        let result = f(self);
        if result.is_err() {
            (self.records, self.last_id) = snapshot;
        }
        result
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Fired {
    Creating(Option<RecordId>),
    Updating(RecordId, RecordFields),
    Deleting(RecordId),
    Committed(RecordId),
}

#[derive(Default)]
struct Recorder {
    fired: Arc<Mutex<Vec<Fired>>>,
    fail: bool,
}

impl Recorder {
    fn take(&self) -> Vec<Fired> {
        std::mem::take(&mut *self.fired.lock().unwrap())
    }
}

impl WriteHook for Recorder {
    fn before_write(
        &self,
        event: &WriteEvent<'_>,
        scope: &mut TransactionScope,
    ) -> anyhow::Result<()> {
        let fired = match event {
            WriteEvent::Creating { id, .. } => Fired::Creating(*id),
            WriteEvent::Updating {
                id, modifications, ..
            } => Fired::Updating(*id, (*modifications).clone()),
            WriteEvent::Deleting { id, .. } => Fired::Deleting(*id),
        };
        self.fired.lock().unwrap().push(fired);
        let committed = Arc::clone(&self.fired);
        scope.on_complete(move |Committed { id, .. }| {
            committed.lock().unwrap().push(Fired::Committed(*id));
        });
        if self.fail {
            anyhow::bail!("failing hook");
        }
        Ok(())
    }
}

fn setup() -> (MemoryRepo, HookRegistry, Arc<Recorder>) {
    let hooks = HookRegistry::new();
    let recorder = Arc::new(Recorder::default());
    hooks.register(Arc::clone(&recorder) as _);
    (MemoryRepo::default(), hooks, recorder)
}

fn fields(value: serde_json::Value) -> RecordFields {
    let serde_json::Value::Object(fields) = value else {
        panic!("not an object");
    };
    fields
}

fn program() -> Record {
    Program::new("BODYPUMP", ["Warmup", "Squats"]).into()
}

#[test_log::test]
fn add_fires_creating_without_id_and_commits_with_id() {
    let (mut repo, hooks, recorder) = setup();
    let mut store = HookedRepo::new(&mut repo, &hooks);

    let id = store.add(program()).unwrap();

    assert_eq!(1, id);
    assert_eq!(
        vec![Fired::Creating(None), Fired::Committed(1)],
        recorder.take()
    );
    assert_eq!(program(), store.load_record(Table::Programs, id).unwrap());
}

#[test_log::test]
fn put_fires_creating_or_updating() {
    let (mut repo, hooks, recorder) = setup();
    let mut store = HookedRepo::new(&mut repo, &hooks);

    store.put(42, program()).unwrap();
    assert_eq!(
        vec![Fired::Creating(Some(42)), Fired::Committed(42)],
        recorder.take()
    );

    let replacement: Record = Program::new("BODYCOMBAT", ["Combat 1"]).into();
    store.put(42, replacement.clone()).unwrap();
    assert_eq!(
        vec![
            Fired::Updating(42, replacement.to_fields().unwrap()),
            Fired::Committed(42)
        ],
        recorder.take()
    );
    assert_eq!(replacement, store.load_record(Table::Programs, 42).unwrap());
}

#[test_log::test]
fn update_merges_modifications() {
    let (mut repo, hooks, recorder) = setup();
    let mut store = HookedRepo::new(&mut repo, &hooks);
    let id = store
        .add(
            Release {
                program_id: ProgramId::new(1),
                release_number: 120,
            }
            .into(),
        )
        .unwrap();
    recorder.take();

    let modifications = fields(json!({ "releaseNumber": 121 }));
    let merged = store.update(Table::Releases, id, &modifications).unwrap();

    assert_eq!(
        Record::from(Release {
            program_id: ProgramId::new(1),
            release_number: 121,
        }),
        merged
    );
    assert_eq!(
        vec![Fired::Updating(id, modifications), Fired::Committed(id)],
        recorder.take()
    );
}

#[test_log::test]
fn update_missing_record_fails_without_firing() {
    let (mut repo, hooks, recorder) = setup();
    let mut store = HookedRepo::new(&mut repo, &hooks);

    let modifications = fields(json!({ "name": "BODYBALANCE" }));
    let err = store
        .update(Table::Programs, 1, &modifications)
        .unwrap_err();

    assert!(matches!(err, RepoError::NotFound));
    assert!(recorder.take().is_empty());
}

#[test_log::test]
fn delete_fires_only_for_existing_records() {
    let (mut repo, hooks, recorder) = setup();
    let mut store = HookedRepo::new(&mut repo, &hooks);

    assert!(!store.delete(Table::Programs, 1).unwrap());
    assert!(recorder.take().is_empty());

    let id = store.add(program()).unwrap();
    recorder.take();
    assert!(store.delete(Table::Programs, id).unwrap());
    assert_eq!(
        vec![Fired::Deleting(id), Fired::Committed(id)],
        recorder.take()
    );
    assert!(matches!(
        store.load_record(Table::Programs, id),
        Err(RepoError::NotFound)
    ));
}

#[test_log::test]
fn failed_write_never_completes() {
    let (mut repo, hooks, recorder) = setup();
    repo.fail_inserts = true;
    let mut store = HookedRepo::new(&mut repo, &hooks);

    assert!(store.add(program()).is_err());
    // The hook has seen the attempt but nothing has been committed.
    assert_eq!(vec![Fired::Creating(None)], recorder.take());
    assert!(
        store
            .query_records(&QuerySpec::all(Table::Programs))
            .unwrap()
            .is_empty()
    );
}

#[test_log::test]
fn failing_hook_does_not_fail_write() {
    let hooks = HookRegistry::new();
    let recorder = Arc::new(Recorder {
        fail: true,
        ..Default::default()
    });
    hooks.register(Arc::clone(&recorder) as _);
    let mut repo = MemoryRepo::default();
    let mut store = HookedRepo::new(&mut repo, &hooks);

    let id = store.add(program()).unwrap();
    assert_eq!(
        vec![Fired::Creating(None), Fired::Committed(id)],
        recorder.take()
    );
}
