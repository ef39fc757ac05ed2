// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::civil::date;
use trackman_core::{
    Program, ProgramId, Release, ReleaseId, Track, TrackId, Workout, WorkoutId,
    query::SortDirection,
};

use super::*;
use crate::prelude::tests::*;

fn program() -> Record {
    Program::new("BODYPUMP", ["Warmup", "Squats", "Chest"]).into()
}

fn track(release_id: RowId, song_title: &str) -> Track {
    Track::new(ReleaseId::new(release_id), "Warmup", song_title, "Artist")
}

#[test_log::test]
fn insert_and_load_all_kinds() -> TestResult<()> {
    let mut db = establish_connection()?;
    let mut connection = Connection::new(&mut db);

    let program_id = connection.insert_record(&program())?;
    let release: Record = Release {
        program_id: ProgramId::new(program_id),
        release_number: 120,
    }
    .into();
    let release_id = connection.insert_record(&release)?;
    let mut track = track(release_id, "Thunderstruck");
    track.set_rating(4)?;
    assert!(track.mark_used("2024-06-01T18:30:00Z".parse()?));
    let track: Record = track.into();
    let track_id = connection.insert_record(&track)?;
    let workout: Record = Workout {
        program_id: ProgramId::new(program_id),
        date: date(2024, 6, 1),
        track_ids: vec![TrackId::new(track_id)],
        cloned_from: Some(WorkoutId::new(99)),
    }
    .into();
    let workout_id = connection.insert_record(&workout)?;

    assert_eq!(program(), connection.load_record(Table::Programs, program_id)?);
    assert_eq!(release, connection.load_record(Table::Releases, release_id)?);
    assert_eq!(track, connection.load_record(Table::Tracks, track_id)?);
    assert_eq!(workout, connection.load_record(Table::Workouts, workout_id)?);
    Ok(())
}

#[test_log::test]
fn load_missing_record() -> TestResult<()> {
    let mut db = establish_connection()?;
    let mut connection = Connection::new(&mut db);

    assert!(matches!(
        connection.load_record(Table::Tracks, 1),
        Err(RepoError::NotFound)
    ));
    Ok(())
}

#[test_log::test]
fn ids_are_never_reused() -> TestResult<()> {
    let mut db = establish_connection()?;
    let mut connection = Connection::new(&mut db);

    let first_id = connection.insert_record(&program())?;
    assert!(connection.delete_record(Table::Programs, first_id)?);
    let second_id = connection.insert_record(&program())?;
    assert!(second_id > first_id);
    Ok(())
}

#[test_log::test]
fn replace_with_chosen_id() -> TestResult<()> {
    let mut db = establish_connection()?;
    let mut connection = Connection::new(&mut db);

    connection.replace_record(42, &program())?;
    assert_eq!(program(), connection.load_record(Table::Programs, 42)?);

    let replacement: Record = Program::new("BODYPUMP", ["Warmup"]).into();
    connection.replace_record(42, &replacement)?;
    assert_eq!(replacement, connection.load_record(Table::Programs, 42)?);

    // Subsequently assigned ids never collide with chosen ids.
    let next_id = connection.insert_record(&program())?;
    assert!(next_id > 42);
    Ok(())
}

#[test_log::test]
fn delete_missing_record() -> TestResult<()> {
    let mut db = establish_connection()?;
    let mut connection = Connection::new(&mut db);

    assert!(!connection.delete_record(Table::Workouts, 1)?);
    Ok(())
}

#[test_log::test]
fn query_with_filter_order_and_limit() -> TestResult<()> {
    let mut db = establish_connection()?;
    let mut connection = Connection::new(&mut db);

    let mut ids = Vec::new();
    for (program_id, day) in [(1, 3), (2, 1), (1, 2), (1, 5)] {
        let workout: Record = Workout {
            program_id: ProgramId::new(program_id),
            date: date(2024, 6, day),
            track_ids: vec![],
            cloned_from: None,
        }
        .into();
        ids.push(connection.insert_record(&workout)?);
    }

    let query = QuerySpec::all(Table::Workouts)
        .filter_eq("programId", 1)
        .order_by("date", SortDirection::Ascending)
        .reverse()
        .limit(2);
    let results: Vec<_> = connection
        .query_records(&query)?
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(vec![ids[3], ids[0]], results);
    Ok(())
}

#[test_log::test]
fn rollback_on_error() -> TestResult<()> {
    let mut db = establish_connection()?;
    let mut connection = Connection::new(&mut db);

    let result = connection.transaction(|connection| {
        connection.insert_record(&program())?;
        Err::<(), _>(RepoError::Aborted)
    });
    assert!(matches!(result, Err(RepoError::Aborted)));
    assert!(
        connection
            .query_records(&QuerySpec::all(Table::Programs))?
            .is_empty()
    );

    let id = connection.transaction(|connection| connection.insert_record(&program()))?;
    assert_eq!(program(), connection.load_record(Table::Programs, id)?);
    Ok(())
}

#[test_log::test]
fn hooked_writes() -> TestResult<()> {
    let mut db = establish_connection()?;
    let mut connection = Connection::new(&mut db);
    let hooks = HookRegistry::new();
    let mut store = HookedRepo::new(&mut connection, &hooks);

    let release_id = store.add(
        Release {
            program_id: ProgramId::new(1),
            release_number: 120,
        }
        .into(),
    )?;
    let track_id = store.add(track(release_id, "Thunderstruck").into())?;

    let serde_json::Value::Object(modifications) = serde_json::json!({ "rating": 5 }) else {
        unreachable!();
    };
    let updated = store.update(Table::Tracks, track_id, &modifications)?;
    let Record::Track(updated) = updated else {
        panic!("not a track");
    };
    assert_eq!(5, updated.rating.value());

    assert!(store.delete(Table::Tracks, track_id)?);
    assert!(!store.delete(Table::Tracks, track_id)?);
    Ok(())
}
