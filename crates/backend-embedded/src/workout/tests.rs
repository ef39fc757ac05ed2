// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::civil::date;
use trackman_core::{ReleaseId, Track};

use super::*;
use crate::prelude::tests::establish_database;

async fn create_tracks(db: &crate::storage::LocalDatabase, count: usize) -> Vec<TrackId> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let track = Track::new(
            ReleaseId::new(1),
            "Warmup",
            format!("Song {i}"),
            "Artist",
        );
        ids.push(crate::track::create(db, track).await.unwrap());
    }
    ids
}

async fn last_used(db: &crate::storage::LocalDatabase, id: TrackId) -> Option<jiff::Timestamp> {
    db.read(move |reader| load_typed::<Track>(reader, id))
        .await
        .unwrap()
        .last_used
}

#[test_log::test(tokio::test)]
async fn save_marks_tracks_used() {
    let db = establish_database();
    let track_ids = create_tracks(&db, 2).await;

    let workout = Workout {
        program_id: ProgramId::new(1),
        date: date(2024, 6, 1),
        track_ids: track_ids.clone(),
        cloned_from: None,
    };
    save(&db, workout).await.unwrap();

    for id in track_ids {
        assert_eq!(
            Some("2024-06-01T00:00:00Z".parse::<jiff::Timestamp>().unwrap()),
            last_used(&db, id).await
        );
    }
}

#[test_log::test(tokio::test)]
async fn save_rejects_empty_workout() {
    let db = establish_database();
    let workout = Workout {
        program_id: ProgramId::new(1),
        date: date(2024, 6, 1),
        track_ids: vec![],
        cloned_from: None,
    };
    assert!(matches!(
        save(&db, workout).await,
        Err(crate::Error::Input(_))
    ));
}

#[test_log::test(tokio::test)]
async fn update_tracks_and_clone() {
    let db = establish_database();
    let track_ids = create_tracks(&db, 3).await;
    let source_id = save(
        &db,
        Workout {
            program_id: ProgramId::new(1),
            date: date(2024, 6, 1),
            track_ids: vec![track_ids[0]],
            cloned_from: None,
        },
    )
    .await
    .unwrap();

    let updated = update_tracks(&db, source_id, vec![track_ids[1], track_ids[2]])
        .await
        .unwrap();
    assert_eq!(vec![track_ids[1], track_ids[2]], updated.track_ids);
    assert_eq!(date(2024, 6, 1), updated.date);

    let (clone_id, clone) = clone_from(&db, source_id, date(2024, 6, 15)).await.unwrap();
    assert_ne!(source_id, clone_id);
    assert_eq!(Some(source_id), clone.cloned_from);
    assert_eq!(updated.track_ids, clone.track_ids);
    assert_eq!(
        Some("2024-06-15T00:00:00Z".parse::<jiff::Timestamp>().unwrap()),
        last_used(&db, track_ids[2]).await
    );
    // Replaced tracks keep their most recent usage
    assert_eq!(
        Some("2024-06-01T00:00:00Z".parse::<jiff::Timestamp>().unwrap()),
        last_used(&db, track_ids[0]).await
    );
}

#[test_log::test(tokio::test)]
async fn list_recent_first_with_limit() {
    let db = establish_database();
    let track_ids = create_tracks(&db, 1).await;
    let mut ids = Vec::new();
    for (program_id, day) in [(1, 1), (1, 15), (2, 10), (1, 8)] {
        let workout = Workout {
            program_id: ProgramId::new(program_id),
            date: date(2024, 6, day),
            track_ids: track_ids.clone(),
            cloned_from: None,
        };
        ids.push(save(&db, workout).await.unwrap());
    }

    let all: Vec<_> = list_recent_first(&db, None, None)
        .await
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(vec![ids[1], ids[2], ids[3], ids[0]], all);

    let recent: Vec<_> = list_recent_first(&db, Some(ProgramId::new(1)), Some(2))
        .await
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(vec![ids[1], ids[3]], recent);
}
