// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use trackman_core::{Release, ReleaseId, Track};

use super::*;
use crate::prelude::tests::establish_database;

#[test_log::test(tokio::test)]
async fn create_rejects_duplicate_and_invalid_names() {
    let db = establish_database();

    let id = create(&db, Program::new("BODYPUMP", ["Warmup"]))
        .await
        .unwrap();
    assert!(matches!(
        create(&db, Program::new("BODYPUMP", ["Squats"])).await,
        Err(Error::Input(_))
    ));
    assert!(matches!(
        create(&db, Program::new("", ["Warmup"])).await,
        Err(Error::Input(_))
    ));

    let programs = load_all(&db).await.unwrap();
    assert_eq!(1, programs.len());
    assert_eq!(id, programs[0].0);
}

#[test_log::test(tokio::test)]
async fn load_all_ordered_by_name() {
    let db = establish_database();
    for name in ["BODYPUMP", "BODYATTACK", "BODYCOMBAT"] {
        create(&db, Program::new(name, ["Warmup"])).await.unwrap();
    }

    let names: Vec<_> = load_all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|(_, program)| program.name)
        .collect();
    assert_eq!(vec!["BODYATTACK", "BODYCOMBAT", "BODYPUMP"], names);
}

#[test_log::test(tokio::test)]
async fn purge_cascades_to_releases_and_tracks() {
    let db = establish_database();
    let program_id = create(&db, Program::new("BODYPUMP", ["Warmup"]))
        .await
        .unwrap();
    let other_program_id = create(&db, Program::new("BODYCOMBAT", ["Warmup"]))
        .await
        .unwrap();
    let release_id = crate::release::create(
        &db,
        Release {
            program_id,
            release_number: 120,
        },
    )
    .await
    .unwrap();
    let other_release_id = crate::release::create(
        &db,
        Release {
            program_id: other_program_id,
            release_number: 90,
        },
    )
    .await
    .unwrap();
    for release_id in [release_id, other_release_id] {
        crate::track::create(
            &db,
            Track::new(release_id, "Warmup", "Thunderstruck", "AC/DC"),
        )
        .await
        .unwrap();
    }

    assert!(purge(&db, program_id).await.unwrap());
    assert!(!purge(&db, program_id).await.unwrap());

    let remaining_releases: Vec<ReleaseId> = db
        .read(|reader| reader.query_records(&QuerySpec::all(Table::Releases)))
        .await
        .unwrap()
        .into_iter()
        .map(|(id, _)| ReleaseId::new(id))
        .collect();
    assert_eq!(vec![other_release_id], remaining_releases);
    let remaining_tracks = crate::track::load_by_program(&db, other_program_id)
        .await
        .unwrap();
    assert_eq!(1, remaining_tracks.len());
    assert!(
        crate::track::load_by_program(&db, program_id)
            .await
            .unwrap()
            .is_empty()
    );
}
