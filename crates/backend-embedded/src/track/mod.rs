// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::{Timestamp, civil::Date};
use serde_json::Value;
use trackman_core::{
    ProgramId, QuerySpec, Rating, RecordFields, Table, Track, TrackId,
    util::clock::start_of_day_utc,
};
use trackman_repo::{
    prelude::*,
    record::{load_typed, query_typed},
};

use crate::{Error, Result, validate_input};

pub async fn create<S: LocalStore>(store: &S, track: Track) -> Result<TrackId> {
    validate_input(&track)?;
    let id = store.write(move |store| store.add(track.into())).await?;
    Ok(TrackId::new(id))
}

pub async fn set_rating<S: LocalStore>(store: &S, id: TrackId, rating: u8) -> Result<Track> {
    let rating = Rating::new(rating).map_err(|err| Error::Input(err.into()))?;
    let mut modifications = RecordFields::new();
    modifications.insert("rating".to_owned(), rating.value().into());
    store
        .write(move |store| {
            store
                .update(Table::Tracks, id.to_inner(), &modifications)
                .and_then(|record| {
                    Track::try_from(record)
                        .map_err(|_| anyhow::anyhow!("unexpected record type").into())
                })
        })
        .await
        .map_err(Into::into)
}

/// Mark tracks as used by a workout on the given date.
///
/// The most recent usage is kept. Returns the number of modified tracks.
pub async fn mark_used_on<S: LocalStore>(
    store: &S,
    track_ids: Vec<TrackId>,
    date: Date,
) -> Result<usize> {
    let at = start_of_day_utc(date).map_err(anyhow::Error::from)?;
    store
        .write(move |store| mark_used_at(store, &track_ids, at))
        .await
        .map_err(Into::into)
}

pub(crate) fn mark_used_at(
    store: &mut dyn RecordStore,
    track_ids: &[TrackId],
    at: Timestamp,
) -> RepoResult<usize> {
    let mut modified = 0;
    for &id in track_ids {
        let Some(mut track) = load_typed::<Track>(store, id).optional()? else {
            log::debug!("Skipping unknown track {id}");
            continue;
        };
        if !track.mark_used(at) {
            continue;
        }
        let mut modifications = RecordFields::new();
        modifications.insert("lastUsed".to_owned(), Value::from(at.to_string()));
        store.update(Table::Tracks, id.to_inner(), &modifications)?;
        modified += 1;
    }
    Ok(modified)
}

/// Load all tracks of all releases of a program.
pub async fn load_by_program<S: LocalStore>(
    store: &S,
    program_id: ProgramId,
) -> Result<Vec<(TrackId, Track)>> {
    store
        .read(move |reader| {
            let releases =
                QuerySpec::all(Table::Releases).filter_eq("programId", program_id.to_inner());
            let release_ids: Vec<_> = reader
                .query_records(&releases)?
                .into_iter()
                .map(|(id, _)| id)
                .collect();
            let tracks = QuerySpec::all(Table::Tracks).filter_any_of("releaseId", release_ids);
            query_typed::<Track>(reader, &tracks)
        })
        .await
        .map_err(Into::into)
}
