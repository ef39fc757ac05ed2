// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::civil::Date;
use serde_json::Value;
use trackman_core::{
    ProgramId, QuerySpec, RecordFields, Table, TrackId, Workout, WorkoutId,
    query::SortDirection, util::clock::start_of_day_utc,
};
use trackman_repo::{
    prelude::*,
    record::{load_typed, query_typed},
};

use crate::{Result, track::mark_used_at, validate_input};

/// Save a new workout and mark its tracks as used on the workout date.
pub async fn save<S: LocalStore>(store: &S, workout: Workout) -> Result<WorkoutId> {
    validate_input(&workout)?;
    let used_at = start_of_day_utc(workout.date).map_err(anyhow::Error::from)?;
    store
        .write(move |store| {
            let track_ids = workout.track_ids.clone();
            let id = store.add(workout.into())?;
            mark_used_at(store, &track_ids, used_at)?;
            Ok(WorkoutId::new(id))
        })
        .await
        .map_err(Into::into)
}

/// Replace the tracks of an existing workout.
///
/// The new tracks are marked as used on the workout date.
pub async fn update_tracks<S: LocalStore>(
    store: &S,
    id: WorkoutId,
    track_ids: Vec<TrackId>,
) -> Result<Workout> {
    let mut modifications = RecordFields::new();
    modifications.insert(
        "trackIds".to_owned(),
        Value::from(
            track_ids
                .iter()
                .copied()
                .map(TrackId::to_inner)
                .collect::<Vec<_>>(),
        ),
    );
    let updated = store
        .write(move |store| {
            let record = store.update(Table::Workouts, id.to_inner(), &modifications)?;
            let workout = Workout::try_from(record)
                .map_err(|_| RepoError::from(anyhow::anyhow!("unexpected record type")))?;
            let used_at = start_of_day_utc(workout.date).map_err(anyhow::Error::from)?;
            mark_used_at(store, &workout.track_ids, used_at)?;
            Ok(workout)
        })
        .await?;
    Ok(updated)
}

/// Save a copy of an existing workout for another date.
pub async fn clone_from<S: LocalStore>(
    store: &S,
    source_id: WorkoutId,
    date: Date,
) -> Result<(WorkoutId, Workout)> {
    let used_at = start_of_day_utc(date).map_err(anyhow::Error::from)?;
    store
        .write(move |store| {
            let source = load_typed::<Workout>(store, source_id)?;
            let clone = Workout {
                program_id: source.program_id,
                date,
                track_ids: source.track_ids,
                cloned_from: Some(source_id),
            };
            let id = store.add(clone.clone().into())?;
            mark_used_at(store, &clone.track_ids, used_at)?;
            Ok((WorkoutId::new(id), clone))
        })
        .await
        .map_err(Into::into)
}

/// List workouts, the most recent first.
pub async fn list_recent_first<S: LocalStore>(
    store: &S,
    program_id: Option<ProgramId>,
    limit: Option<usize>,
) -> Result<Vec<(WorkoutId, Workout)>> {
    store
        .read(move |reader| {
            let mut query =
                QuerySpec::all(Table::Workouts).order_by("date", SortDirection::Ascending);
            if let Some(program_id) = program_id {
                query = query.filter_eq("programId", program_id.to_inner());
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            query_typed::<Workout>(reader, &query.reverse())
        })
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests;
