// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use trackman_core::{Program, ProgramId, QuerySpec, Table, query::SortDirection};
use trackman_repo::{prelude::*, record::query_typed};

use crate::{Error, Result, validate_input};

/// Create a new program with a unique name.
pub async fn create<S: LocalStore>(store: &S, program: Program) -> Result<ProgramId> {
    validate_input(&program)?;
    let name = program.name.clone();
    let created = store
        .write(move |store| {
            let existing = QuerySpec::all(Table::Programs)
                .filter_eq("name", program.name.as_str())
                .limit(1);
            if !store.query_records(&existing)?.is_empty() {
                return Ok(None);
            }
            store.add(program.into()).map(|id| Some(ProgramId::new(id)))
        })
        .await?;
    created.ok_or_else(|| Error::Input(anyhow::anyhow!("program \"{name}\" already exists")))
}

pub async fn load_all<S: LocalStore>(store: &S) -> Result<Vec<(ProgramId, Program)>> {
    store
        .read(|reader| {
            let query = QuerySpec::all(Table::Programs).order_by("name", SortDirection::Ascending);
            query_typed::<Program>(reader, &query)
        })
        .await
        .map_err(Into::into)
}

/// Delete a program together with all of its releases and their tracks.
///
/// Workouts are kept as a history. Returns `false` if the program
/// did not exist.
pub async fn purge<S: LocalStore>(store: &S, id: ProgramId) -> Result<bool> {
    store
        .write(move |store| {
            let releases = QuerySpec::all(Table::Releases).filter_eq("programId", id.to_inner());
            let release_ids: Vec<_> = store
                .query_records(&releases)?
                .into_iter()
                .map(|(release_id, _)| release_id)
                .collect();
            if !release_ids.is_empty() {
                let tracks = QuerySpec::all(Table::Tracks)
                    .filter_any_of("releaseId", release_ids.iter().copied());
                for (track_id, _) in store.query_records(&tracks)? {
                    store.delete(Table::Tracks, track_id)?;
                }
            }
            log::debug!(
                "Purging program {id} with {num_releases} release(s)",
                num_releases = release_ids.len()
            );
            for release_id in release_ids {
                store.delete(Table::Releases, release_id)?;
            }
            store.delete(Table::Programs, id.to_inner())
        })
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests;
