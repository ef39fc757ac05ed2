// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use trackman_core::{ProgramId, QuerySpec, Release, ReleaseId, Table, query::SortDirection};
use trackman_repo::{prelude::*, record::query_typed};

use crate::{Error, Result, validate_input};

/// Create a new release, unique per program and release number.
pub async fn create<S: LocalStore>(store: &S, release: Release) -> Result<ReleaseId> {
    validate_input(&release)?;
    let Release {
        program_id,
        release_number,
    } = release;
    let created = store
        .write(move |store| {
            let existing = QuerySpec::all(Table::Releases)
                .filter_eq("programId", program_id.to_inner())
                .filter_eq("releaseNumber", release_number)
                .limit(1);
            if !store.query_records(&existing)?.is_empty() {
                return Ok(None);
            }
            store.add(release.into()).map(|id| Some(ReleaseId::new(id)))
        })
        .await?;
    created.ok_or_else(|| {
        Error::Input(anyhow::anyhow!(
            "release {release_number} of program {program_id} already exists"
        ))
    })
}

/// Load the releases of a program, most recent first.
pub async fn load_by_program<S: LocalStore>(
    store: &S,
    program_id: ProgramId,
) -> Result<Vec<(ReleaseId, Release)>> {
    store
        .read(move |reader| {
            let query = QuerySpec::all(Table::Releases)
                .filter_eq("programId", program_id.to_inner())
                .order_by("releaseNumber", SortDirection::Descending);
            query_typed::<Release>(reader, &query)
        })
        .await
        .map_err(Into::into)
}
