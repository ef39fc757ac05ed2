// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use trackman_core::{ProgramId, Release};

use super::schema::*;
use crate::prelude::*;

#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecord {
    pub(crate) row_id: RowId,
    pub(crate) program_id: RowId,
    pub(crate) release_number: i64,
}

impl TryFrom<QueryableRecord> for (RowId, Release) {
    type Error = anyhow::Error;

    fn try_from(from: QueryableRecord) -> anyhow::Result<Self> {
        let QueryableRecord {
            row_id,
            program_id,
            release_number,
        } = from;
        let release = Release {
            program_id: ProgramId::new(program_id),
            release_number: release_number.try_into()?,
        };
        Ok((row_id, release))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = releases)]
pub(crate) struct InsertableRecord {
    pub(crate) program_id: RowId,
    pub(crate) release_number: i64,
}

impl InsertableRecord {
    pub(crate) fn bind(release: &Release) -> Self {
        let Release {
            program_id,
            release_number,
        } = release;
        Self {
            program_id: program_id.to_inner(),
            release_number: (*release_number).into(),
        }
    }
}
