// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use trackman_core::{ProgramId, Workout, WorkoutId};

use super::schema::*;
use crate::{
    db::{decode_json_array, encode_json_array},
    prelude::*,
};

#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecord {
    pub(crate) row_id: RowId,
    pub(crate) program_id: RowId,
    pub(crate) date: String,
    pub(crate) track_ids: String,
    pub(crate) cloned_from: Option<RowId>,
}

impl TryFrom<QueryableRecord> for (RowId, Workout) {
    type Error = anyhow::Error;

    fn try_from(from: QueryableRecord) -> anyhow::Result<Self> {
        let QueryableRecord {
            row_id,
            program_id,
            date,
            track_ids,
            cloned_from,
        } = from;
        let workout = Workout {
            program_id: ProgramId::new(program_id),
            date: date.parse()?,
            track_ids: decode_json_array(&track_ids)?,
            cloned_from: cloned_from.map(WorkoutId::new),
        };
        Ok((row_id, workout))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = workouts)]
pub(crate) struct InsertableRecord {
    pub(crate) program_id: RowId,
    pub(crate) date: String,
    pub(crate) track_ids: String,
    pub(crate) cloned_from: Option<RowId>,
}

impl InsertableRecord {
    pub(crate) fn bind(workout: &Workout) -> anyhow::Result<Self> {
        let Workout {
            program_id,
            date,
            track_ids,
            cloned_from,
        } = workout;
        Ok(Self {
            program_id: program_id.to_inner(),
            date: date.to_string(),
            track_ids: encode_json_array(track_ids)?,
            cloned_from: cloned_from.map(WorkoutId::to_inner),
        })
    }
}
