// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::civil::Date;
use semval::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{ProgramId, TrackId};

record_id_newtype!(WorkoutId);

/// A class taught on a particular date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub program_id: ProgramId,

    /// Serialized as `YYYY-MM-DD`.
    pub date: Date,

    /// Conceptually one track per track type of the program, in the
    /// same order. The store does not enforce this.
    #[serde(default)]
    pub track_ids: Vec<TrackId>,

    /// The workout this one has been cloned from, if any.
    #[serde(default)]
    pub cloned_from: Option<WorkoutId>,
}

record_variant!(Workout, WorkoutId, Workouts);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkoutInvalidity {
    NoTracks,
}

impl Validate for Workout {
    type Invalidity = WorkoutInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.track_ids.is_empty(), Self::Invalidity::NoTracks)
            .into()
    }
}
