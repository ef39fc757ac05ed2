// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use semval::prelude::*;
use serde::{Deserialize, Serialize};

record_id_newtype!(ProgramId);

/// A group fitness program, e.g. a strength or a cardio class format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// Unique among all programs, enforced by the use cases.
    pub name: String,

    /// The ordered slots of a workout, one track per slot.
    #[serde(default)]
    pub track_types: Vec<String>,
}

record_variant!(Program, ProgramId, Programs);

impl Program {
    #[must_use]
    pub fn new<I, T>(name: impl Into<String>, track_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            track_types: track_types.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn has_track_type(&self, track_type: &str) -> bool {
        self.track_types.iter().any(|t| t == track_type)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProgramInvalidity {
    NameEmpty,
    TrackTypeEmpty,
}

impl Validate for Program {
    type Invalidity = ProgramInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let Self { name, track_types } = self;
        ValidationContext::new()
            .invalidate_if(name.trim().is_empty(), Self::Invalidity::NameEmpty)
            .invalidate_if(
                track_types.iter().any(|t| t.trim().is_empty()),
                Self::Invalidity::TrackTypeEmpty,
            )
            .into()
    }
}
