// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use semval::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ProgramId;

record_id_newtype!(ReleaseId);

/// A numbered release of a program.
///
/// The pair `(program_id, release_number)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub program_id: ProgramId,
    pub release_number: u32,
}

record_variant!(Release, ReleaseId, Releases);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReleaseInvalidity {
    ReleaseNumberZero,
}

impl Validate for Release {
    type Invalidity = ReleaseInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                self.release_number == 0,
                Self::Invalidity::ReleaseNumberZero,
            )
            .into()
    }
}
