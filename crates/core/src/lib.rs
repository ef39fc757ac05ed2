// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

#[macro_use]
mod macros;

pub mod program;
pub mod query;
pub mod record;
pub mod release;
pub mod table;
pub mod track;
pub mod util;
pub mod workout;

pub use self::{
    program::{Program, ProgramId},
    query::QuerySpec,
    record::{Record, RecordFields, RecordKind},
    release::{Release, ReleaseId},
    table::Table,
    track::{Rating, Track, TrackId},
    workout::{Workout, WorkoutId},
};

/// Locally assigned, auto-incremented record identifier.
pub type RecordId = i64;

pub mod prelude {
    // Re-export trait methods from semval
    pub use semval::{IsValid as _, Validate as _};

    pub use crate::{RecordId, Table};
}
