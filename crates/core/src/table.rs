// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// The record tables, identical in the local and the remote store.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Programs,
    Releases,
    Tracks,
    Workouts,
}

impl Table {
    pub const ALL: [Self; 4] = [Self::Programs, Self::Releases, Self::Tracks, Self::Workouts];

    /// The collection name, e.g. `tracks`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}
