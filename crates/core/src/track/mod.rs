// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::Timestamp;
use semval::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ReleaseId;

record_id_newtype!(TrackId);

/// Star rating from 0 (unrated) to 5.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("rating {0} is out of range {min}..={max}", min = Rating::MIN.value(), max = Rating::MAX.value())]
pub struct RatingOutOfRange(pub u8);

impl Rating {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(5);

    pub const fn new(value: u8) -> Result<Self, RatingOutOfRange> {
        if value > Self::MAX.0 {
            return Err(RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(from: u8) -> Result<Self, Self::Error> {
        Self::new(from)
    }
}

impl From<Rating> for u8 {
    fn from(from: Rating) -> Self {
        from.value()
    }
}

/// A single song of a release, played in one slot of a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub release_id: ReleaseId,

    /// Should be one of the track types of the owning program.
    pub track_type: String,

    pub song_title: String,

    #[serde(default)]
    pub artist: String,

    #[serde(default)]
    pub rating: Rating,

    #[serde(default, with = "crate::util::clock::serde_timestamp_opt")]
    pub last_used: Option<Timestamp>,
}

record_variant!(Track, TrackId, Tracks);

impl Track {
    #[must_use]
    pub fn new(
        release_id: ReleaseId,
        track_type: impl Into<String>,
        song_title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            release_id,
            track_type: track_type.into(),
            song_title: song_title.into(),
            artist: artist.into(),
            rating: Rating::default(),
            last_used: None,
        }
    }

    pub fn set_rating(&mut self, rating: u8) -> Result<(), RatingOutOfRange> {
        self.rating = Rating::new(rating)?;
        Ok(())
    }

    /// Record that the track has been used at the given time.
    ///
    /// Returns `true` if modified. An older timestamp never replaces
    /// a more recent one.
    pub fn mark_used(&mut self, at: Timestamp) -> bool {
        if self.last_used.is_some_and(|last_used| last_used >= at) {
            return false;
        }
        self.last_used = Some(at);
        true
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackInvalidity {
    TrackTypeEmpty,
    SongTitleEmpty,
}

impl Validate for Track {
    type Invalidity = TrackInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let Self {
            release_id: _,
            track_type,
            song_title,
            artist: _,
            rating: _,
            last_used: _,
        } = self;
        ValidationContext::new()
            .invalidate_if(
                track_type.trim().is_empty(),
                Self::Invalidity::TrackTypeEmpty,
            )
            .invalidate_if(
                song_title.trim().is_empty(),
                Self::Invalidity::SongTitleEmpty,
            )
            .into()
    }
}
