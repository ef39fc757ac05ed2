// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use trackman_core::{Rating, ReleaseId, Track, util::clock::parse_timestamp_lenient};

use super::schema::*;
use crate::prelude::*;

#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecord {
    pub(crate) row_id: RowId,
    pub(crate) release_id: RowId,
    pub(crate) track_type: String,
    pub(crate) song_title: String,
    pub(crate) artist: String,
    pub(crate) rating: i16,
    pub(crate) last_used: Option<String>,
}

impl TryFrom<QueryableRecord> for (RowId, Track) {
    type Error = anyhow::Error;

    fn try_from(from: QueryableRecord) -> anyhow::Result<Self> {
        let QueryableRecord {
            row_id,
            release_id,
            track_type,
            song_title,
            artist,
            rating,
            last_used,
        } = from;
        let rating = Rating::new(rating.try_into()?)?;
        let last_used = last_used
            .as_deref()
            .map(parse_timestamp_lenient)
            .transpose()?;
        let track = Track {
            release_id: ReleaseId::new(release_id),
            track_type,
            song_title,
            artist,
            rating,
            last_used,
        };
        Ok((row_id, track))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = tracks)]
pub(crate) struct InsertableRecord<'a> {
    pub(crate) release_id: RowId,
    pub(crate) track_type: &'a str,
    pub(crate) song_title: &'a str,
    pub(crate) artist: &'a str,
    pub(crate) rating: i16,
    pub(crate) last_used: Option<String>,
}

impl<'a> InsertableRecord<'a> {
    pub(crate) fn bind(track: &'a Track) -> Self {
        let Track {
            release_id,
            track_type,
            song_title,
            artist,
            rating,
            last_used,
        } = track;
        Self {
            release_id: release_id.to_inner(),
            track_type,
            song_title,
            artist,
            rating: rating.value().into(),
            last_used: last_used.as_ref().map(ToString::to_string),
        }
    }
}
