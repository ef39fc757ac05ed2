// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use trackman_core::Program;

use super::schema::*;
use crate::{
    db::{decode_json_array, encode_json_array},
    prelude::*,
};

#[derive(Debug, Queryable)]
pub(crate) struct QueryableRecord {
    pub(crate) row_id: RowId,
    pub(crate) name: String,
    pub(crate) track_types: String,
}

impl TryFrom<QueryableRecord> for (RowId, Program) {
    type Error = anyhow::Error;

    fn try_from(from: QueryableRecord) -> anyhow::Result<Self> {
        let QueryableRecord {
            row_id,
            name,
            track_types,
        } = from;
        let track_types = decode_json_array(&track_types)?;
        Ok((row_id, Program { name, track_types }))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = programs)]
pub(crate) struct InsertableRecord<'a> {
    pub(crate) name: &'a str,
    pub(crate) track_types: String,
}

impl<'a> InsertableRecord<'a> {
    pub(crate) fn bind(program: &'a Program) -> anyhow::Result<Self> {
        let Program { name, track_types } = program;
        Ok(Self {
            name,
            track_types: encode_json_array(track_types)?,
        })
    }
}
