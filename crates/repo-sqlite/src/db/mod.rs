// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

pub(crate) mod program;
pub(crate) mod release;
pub(crate) mod track;
pub(crate) mod workout;

/// Sequences are stored as JSON arrays in text columns.
fn encode_json_array<T: serde::Serialize>(items: &[T]) -> anyhow::Result<String> {
    serde_json::to_string(items).map_err(Into::into)
}

fn decode_json_array<T: serde::de::DeserializeOwned>(text: &str) -> anyhow::Result<Vec<T>> {
    serde_json::from_str(text).map_err(Into::into)
}
