// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

diesel::table! {
    tracks (row_id) {
        row_id -> BigInt,
        release_id -> BigInt,
        track_type -> Text,
        song_title -> Text,
        artist -> Text,
        rating -> SmallInt,
        last_used -> Nullable<Text>,
    }
}
