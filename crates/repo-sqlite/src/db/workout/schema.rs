// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

diesel::table! {
    workouts (row_id) {
        row_id -> BigInt,
        program_id -> BigInt,
        date -> Text,
        track_ids -> Text,
        cloned_from -> Nullable<BigInt>,
    }
}
