// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

diesel::table! {
    programs (row_id) {
        row_id -> BigInt,
        name -> Text,
        track_types -> Text,
    }
}
