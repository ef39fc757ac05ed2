// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

diesel::table! {
    releases (row_id) {
        row_id -> BigInt,
        program_id -> BigInt,
        release_number -> BigInt,
    }
}
