// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{num::NonZeroU32, thread};

use diesel::RunQueryDsl as _;

use super::*;
use crate::connection::{Storage, pool::create_connection_pool};

fn new_gatekeeper() -> Gatekeeper {
    let pool = create_connection_pool(&Storage::InMemory, NonZeroU32::MIN).unwrap();
    Gatekeeper::new(
        pool,
        Config {
            acquire_read_timeout_millis: NonZeroU64::new(10_000).unwrap(),
            acquire_write_timeout_millis: NonZeroU64::new(10_000).unwrap(),
        },
    )
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn read_and_write() {
    let gatekeeper = new_gatekeeper();
    gatekeeper
        .spawn_blocking_write_task(|mut connection| {
            diesel::sql_query("CREATE TABLE kv (k TEXT PRIMARY KEY)").execute(&mut *connection)
        })
        .await
        .unwrap()
        .unwrap();
    let rows = gatekeeper
        .spawn_blocking_read_task(|mut connection| {
            diesel::sql_query("SELECT k FROM kv").execute(&mut *connection)
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(0, rows);
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn dropped_write_request_keeps_exclusive_access_until_finished() {
    let gatekeeper = new_gatekeeper();
    let first_finished = Arc::new(AtomicBool::new(false));

    let first = gatekeeper.spawn_blocking_write_task({
        let first_finished = Arc::clone(&first_finished);
        move |_connection| {
            thread::sleep(Duration::from_millis(200));
            first_finished.store(true, Ordering::Release);
        }
    });
    // Give up waiting while the blocking task is still running.
    assert!(
        tokio::time::timeout(Duration::from_millis(20), first)
            .await
            .is_err()
    );

    let first_finished_before_second = gatekeeper
        .spawn_blocking_write_task({
            let first_finished = Arc::clone(&first_finished);
            move |_connection| first_finished.load(Ordering::Acquire)
        })
        .await
        .unwrap();
    assert!(first_finished_before_second);
}

#[test_log::test(tokio::test)]
async fn decommissioned() {
    let gatekeeper = new_gatekeeper();
    gatekeeper.decommission();
    let result = gatekeeper
        .spawn_blocking_read_task(|_connection| ())
        .await;
    assert!(matches!(result, Err(Error::TaskTimeout { .. })));
}
