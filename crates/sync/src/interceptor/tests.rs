// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde_json::json;
use trackman_core::{Record, ReleaseId, Table, Track};
use trackman_remote::path::UserId;

use super::*;

struct Fixture {
    context: Arc<SyncContext>,
    hooks: HookRegistry,
    rx: mpsc::UnboundedReceiver<OutboundIntent>,
    interceptor: Arc<ChangeInterceptor>,
}

fn fixture() -> Fixture {
    let context = Arc::new(SyncContext::new(UserId::new("u1").unwrap()));
    let (tx, rx) = mpsc::unbounded_channel();
    let interceptor = Arc::new(ChangeInterceptor::new(Arc::clone(&context), tx));
    let hooks = HookRegistry::new();
    hooks.register(Arc::clone(&interceptor) as _);
    Fixture {
        context,
        hooks,
        rx,
        interceptor,
    }
}

fn track() -> Record {
    Track::new(ReleaseId::new(1), "Warmup", "Thunderstruck", "AC/DC").into()
}

#[test]
fn creating_issues_add_after_commit() {
    let mut fixture = fixture();
    let record = track();

    let scope = fixture.hooks.fire(&WriteEvent::Creating {
        table: Table::Tracks,
        id: None,
        record: &record,
    });
    assert!(fixture.rx.try_recv().is_err());

    scope.complete(&Committed {
        table: Table::Tracks,
        id: 7,
    });
    let intent = fixture.rx.try_recv().unwrap();
    assert_eq!(Operation::Add, intent.operation);
    assert_eq!(Table::Tracks, intent.table);
    assert_eq!(Some(7), intent.id);
    assert_eq!(record.to_fields().unwrap(), intent.fields);
    assert!(fixture.rx.try_recv().is_err());
}

#[test]
fn failed_write_issues_nothing() {
    let mut fixture = fixture();
    let record = track();

    let scope = fixture.hooks.fire(&WriteEvent::Deleting {
        table: Table::Tracks,
        id: 7,
        prior: &record,
    });
    drop(scope);
    assert!(fixture.rx.try_recv().is_err());
}

#[test]
fn updating_issues_merged_fields() {
    let mut fixture = fixture();
    let prior = track();
    let modifications = json!({"rating": 4}).as_object().cloned().unwrap();

    fixture
        .hooks
        .fire(&WriteEvent::Updating {
            table: Table::Tracks,
            id: 7,
            prior: &prior,
            modifications: &modifications,
        })
        .complete(&Committed {
            table: Table::Tracks,
            id: 7,
        });

    let intent = fixture.rx.try_recv().unwrap();
    assert_eq!(Operation::Update, intent.operation);
    assert_eq!(Some(&json!(4)), intent.fields.get("rating"));
    assert_eq!(Some(&json!("Thunderstruck")), intent.fields.get("songTitle"));
}

#[test]
fn deleting_issues_id_only() {
    let mut fixture = fixture();
    let prior = track();

    fixture
        .hooks
        .fire(&WriteEvent::Deleting {
            table: Table::Tracks,
            id: 7,
            prior: &prior,
        })
        .complete(&Committed {
            table: Table::Tracks,
            id: 7,
        });

    let intent = fixture.rx.try_recv().unwrap();
    assert_eq!(Operation::Delete, intent.operation);
    assert_eq!(Some(7), intent.id);
    assert!(intent.fields.is_empty());
}

#[test]
fn silent_while_loop_guard_is_engaged() {
    let mut fixture = fixture();
    let record = track();

    {
        let _engaged = fixture.context.loop_guard().engage();
        let scope = fixture.hooks.fire(&WriteEvent::Creating {
            table: Table::Tracks,
            id: Some(42),
            record: &record,
        });
        assert!(scope.is_empty());
        scope.complete(&Committed {
            table: Table::Tracks,
            id: 42,
        });
    }
    assert!(fixture.rx.try_recv().is_err());
}

#[test]
fn closed_interceptor_issues_nothing() {
    let mut fixture = fixture();
    let record = track();
    let scope = fixture.hooks.fire(&WriteEvent::Creating {
        table: Table::Tracks,
        id: None,
        record: &record,
    });

    fixture.interceptor.close();
    // Writes in progress are still delivered
    scope.complete(&Committed {
        table: Table::Tracks,
        id: 1,
    });
    assert_eq!(Some(1), fixture.rx.try_recv().unwrap().id);

    let scope = fixture.hooks.fire(&WriteEvent::Creating {
        table: Table::Tracks,
        id: None,
        record: &record,
    });
    assert!(scope.is_empty());
    // All senders are gone
    assert!(matches!(
        fixture.rx.try_recv(),
        Err(mpsc::error::TryRecvError::Disconnected)
    ));
}
