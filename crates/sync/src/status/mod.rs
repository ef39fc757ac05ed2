// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use discro::{Publisher, Subscriber};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    /// All local changes have been propagated.
    #[default]
    Synced,

    /// Local changes are being propagated.
    Syncing,

    /// The remote store is not reachable.
    Offline,

    /// The most recent synchronization failed.
    Error,
}

impl SyncStatus {
    #[must_use]
    pub const fn from_remote_error(error: &trackman_remote::Error) -> Self {
        if error.is_offline() {
            Self::Offline
        } else {
            Self::Error
        }
    }
}

/// The observable [`SyncStatus`] of a session.
#[derive(Debug, Default)]
pub struct StatusObservable {
    publisher: Publisher<SyncStatus>,
}

impl StatusObservable {
    #[must_use]
    pub fn new(initial_status: SyncStatus) -> Self {
        Self {
            publisher: Publisher::new(initial_status),
        }
    }

    #[must_use]
    pub fn read(&self) -> SyncStatus {
        *self.publisher.read()
    }

    #[must_use]
    pub fn subscribe_changed(&self) -> Subscriber<SyncStatus> {
        self.publisher.subscribe_changed()
    }

    /// Returns `true` if the status has changed.
    #[allow(clippy::must_use_candidate)]
    pub fn update(&self, status: SyncStatus) -> bool {
        let modified = self.publisher.modify(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        });
        if modified {
            log::debug!("Sync status: {status:?}");
        }
        modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_only_on_change() {
        let status = StatusObservable::default();
        assert_eq!(SyncStatus::Synced, status.read());
        assert!(!status.update(SyncStatus::Synced));
        assert!(status.update(SyncStatus::Syncing));
        assert_eq!(SyncStatus::Syncing, status.read());
    }

    #[test_log::test(tokio::test)]
    async fn subscribers_observe_changes() {
        let status = StatusObservable::default();
        let mut subscriber = status.subscribe_changed();
        assert!(status.update(SyncStatus::Offline));
        assert!(subscriber.changed().await.is_ok());
        assert_eq!(SyncStatus::Offline, *subscriber.read_ack());
    }

    #[test]
    fn classify_remote_errors() {
        assert_eq!(
            SyncStatus::Offline,
            SyncStatus::from_remote_error(&trackman_remote::Error::Unavailable)
        );
        assert_eq!(
            SyncStatus::Error,
            SyncStatus::from_remote_error(&trackman_remote::Error::PermissionDenied)
        );
    }
}
