// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, sync::Arc};

use tokio::{sync::mpsc, task::JoinHandle};
use trackman_core::Table;
use trackman_remote::{RemoteStore, path::UserId};
use trackman_repo::prelude::*;

use crate::{
    Result,
    context::SyncContext,
    inbound::run_listener,
    interceptor::ChangeInterceptor,
    outbound::run_outbox,
    status::{StatusObservable, SyncStatus},
};

/// Synchronization of a single signed-in user.
///
/// Never reused for another user. Dropping the service destroys it.
pub struct SyncService<S: LocalStore> {
    context: Arc<SyncContext>,
    store: Arc<S>,
    listeners: Vec<JoinHandle<()>>,
    interceptor: Option<(HookHandle, Arc<ChangeInterceptor>)>,
    outbox_worker: Option<JoinHandle<()>>,
}

impl<S: LocalStore> fmt::Debug for SyncService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncService")
            .field("user_id", self.context.user_id())
            .field("listeners", &self.listeners.len())
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl<S: LocalStore> SyncService<S> {
    /// Start listening for remote changes and propagating local changes.
    ///
    /// Listeners are started before local writes are intercepted.
    pub async fn initialize(
        store: Arc<S>,
        remote: Arc<dyn RemoteStore>,
        user_id: UserId,
        status: Arc<StatusObservable>,
    ) -> Result<Self> {
        log::info!("Initializing synchronization of {user_id}");
        let context = Arc::new(SyncContext::new(user_id));
        let mut service = Self {
            context: Arc::clone(&context),
            store: Arc::clone(&store),
            listeners: Vec::with_capacity(Table::ALL.len()),
            interceptor: None,
            outbox_worker: None,
        };
        for table in Table::ALL {
            let collection = context.collection(table);
            // Tasks that have already been spawned are aborted when
            // the service is dropped.
            let stream = remote.subscribe(&collection).await.inspect_err(|err| {
                log::warn!("Failed to subscribe {collection}: {err}");
                status.update(SyncStatus::from_remote_error(err));
            })?;
            service.listeners.push(tokio::spawn(run_listener(
                Arc::clone(&store),
                Arc::clone(&context),
                table,
                stream,
                Arc::clone(&status),
            )));
        }

        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let interceptor = Arc::new(ChangeInterceptor::new(Arc::clone(&context), outbox_tx));
        let hook_handle = store.hooks().register(Arc::clone(&interceptor) as _);
        service.interceptor = Some((hook_handle, interceptor));
        service.outbox_worker = Some(tokio::spawn(run_outbox(
            outbox_rx,
            remote,
            context,
            status,
        )));

        Ok(service)
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        self.context.user_id()
    }

    #[must_use]
    pub fn context(&self) -> &Arc<SyncContext> {
        &self.context
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.interceptor.is_some() || !self.listeners.is_empty()
    }

    /// Stop listening and intercepting.
    ///
    /// Intents of local writes that have already been committed are
    /// still propagated in the background. A batch of remote changes
    /// that is currently applied stops before its next change, but
    /// only [`Self::shutdown`] waits until it has finished.
    pub fn destroy(&mut self) {
        if !self.is_active() {
            return;
        }
        log::info!(
            "Destroying synchronization of {user_id}",
            user_id = self.context.user_id()
        );
        self.context.close();
        for listener in self.listeners.drain(..) {
            // Unsubscribes by dropping the stream
            listener.abort();
        }
        if let Some((hook_handle, interceptor)) = self.interceptor.take() {
            self.store.hooks().unregister(hook_handle);
            interceptor.close();
        }
    }

    /// Destroy the service and wait until all pending local changes
    /// have been propagated.
    ///
    /// No remote changes are applied locally after this returns.
    pub async fn shutdown(mut self) {
        self.destroy();
        // Local writes are exclusive. An empty write finishes after
        // any remote changes that are still being applied.
        if let Err(err) = self.store.write(|_| Ok(())).await {
            log::warn!("Failed to await pending remote changes: {err}");
        }
        let Some(outbox_worker) = self.outbox_worker.take() else {
            return;
        };
        if let Err(err) = outbox_worker.await {
            log::error!("Outbox worker failed: {err}");
        }
    }
}

impl<S: LocalStore> Drop for SyncService<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Follows the authentication state.
///
/// Maintains at most one [`SyncService`] for the currently signed-in
/// user. The sync status is shared by all services of the session.
pub struct SyncSession<S: LocalStore> {
    store: Arc<S>,
    remote: Arc<dyn RemoteStore>,
    status: Arc<StatusObservable>,
    service: Option<SyncService<S>>,
}

impl<S: LocalStore> fmt::Debug for SyncSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSession")
            .field("status", &self.status.read())
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl<S: LocalStore> SyncSession<S> {
    #[must_use]
    pub fn new(store: Arc<S>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            remote,
            status: Default::default(),
            service: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> &Arc<StatusObservable> {
        &self.status
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&UserId> {
        self.service.as_ref().map(SyncService::user_id)
    }

    #[must_use]
    pub const fn service(&self) -> Option<&SyncService<S>> {
        self.service.as_ref()
    }

    /// Start synchronizing the collections of `user_id`.
    ///
    /// The service of a different user is shut down first. Signing in
    /// again as the current user keeps the running service.
    pub async fn sign_in(&mut self, user_id: UserId) -> Result<()> {
        if self.current_user() == Some(&user_id) {
            log::debug!("Already synchronizing {user_id}");
            return Ok(());
        }
        self.sign_out().await;
        let service = SyncService::initialize(
            Arc::clone(&self.store),
            Arc::clone(&self.remote),
            user_id,
            Arc::clone(&self.status),
        )
        .await?;
        self.service = Some(service);
        Ok(())
    }

    pub async fn sign_out(&mut self) {
        let Some(service) = self.service.take() else {
            return;
        };
        service.shutdown().await;
    }

    pub async fn on_auth_state_changed(&mut self, user_id: Option<UserId>) -> Result<()> {
        match user_id {
            Some(user_id) => self.sign_in(user_id).await,
            None => {
                self.sign_out().await;
                Ok(())
            }
        }
    }
}
