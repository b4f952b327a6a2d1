//! Ownership of in-flight watchers.
//!
//! Every watcher is spawned through a [`WatcherRegistry`], which keeps its
//! cancellation token and join handle keyed by container ID. This lets the
//! engine stop a watcher before clearing its status entry, and lets the
//! daemon cancel and join every watcher on shutdown.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use berth_common::types::ContainerId;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::watcher::WatchOutcome;

/// Public view of a tracked watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherInfo {
    /// Container being watched.
    pub id: ContainerId,
    /// Container name.
    pub name: String,
    /// When the watcher was spawned.
    pub started_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Entry {
    name: String,
    started_at: DateTime<Utc>,
    cancel: CancellationToken,
    handle: JoinHandle<WatchOutcome>,
}

/// Registry of watcher tasks, one per container.
#[derive(Debug, Default)]
pub struct WatcherRegistry {
    watchers: Mutex<HashMap<ContainerId, Entry>>,
    shutdown: CancellationToken,
}

impl WatcherRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a watcher for `id`.
    ///
    /// `watch` receives the token that cancels the watcher; it is a child
    /// of the registry's shutdown token. A watcher already registered for
    /// the same ID is cancelled and replaced.
    pub fn spawn<F, Fut>(&self, id: ContainerId, name: &str, watch: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = WatchOutcome> + Send + 'static,
    {
        let cancel = self.shutdown.child_token();
        let span = tracing::info_span!("watcher", id = %id, name = %name);
        let handle = tokio::spawn(watch(cancel.clone()).instrument(span));

        let entry = Entry {
            name: name.to_string(),
            started_at: Utc::now(),
            cancel,
            handle,
        };

        let mut watchers = self.lock();
        watchers.retain(|_, entry| !entry.handle.is_finished());
        if let Some(previous) = watchers.insert(id.clone(), entry) {
            tracing::warn!(id = %id, "replacing active watcher");
            previous.cancel.cancel();
        }
    }

    /// Whether a watcher for `id` is still running.
    #[must_use]
    pub fn is_active(&self, id: &ContainerId) -> bool {
        self.lock()
            .get(id)
            .is_some_and(|entry| !entry.handle.is_finished())
    }

    /// Lists the watchers that are still running.
    #[must_use]
    pub fn active(&self) -> Vec<WatcherInfo> {
        let mut active: Vec<_> = self
            .lock()
            .iter()
            .filter(|(_, entry)| !entry.handle.is_finished())
            .map(|(id, entry)| WatcherInfo {
                id: id.clone(),
                name: entry.name.clone(),
                started_at: entry.started_at,
            })
            .collect();
        active.sort_by_key(|info| info.started_at);
        active
    }

    /// Cancels the watcher for `id` and waits for it to exit.
    ///
    /// Returns `None` if no watcher was registered. Once this returns, the
    /// watcher performs no further store writes.
    pub async fn stop(&self, id: &ContainerId) -> Option<WatchOutcome> {
        let entry = self.take(id)?;
        entry.cancel.cancel();
        Self::join_entry(id, entry).await
    }

    /// Waits for the watcher for `id` to exit on its own.
    ///
    /// Returns `None` if no watcher was registered.
    pub async fn join(&self, id: &ContainerId) -> Option<WatchOutcome> {
        let entry = self.take(id)?;
        Self::join_entry(id, entry).await
    }

    /// Cancels every watcher and waits for all of them to exit.
    ///
    /// Watchers spawned afterwards start out cancelled.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let entries: Vec<_> = self.lock().drain().collect();
        tracing::info!(count = entries.len(), "stopping watchers");
        for (id, entry) in entries {
            let _ = Self::join_entry(&id, entry).await;
        }
    }

    fn take(&self, id: &ContainerId) -> Option<Entry> {
        self.lock().remove(id)
    }

    async fn join_entry(id: &ContainerId, entry: Entry) -> Option<WatchOutcome> {
        match entry.handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "watcher task failed");
                None
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ContainerId, Entry>> {
        self.watchers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
