//! Background lifecycle watcher.
//!
//! After a container is created, a watcher starts it and polls the runtime
//! until the container reaches a terminal status, recording each observed
//! transition in the status store:
//!
//! ```text
//! start ──err──▶ failed: <error>
//!   │ok
//!   ▼
//! started ──▶ inspect ──running──▶ running
//!               │  ▲    ──exited 0──▶ exited
//!               │  │    ──exited n──▶ failed: <error>, exit_code: <n>
//!               │  │    ──error────▶ failed: <error>
//!               ▼  │
//!              sleep (other states, no write)
//! ```
//!
//! The watcher is the only writer of its status key while it runs, and its
//! writes are sequential. Store write failures are logged and never
//! retried. Cancellation is observed only while waiting on the runtime or
//! sleeping, never in the middle of a store write.

use std::sync::Arc;

use berth_common::config::WatchPolicy;
use berth_common::status::LifecycleStatus;
use berth_common::types::ContainerId;
use berth_store::StatusStore;
use tokio_util::sync::CancellationToken;

use crate::backend::ContainerBackend;

/// How a watcher run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// A terminal status was reached and recorded.
    Finished(LifecycleStatus),
    /// The watcher was cancelled before reaching a terminal status.
    Cancelled,
}

/// Tracks one container from start to a terminal status.
pub struct Watcher {
    backend: Arc<dyn ContainerBackend>,
    store: Arc<dyn StatusStore>,
    id: ContainerId,
    key: String,
    policy: WatchPolicy,
}

impl Watcher {
    /// Creates a watcher for the container `id`, writing under `key`.
    #[must_use]
    pub fn new(
        backend: Arc<dyn ContainerBackend>,
        store: Arc<dyn StatusStore>,
        id: ContainerId,
        key: String,
        policy: WatchPolicy,
    ) -> Self {
        Self {
            backend,
            store,
            id,
            key,
            policy,
        }
    }

    /// Starts the container and polls it until a terminal status or
    /// cancellation.
    pub async fn run(self, cancel: CancellationToken) -> WatchOutcome {
        let started = tokio::select! {
            biased;
            () = cancel.cancelled() => return WatchOutcome::Cancelled,
            result = self.backend.start(&self.id) => result,
        };

        if let Err(e) = started {
            tracing::debug!(id = %self.id, error = %e, "container failed to start");
            return self.finish(LifecycleStatus::failed(e.to_string())).await;
        }
        tracing::debug!(id = %self.id, "container started");
        self.record(&LifecycleStatus::Started).await;

        let mut polls: u32 = 0;
        loop {
            let inspected = tokio::select! {
                biased;
                () = cancel.cancelled() => return WatchOutcome::Cancelled,
                result = self.backend.inspect(&self.id) => result,
            };
            polls = polls.saturating_add(1);

            let status = match inspected {
                Ok(info) => LifecycleStatus::from_runtime(&info.state),
                Err(e) => LifecycleStatus::failed(e.to_string()),
            };
            tracing::debug!(id = %self.id, polls, status = %status, "container status");

            if status.is_terminal() {
                return self.finish(status).await;
            }
            if !self.policy.allows(polls) {
                return self
                    .finish(LifecycleStatus::failed(format!(
                        "timed out after {polls} polls waiting for container to run"
                    )))
                    .await;
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return WatchOutcome::Cancelled,
                () = tokio::time::sleep(self.policy.poll_interval) => {}
            }
        }
    }

    async fn finish(&self, status: LifecycleStatus) -> WatchOutcome {
        self.record(&status).await;
        tracing::info!(id = %self.id, status = %status, "watcher finished");
        WatchOutcome::Finished(status)
    }

    async fn record(&self, status: &LifecycleStatus) {
        let value = status.to_string();
        match self.store.set_data(&self.key, &value).await {
            Ok(()) => tracing::debug!(key = %self.key, status = %value, "status recorded"),
            Err(e) => tracing::warn!(
                key = %self.key,
                status = %value,
                error = %e,
                "failed to record container status"
            ),
        }
    }
}
