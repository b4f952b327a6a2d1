//! Container operations façade.
//!
//! The [`Engine`] composes runtime calls, the status store, and background
//! watchers into the create/get/delete operations exposed to clients.

use std::sync::Arc;

use berth_common::config::WatchPolicy;
use berth_common::constants::{DEFAULT_STORE_DELETE_ATTEMPTS, STORE_DELETE_BACKOFF};
use berth_common::status::LifecycleStatus;
use berth_common::types::{ContainerId, ContainerRecord, EnvVar, status_key};
use berth_store::StatusStore;

use crate::backend::{ContainerBackend, ContainerConfig};
use crate::error::Result;
use crate::registry::WatcherRegistry;
use crate::watcher::Watcher;

/// Orchestrates container lifecycle operations.
pub struct Engine {
    backend: Arc<dyn ContainerBackend>,
    store: Arc<dyn StatusStore>,
    watchers: Arc<WatcherRegistry>,
    policy: WatchPolicy,
    store_delete_attempts: u32,
}

impl Engine {
    /// Creates an engine over the given runtime and status store.
    #[must_use]
    pub fn new(
        backend: Arc<dyn ContainerBackend>,
        store: Arc<dyn StatusStore>,
        policy: WatchPolicy,
    ) -> Self {
        Self {
            backend,
            store,
            watchers: Arc::new(WatcherRegistry::new()),
            policy,
            store_delete_attempts: DEFAULT_STORE_DELETE_ATTEMPTS,
        }
    }

    /// Sets how many times delete tries to clear a status entry.
    ///
    /// Values below one are raised to one.
    #[must_use]
    pub fn with_store_delete_attempts(mut self, attempts: u32) -> Self {
        self.store_delete_attempts = attempts.max(1);
        self
    }

    /// Registry of the watchers spawned by this engine.
    #[must_use]
    pub fn watchers(&self) -> &Arc<WatcherRegistry> {
        &self.watchers
    }

    /// Pulls the image, creates the container, and hands it to a watcher.
    ///
    /// Returns as soon as the `created` status is recorded; starting and
    /// tracking the container happens in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the pull, the creation, or the `created` write
    /// fails. A container whose `created` write failed is left in the
    /// runtime without a watcher.
    pub async fn create_container(
        &self,
        name: &str,
        image: &str,
        env: Vec<EnvVar>,
    ) -> Result<ContainerRecord> {
        self.backend.pull_image(image).await?;

        let config = ContainerConfig {
            name: name.to_string(),
            image: image.to_string(),
            env,
        };
        let id = self.backend.create(&config).await?;
        tracing::info!(id = %id, name = %name, image = %image, "container created");

        let key = status_key(&id, name);
        let status = LifecycleStatus::Created;
        self.store.set_data(&key, &status.to_string()).await?;

        let watcher = Watcher::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.store),
            id.clone(),
            key,
            self.policy.clone(),
        );
        self.watchers
            .spawn(id.clone(), name, |cancel| watcher.run(cancel));

        Ok(ContainerRecord {
            id,
            name: config.name,
            env: config.env,
            status: status.to_string(),
        })
    }

    /// Inspects a container in the runtime.
    ///
    /// The status is derived from the runtime state and the store is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be inspected.
    pub async fn get_container(&self, id: &ContainerId) -> Result<ContainerRecord> {
        let info = self.backend.inspect(id).await?;
        let status = LifecycleStatus::from_runtime(&info.state);
        tracing::debug!(id = %info.id, status = %status, "container inspected");

        Ok(ContainerRecord {
            id: info.id,
            name: info.name,
            env: info.env.iter().map(|entry| EnvVar::parse(entry)).collect(),
            status: status.to_string(),
        })
    }

    /// Removes a container and clears its status entry.
    ///
    /// The watcher of the container is stopped before the entry is cleared,
    /// so no late status write can recreate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime removal fails, or if the status entry
    /// could not be cleared after every attempt. In the latter case the
    /// container is already gone from the runtime.
    pub async fn delete_container(&self, id: &ContainerId, name: &str) -> Result<String> {
        self.backend.remove(id).await?;
        tracing::info!(id = %id, name = %name, "container removed");

        if let Some(outcome) = self.watchers.stop(id).await {
            tracing::debug!(id = %id, ?outcome, "watcher stopped");
        }

        let key = status_key(id, name);
        let mut attempt = 1;
        loop {
            match self.store.delete_data(&key).await {
                Ok(()) => break,
                Err(e) if attempt < self.store_delete_attempts => {
                    tracing::warn!(
                        key = %key,
                        attempt,
                        error = %e,
                        "failed to clear status entry, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(STORE_DELETE_BACKOFF).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(format!("Container {id} removed"))
    }

    /// Reads the last recorded status of a container from the store.
    ///
    /// The value may lag behind the runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is absent or the store is unreachable.
    pub async fn cached_status(&self, id: &ContainerId, name: &str) -> Result<String> {
        Ok(self.store.get_data(&status_key(id, name)).await?)
    }

    /// Cancels and joins every in-flight watcher.
    pub async fn shutdown(&self) {
        self.watchers.shutdown().await;
    }
}
