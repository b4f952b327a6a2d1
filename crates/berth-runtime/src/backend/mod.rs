//! Container backend abstraction.

pub mod docker;

use async_trait::async_trait;
use berth_common::status::RuntimeState;
use berth_common::types::{ContainerId, EnvVar};

use crate::error::Result;

/// Configuration for creating a container.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Container name; empty lets the runtime pick one.
    pub name: String,
    /// Image reference.
    pub image: String,
    /// Environment variables, in order.
    pub env: Vec<EnvVar>,
}

impl ContainerConfig {
    /// Environment as `KEY=VALUE` entries.
    #[must_use]
    pub fn env_entries(&self) -> Vec<String> {
        self.env.iter().map(EnvVar::to_entry).collect()
    }
}

/// What the runtime reports about a container.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    /// Unique identifier.
    pub id: ContainerId,
    /// Container name.
    pub name: String,
    /// Environment as raw `KEY=VALUE` entries.
    pub env: Vec<String>,
    /// Current state.
    pub state: RuntimeState,
}

/// A container runtime the engine drives.
///
/// Implementors only relay calls to the runtime; status derivation and
/// tracking live in the engine and its watchers.
#[async_trait]
pub trait ContainerBackend: Send + Sync {
    /// Pulls an image, returning once the pull has completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is invalid or the pull fails.
    async fn pull_image(&self, reference: &str) -> Result<()>;

    /// Creates a container and returns its runtime-assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be created.
    async fn create(&self, config: &ContainerConfig) -> Result<ContainerId>;

    /// Starts a created container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be started.
    async fn start(&self, id: &ContainerId) -> Result<()>;

    /// Inspects a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container does not exist or cannot be inspected.
    async fn inspect(&self, id: &ContainerId) -> Result<ContainerInfo>;

    /// Removes a container, stopping it first if it is running.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be removed.
    async fn remove(&self, id: &ContainerId) -> Result<()>;
}
