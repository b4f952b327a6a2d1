//! # berth-store
//!
//! Clients for the key-value store that caches container statuses.
//!
//! The store is a best-effort projection of runtime state: the lifecycle
//! watcher writes to it, delete clears it, and callers that accept some
//! staleness read from it instead of inspecting the runtime.
//!
//! Two backends are provided:
//! - [`RedisStore`](redis_store::RedisStore) for `redis://` and `rediss://` URLs.
//! - [`MemoryStore`](memory::MemoryStore) for `memory://`, an in-process
//!   map used for local development and tests.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use berth_common::constants::MEMORY_STORE_SCHEME;

use crate::error::{Result, StoreError};
use crate::memory::MemoryStore;
use crate::redis_store::RedisStore;

/// String-to-string store holding one status entry per container.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Inserts or replaces the value of `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or rejects the write.
    async fn set_data(&self, key: &str, value: &str) -> Result<()>;

    /// Returns the value of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the key is absent, or a backend
    /// error if the store is unreachable.
    async fn get_data(&self, key: &str) -> Result<String>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable.
    async fn delete_data(&self, key: &str) -> Result<()>;
}

/// Opens the store selected by the URL scheme.
///
/// # Errors
///
/// Returns an error if the URL is empty, its scheme is unsupported, or the
/// backend cannot be reached.
pub async fn connect(url: &str) -> Result<Arc<dyn StatusStore>> {
    let url = url.trim();
    if url.is_empty() {
        return Err(StoreError::MissingUrl);
    }

    if url.starts_with(MEMORY_STORE_SCHEME) {
        tracing::info!("using in-process store for container statuses");
        return Ok(Arc::new(MemoryStore::new()));
    }

    if ["redis://", "rediss://", "redis+unix://"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
    {
        tracing::info!("using redis store for container statuses");
        let store = RedisStore::connect(url).await?;
        return Ok(Arc::new(store));
    }

    Err(StoreError::UnsupportedUrl {
        url: url.to_string(),
    })
}
