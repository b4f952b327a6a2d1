//! In-process status store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::StatusStore;
use crate::error::{Result, StoreError};

/// Status store kept in process memory.
///
/// Entries do not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every entry.
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl StatusStore for MemoryStore {
    async fn set_data(&self, key: &str, value: &str) -> Result<()> {
        let _ = self
            .entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_data(&self, key: &str) -> Result<String> {
        self.entries
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    async fn delete_data(&self, key: &str) -> Result<()> {
        let _ = self.entries.write().await.remove(key);
        Ok(())
    }
}
