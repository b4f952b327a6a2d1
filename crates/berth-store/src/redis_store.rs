//! Redis-backed status store.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::StatusStore;
use crate::error::{Result, StoreError};

/// Status store backed by a Redis server.
///
/// Holds a multiplexed connection that reconnects on its own; each call
/// works on a cheap clone of it.
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to the Redis server at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the server is unreachable.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl StatusStore for RedisStore {
    async fn set_data(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await.map_err(|e| {
            tracing::debug!(key, error = %e, "error saving data to redis");
            StoreError::from(e)
        })
    }

    async fn get_data(&self, key: &str) -> Result<String> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        value.ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    async fn delete_data(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}
