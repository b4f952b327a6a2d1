//! Error types for status store clients.

use thiserror::Error;

/// Errors returned by a [`StatusStore`](crate::StatusStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested key does not exist.
    #[error("key not found: {key}")]
    NotFound {
        /// Key that was looked up.
        key: String,
    },

    /// The Redis backend failed.
    #[error("redis error: {source}")]
    Redis {
        /// Underlying client error.
        #[from]
        source: redis::RedisError,
    },

    /// The store could not serve the request.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// No store URL was configured.
    #[error("status store url is not set")]
    MissingUrl,

    /// The store URL names an unsupported backend.
    #[error("unsupported status store url: {url}")]
    UnsupportedUrl {
        /// The rejected URL.
        url: String,
    },
}

/// Convenience alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
