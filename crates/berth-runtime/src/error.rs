//! Error types for container lifecycle operations.

use berth_store::error::StoreError;
use thiserror::Error;

/// Errors raised by runtime backends and the engine.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The Docker API returned an error.
    #[error(transparent)]
    Docker {
        /// Underlying client error.
        #[from]
        source: bollard::errors::Error,
    },

    /// The container does not exist in the runtime.
    #[error("{message}")]
    NotFound {
        /// Identifier that was looked up.
        id: String,
        /// Message reported by the runtime.
        message: String,
    },

    /// An image reference could not be parsed.
    #[error("invalid image reference: {reference:?}")]
    InvalidImage {
        /// The rejected reference.
        reference: String,
    },

    /// The backend refused an operation.
    #[error("{message}")]
    Backend {
        /// Error text reported by the backend.
        message: String,
    },

    /// The status store failed.
    #[error("status store error: {source}")]
    Store {
        /// Underlying store error.
        #[from]
        source: StoreError,
    },
}

impl RuntimeError {
    /// A [`RuntimeError::NotFound`] with the default wording.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::NotFound {
            message: format!("no such container: {id}"),
            id,
        }
    }
}

/// Convenience alias for runtime results.
pub type Result<T> = std::result::Result<T, RuntimeError>;
