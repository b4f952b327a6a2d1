//! Error types for the gRPC server.

use thiserror::Error;

/// Errors raised while serving gRPC.
#[derive(Debug, Error)]
pub enum GrpcError {
    /// The listen socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested, as `host:port`.
        addr: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The listener could not be turned into an incoming stream.
    #[error("failed to accept connections: {message}")]
    Incoming {
        /// Error text.
        message: String,
    },

    /// The transport failed while serving.
    #[error("gRPC transport error: {source}")]
    Transport {
        /// Underlying tonic error.
        #[from]
        source: tonic::transport::Error,
    },
}

/// Convenience alias for gRPC server results.
pub type Result<T> = std::result::Result<T, GrpcError>;
