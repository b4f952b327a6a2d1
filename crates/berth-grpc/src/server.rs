//! gRPC server.

use std::future::Future;
use std::sync::Arc;

use berth_runtime::engine::Engine;
use tokio::net::TcpListener;
use tonic::transport::Server;
use tonic::transport::server::TcpIncoming;

use crate::error::{GrpcError, Result};
use crate::handler::ContainerApi;
use crate::pb::container_service_server::ContainerServiceServer;

/// Serves `container.ContainerService` for one engine.
pub struct GrpcServer {
    host: String,
    port: u16,
    engine: Arc<Engine>,
}

impl GrpcServer {
    /// Creates a server that will listen on `host:port`.
    ///
    /// `host` may be an IP literal or a name such as `localhost`.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, engine: Arc<Engine>) -> Self {
        Self {
            host: host.into(),
            port,
            engine,
        }
    }

    /// Resolves and binds the listen address, then serves until `shutdown`
    /// resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be resolved or bound, or the
    /// transport fails.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|source| GrpcError::Bind {
                addr: format!("{}:{}", self.host, self.port),
                source,
            })?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to complete before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let local = listener
            .local_addr()
            .map_or_else(|_| format!("{}:{}", self.host, self.port), |addr| addr.to_string());
        let incoming = TcpIncoming::from_listener(listener, true, None)
            .map_err(|e| GrpcError::Incoming {
                message: e.to_string(),
            })?;

        tracing::info!(addr = %local, "gRPC server listening");
        Server::builder()
            .add_service(ContainerServiceServer::new(ContainerApi::new(self.engine)))
            .serve_with_incoming_shutdown(incoming, shutdown)
            .await?;
        tracing::info!("gRPC server stopped");
        Ok(())
    }
}
