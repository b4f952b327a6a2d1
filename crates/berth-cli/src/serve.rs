//! Daemon wiring: runtime, store, engine, and gRPC server.

use std::sync::Arc;

use anyhow::Context;
use berth_common::config::ServiceConfig;
use berth_grpc::server::GrpcServer;
use berth_runtime::backend::docker::DockerBackend;
use berth_runtime::engine::Engine;

/// Runs the service until Ctrl-C or SIGTERM.
///
/// On shutdown the server stops accepting requests, then every in-flight
/// watcher is cancelled and joined.
///
/// # Errors
///
/// Returns an error if the runtime client, the status store, or the gRPC
/// server cannot be set up.
pub async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let (host, port) = config.listen_addr();

    let backend = DockerBackend::connect()
        .await
        .context("failed to create container runtime client")?;
    let store = berth_store::connect(&config.store_url)
        .await
        .context("failed to connect to status store")?;

    let engine = Arc::new(
        Engine::new(Arc::new(backend), store, config.watch.clone())
            .with_store_delete_attempts(config.store_delete_attempts),
    );
    tracing::info!(
        host,
        port,
        poll_interval = ?config.watch.poll_interval,
        max_polls = ?config.watch.max_polls,
        "starting berth"
    );

    let served = GrpcServer::new(host, port, Arc::clone(&engine))
        .run(shutdown_signal())
        .await;

    engine.shutdown().await;
    served.context("gRPC server failed")?;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                let _ = sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
