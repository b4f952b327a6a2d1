//! Client/server tests over a real TCP socket.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use berth_common::config::WatchPolicy;
use berth_common::status::{RuntimeState, RuntimeStatus};
use berth_common::types::ContainerId;
use berth_grpc::ContainerServiceClient;
use berth_grpc::pb::{CreateContainerRequest, DeleteContainerRequest, EnvVar, GetContainerRequest};
use berth_grpc::server::GrpcServer;
use berth_runtime::backend::{ContainerBackend, ContainerConfig, ContainerInfo};
use berth_runtime::engine::Engine;
use berth_runtime::error::{Result, RuntimeError};
use berth_store::StatusStore;
use berth_store::memory::MemoryStore;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Default)]
struct RunningBackend {
    containers: Mutex<HashMap<ContainerId, ContainerConfig>>,
}

#[async_trait]
impl ContainerBackend for RunningBackend {
    async fn pull_image(&self, _reference: &str) -> Result<()> {
        Ok(())
    }

    async fn create(&self, config: &ContainerConfig) -> Result<ContainerId> {
        let id = ContainerId::new(format!("{}-id", config.name));
        let _ = self
            .containers
            .lock()
            .unwrap()
            .insert(id.clone(), config.clone());
        Ok(id)
    }

    async fn start(&self, _id: &ContainerId) -> Result<()> {
        Ok(())
    }

    async fn inspect(&self, id: &ContainerId) -> Result<ContainerInfo> {
        let containers = self.containers.lock().unwrap();
        let config = containers
            .get(id)
            .ok_or_else(|| RuntimeError::not_found(id.to_string()))?;
        Ok(ContainerInfo {
            id: id.clone(),
            name: config.name.clone(),
            env: config.env_entries(),
            state: RuntimeState::new(RuntimeStatus::Running),
        })
    }

    async fn remove(&self, id: &ContainerId) -> Result<()> {
        let _ = self
            .containers
            .lock()
            .unwrap()
            .remove(id)
            .ok_or_else(|| RuntimeError::not_found(id.to_string()))?;
        Ok(())
    }
}

#[tokio::test]
async fn container_service_over_tcp() {
    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(Engine::new(
        Arc::new(RunningBackend::default()),
        Arc::clone(&store) as Arc<dyn StatusStore>,
        WatchPolicy::default(),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = GrpcServer::new(addr.ip().to_string(), addr.port(), Arc::clone(&engine));
    let serving = tokio::spawn(server.serve(listener, async move {
        let _ = stop_rx.await;
    }));

    let mut client = ContainerServiceClient::connect(format!("http://{addr}"))
        .await
        .expect("client should connect");

    let created = client
        .create_container(CreateContainerRequest {
            name: "web".into(),
            image: "nginx".into(),
            env_vars: vec![EnvVar {
                key: "PORT".into(),
                value: "80".into(),
            }],
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(created.container_id, "web-id");
    assert_eq!(created.status, "created");

    let _ = engine
        .watchers()
        .join(&ContainerId::new(created.container_id.clone()))
        .await;
    assert_eq!(store.get_data("web-id:web").await.unwrap(), "running");

    let fetched = client
        .get_container(GetContainerRequest {
            container_id: created.container_id.clone(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(fetched.status, "running");
    assert_eq!(fetched.env_vars, created.env_vars);

    let deleted = client
        .delete_container(DeleteContainerRequest {
            container_id: created.container_id.clone(),
            name: "web".into(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(deleted.message, "Container web-id removed");
    assert!(store.get_data("web-id:web").await.is_err());

    let missing = client
        .get_container(GetContainerRequest {
            container_id: created.container_id,
        })
        .await
        .unwrap_err();
    assert_eq!(missing.code(), tonic::Code::Internal);
    assert_eq!(missing.message(), "no such container: web-id");

    stop_tx.send(()).unwrap();
    serving.await.unwrap().unwrap();
}

fn idle_engine() -> Arc<Engine> {
    Arc::new(Engine::new(
        Arc::new(RunningBackend::default()),
        Arc::new(MemoryStore::new()),
        WatchPolicy::default(),
    ))
}

#[tokio::test]
async fn run_resolves_host_names() {
    let server = GrpcServer::new("localhost", 0, idle_engine());
    server
        .run(std::future::ready(()))
        .await
        .expect("localhost should resolve and bind");
}

#[tokio::test]
async fn run_reports_bind_failures_with_address() {
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let err = GrpcServer::new("127.0.0.1", port, idle_engine())
        .run(std::future::ready(()))
        .await
        .unwrap_err();
    let expected = format!("127.0.0.1:{port}");
    assert!(
        matches!(err, berth_grpc::error::GrpcError::Bind { ref addr, .. } if *addr == expected),
        "unexpected error: {err}"
    );
}
