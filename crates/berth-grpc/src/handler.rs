//! Service implementation for `container.ContainerService`.

use std::sync::Arc;

use berth_common::types::{ContainerId, ContainerRecord, EnvVar};
use berth_runtime::engine::Engine;
use berth_runtime::error::RuntimeError;
use tonic::{Request, Response, Status};

use crate::pb::{
    self, Container, CreateContainerRequest, DeleteContainerRequest, DeleteContainerResponse,
    GetContainerRequest, container_service_server,
};

/// Exposes an [`Engine`] over gRPC.
#[derive(Clone)]
pub struct ContainerApi {
    engine: Arc<Engine>,
}

impl ContainerApi {
    /// Creates the service over a shared engine.
    #[must_use]
    pub const fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[tonic::async_trait]
impl container_service_server::ContainerService for ContainerApi {
    async fn create_container(
        &self,
        request: Request<CreateContainerRequest>,
    ) -> Result<Response<Container>, Status> {
        let req = request.into_inner();
        tracing::info!(name = %req.name, image = %req.image, "create container");

        let env = req.env_vars.into_iter().map(EnvVar::from).collect();
        let record = self
            .engine
            .create_container(&req.name, &req.image, env)
            .await
            .map_err(|e| internal("create", &e))?;

        Ok(Response::new(record.into()))
    }

    async fn get_container(
        &self,
        request: Request<GetContainerRequest>,
    ) -> Result<Response<Container>, Status> {
        let id = ContainerId::new(request.into_inner().container_id);
        tracing::debug!(id = %id, "get container");

        let record = self
            .engine
            .get_container(&id)
            .await
            .map_err(|e| internal("get", &e))?;

        Ok(Response::new(record.into()))
    }

    async fn delete_container(
        &self,
        request: Request<DeleteContainerRequest>,
    ) -> Result<Response<DeleteContainerResponse>, Status> {
        let req = request.into_inner();
        let id = ContainerId::new(req.container_id);
        tracing::info!(id = %id, name = %req.name, "delete container");

        let message = self
            .engine
            .delete_container(&id, &req.name)
            .await
            .map_err(|e| internal("delete", &e))?;

        Ok(Response::new(DeleteContainerResponse { message }))
    }
}

/// Every engine failure is reported as `INTERNAL` with the error text.
fn internal(operation: &str, err: &RuntimeError) -> Status {
    tracing::warn!(operation, error = %err, "request failed");
    Status::internal(err.to_string())
}

impl From<pb::EnvVar> for EnvVar {
    fn from(var: pb::EnvVar) -> Self {
        Self::new(var.key, var.value)
    }
}

impl From<EnvVar> for pb::EnvVar {
    fn from(var: EnvVar) -> Self {
        Self {
            key: var.key,
            value: var.value,
        }
    }
}

impl From<ContainerRecord> for Container {
    fn from(record: ContainerRecord) -> Self {
        Self {
            name: record.name,
            status: record.status,
            env_vars: record.env.into_iter().map(pb::EnvVar::from).collect(),
            container_id: record.id.to_string(),
        }
    }
}
