//! Docker Engine backend.

use async_trait::async_trait;
use berth_common::status::{RuntimeState, RuntimeStatus};
use berth_common::types::ContainerId;
use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, RemoveContainerOptions,
    StartContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::models::{ContainerInspectResponse, ContainerStateStatusEnum};
use futures_util::TryStreamExt;

use super::{ContainerBackend, ContainerConfig, ContainerInfo};
use crate::error::{Result, RuntimeError};
use crate::image::ImageRef;

/// Backend that talks to a Docker-compatible Engine API.
#[derive(Debug, Clone)]
pub struct DockerBackend {
    docker: Docker,
}

impl DockerBackend {
    /// Connects using the local defaults (`DOCKER_HOST` or the local socket)
    /// and negotiates the API version with the daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be configured or the daemon
    /// does not answer the version request.
    pub async fn connect() -> Result<Self> {
        Self::negotiate(Docker::connect_with_local_defaults()?).await
    }

    /// Negotiates the API version of an existing client with its daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon does not answer the version request.
    pub async fn negotiate(docker: Docker) -> Result<Self> {
        let docker = docker.negotiate_version().await?;
        tracing::debug!(api_version = ?docker.client_version(), "runtime API version negotiated");
        Ok(Self { docker })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn from_client(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl ContainerBackend for DockerBackend {
    async fn pull_image(&self, reference: &str) -> Result<()> {
        let image = ImageRef::parse(reference)?;
        let options = CreateImageOptions {
            from_image: image.repository.clone(),
            tag: image.pull_tag().to_string(),
            ..Default::default()
        };

        let mut progress = std::pin::pin!(self.docker.create_image(Some(options), None, None));
        while let Some(info) = progress.try_next().await? {
            tracing::debug!(
                image = %image,
                status = info.status.as_deref().unwrap_or_default(),
                progress = info.progress.as_deref().unwrap_or_default(),
                "pull progress"
            );
        }
        tracing::info!(image = %image, "image pulled");
        Ok(())
    }

    async fn create(&self, config: &ContainerConfig) -> Result<ContainerId> {
        let options = (!config.name.is_empty()).then(|| CreateContainerOptions {
            name: config.name.clone(),
            platform: None,
        });
        let body = Config {
            image: Some(config.image.clone()),
            env: Some(config.env_entries()),
            ..Default::default()
        };

        let response = self.docker.create_container(options, body).await?;
        for warning in &response.warnings {
            tracing::warn!(name = %config.name, warning = %warning, "runtime warning on create");
        }
        Ok(ContainerId::new(response.id))
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.docker
            .start_container(id.as_str(), None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| classify(id, e))
    }

    async fn inspect(&self, id: &ContainerId) -> Result<ContainerInfo> {
        let response = self
            .docker
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(|e| classify(id, e))?;
        Ok(container_info(id, response))
    }

    async fn remove(&self, id: &ContainerId) -> Result<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        self.docker
            .remove_container(id.as_str(), Some(options))
            .await
            .map_err(|e| classify(id, e))
    }
}

/// Maps a 404 from the Engine API to [`RuntimeError::NotFound`], keeping the
/// daemon's message.
fn classify(id: &ContainerId, err: bollard::errors::Error) -> RuntimeError {
    match err {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message,
        } => RuntimeError::NotFound {
            id: id.to_string(),
            message,
        },
        other => RuntimeError::from(other),
    }
}

fn container_info(requested: &ContainerId, response: ContainerInspectResponse) -> ContainerInfo {
    let state = response.state.map_or_else(
        || RuntimeState::new(RuntimeStatus::Unknown),
        |state| RuntimeState {
            status: state
                .status
                .as_ref()
                .map_or(RuntimeStatus::Unknown, runtime_status),
            exit_code: state.exit_code.unwrap_or_default(),
            error: state.error.unwrap_or_default(),
        },
    );

    ContainerInfo {
        id: response
            .id
            .map_or_else(|| requested.clone(), ContainerId::new),
        // The Engine API prefixes names with `/`.
        name: response
            .name
            .as_deref()
            .map(|name| name.trim_start_matches('/').to_string())
            .unwrap_or_default(),
        env: response
            .config
            .and_then(|config| config.env)
            .unwrap_or_default(),
        state,
    }
}

const fn runtime_status(status: &ContainerStateStatusEnum) -> RuntimeStatus {
    match status {
        ContainerStateStatusEnum::CREATED => RuntimeStatus::Created,
        ContainerStateStatusEnum::RUNNING => RuntimeStatus::Running,
        ContainerStateStatusEnum::PAUSED => RuntimeStatus::Paused,
        ContainerStateStatusEnum::RESTARTING => RuntimeStatus::Restarting,
        ContainerStateStatusEnum::REMOVING => RuntimeStatus::Removing,
        ContainerStateStatusEnum::EXITED => RuntimeStatus::Exited,
        ContainerStateStatusEnum::DEAD => RuntimeStatus::Dead,
        ContainerStateStatusEnum::EMPTY => RuntimeStatus::Unknown,
    }
}
