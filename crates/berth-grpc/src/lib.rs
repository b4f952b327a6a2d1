//! # berth-grpc
//!
//! gRPC binding of the container service (`container.ContainerService`).
//!
//! Message and service types are generated from `proto/container.proto` at
//! build time. [`ContainerApi`](handler::ContainerApi) implements the
//! generated service trait on top of the runtime
//! [`Engine`](berth_runtime::engine::Engine), and
//! [`GrpcServer`](server::GrpcServer) serves it over tonic.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod handler;
pub mod server;

/// Types generated from `container.proto`.
#[allow(
    missing_docs,
    unused_results,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
pub mod pb {
    tonic::include_proto!("container");
}

pub use pb::container_service_client::ContainerServiceClient;
pub use pb::container_service_server::{ContainerService, ContainerServiceServer};
