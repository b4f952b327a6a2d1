//! Container lifecycle management for the Berth service.
//!
//! The [`Engine`](engine::Engine) creates containers through a
//! [`ContainerBackend`](backend::ContainerBackend), records their status in a
//! status store, and hands each new container to a background
//! [`Watcher`](watcher::Watcher) owned by a
//! [`WatcherRegistry`](registry::WatcherRegistry).

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod engine;
pub mod error;
pub mod image;
pub mod registry;
pub mod watcher;
