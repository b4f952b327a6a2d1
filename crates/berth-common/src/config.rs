//! Configuration model for the Berth daemon.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{BerthError, Result};

/// How a lifecycle watcher polls the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchPolicy {
    /// Pause between two inspections.
    pub poll_interval: Duration,
    /// Inspections performed before the watcher gives up; `None` polls forever.
    pub max_polls: Option<u32>,
}

impl WatchPolicy {
    /// Whether another inspection is allowed after `polls` have been made.
    #[must_use]
    pub fn allows(&self, polls: u32) -> bool {
        self.max_polls.is_none_or(|max| polls < max)
    }
}

impl Default for WatchPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(constants::DEFAULT_POLL_INTERVAL_SECS),
            max_polls: Some(constants::DEFAULT_MAX_POLLS),
        }
    }
}

/// Root configuration of the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Interface the gRPC server binds to.
    pub host: String,
    /// Port the gRPC server binds to.
    pub grpc_port: u16,
    /// Status store URL (`redis://...` or `memory://`).
    pub store_url: String,
    /// Watcher polling policy.
    pub watch: WatchPolicy,
    /// Attempts made to clear a status entry on delete.
    pub store_delete_attempts: u32,
}

impl ServiceConfig {
    /// Host and port the gRPC server binds to.
    ///
    /// The host may be an IP literal or a name resolved at bind time.
    #[must_use]
    pub fn listen_addr(&self) -> (&str, u16) {
        (self.host.trim(), self.grpc_port)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(BerthError::Config {
                message: "listen host is not set".to_string(),
            });
        }
        if self.store_url.trim().is_empty() {
            return Err(BerthError::Config {
                message: "status store url is not set".to_string(),
            });
        }
        if self.watch.poll_interval.is_zero() {
            return Err(BerthError::Config {
                message: "poll interval must be greater than zero".to_string(),
            });
        }
        if self.store_delete_attempts == 0 {
            return Err(BerthError::Config {
                message: "store delete attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: constants::DEFAULT_HOST.to_string(),
            grpc_port: constants::DEFAULT_GRPC_PORT,
            store_url: constants::DEFAULT_REDIS_URL.to_string(),
            watch: WatchPolicy::default(),
            store_delete_attempts: constants::DEFAULT_STORE_DELETE_ATTEMPTS,
        }
    }
}
