//! Domain primitive types used across the Berth workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime-assigned identifier of a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single environment variable of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
}

impl EnvVar {
    /// Creates an environment variable from a key and a value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parses a `KEY=VALUE` entry as reported by the runtime.
    ///
    /// Only the first `=` separates the key from the value, so values that
    /// contain `=` are kept intact. An entry without `=` yields an empty value.
    #[must_use]
    pub fn parse(entry: &str) -> Self {
        match entry.split_once('=') {
            Some((key, value)) => Self::new(key, value),
            None => Self::new(entry, ""),
        }
    }

    /// Formats the variable as a `KEY=VALUE` entry.
    #[must_use]
    pub fn to_entry(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// A container as reported to callers.
///
/// Records are never persisted: they are rebuilt from runtime inspection
/// on every lookup, or returned fresh from creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    /// Runtime-assigned identifier.
    pub id: ContainerId,
    /// Container name.
    pub name: String,
    /// Environment variables, in runtime order.
    pub env: Vec<EnvVar>,
    /// Lifecycle status string (see [`crate::status::LifecycleStatus`]).
    pub status: String,
}

/// Builds the status store key of a container: `"<id>:<name>"`.
#[must_use]
pub fn status_key(id: &ContainerId, name: &str) -> String {
    format!("{id}:{name}")
}
