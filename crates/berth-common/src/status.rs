//! Container status vocabulary.
//!
//! The runtime reports raw state words (`created`, `running`, `exited`, ...).
//! Callers and the status store see the derived lifecycle vocabulary:
//!
//! - `created` — the runtime record exists, not yet started
//! - `started` — the start call was accepted
//! - `running` — the runtime reports the container running
//! - `exited` — the container exited with code 0
//! - `failed: <message>[, exit_code: <n>]` — nonzero exit, or an error
//!   while starting or inspecting
//!
//! Both the request path and the background watcher derive statuses
//! through [`LifecycleStatus::from_runtime`], so they never disagree on
//! what a given runtime state means.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State word reported by the container runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeStatus {
    /// Created but never started.
    Created,
    /// Running.
    Running,
    /// Paused.
    Paused,
    /// Being restarted by the runtime.
    Restarting,
    /// Being removed.
    Removing,
    /// Process has exited.
    Exited,
    /// Defunct; the runtime could not fully remove it.
    Dead,
    /// The runtime did not report a state.
    Unknown,
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Restarting => "restarting",
            Self::Removing => "removing",
            Self::Exited => "exited",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        };
        f.write_str(word)
    }
}

/// Snapshot of a container's runtime state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeState {
    /// State word.
    pub status: RuntimeStatus,
    /// Exit code of the last run; meaningful once exited.
    pub exit_code: i64,
    /// Error text reported by the runtime, possibly empty.
    pub error: String,
}

impl RuntimeState {
    /// A state with no exit code and no error text.
    #[must_use]
    pub const fn new(status: RuntimeStatus) -> Self {
        Self {
            status,
            exit_code: 0,
            error: String::new(),
        }
    }

    /// An exited state with the given exit code and error text.
    #[must_use]
    pub fn exited(exit_code: i64, error: impl Into<String>) -> Self {
        Self {
            status: RuntimeStatus::Exited,
            exit_code,
            error: error.into(),
        }
    }
}

/// Externally visible lifecycle status of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleStatus {
    /// Runtime record exists, not yet started.
    Created,
    /// Start call accepted.
    Started,
    /// Runtime reports the container running.
    Running,
    /// Container exited with code 0.
    Exited,
    /// Container exited with a nonzero code, or an operation on it failed.
    Failed {
        /// Error description.
        message: String,
        /// Exit code, when the failure is a nonzero exit.
        exit_code: Option<i64>,
    },
    /// Any other runtime state, reported as the raw state word.
    Pending(RuntimeStatus),
}

impl LifecycleStatus {
    /// Derives the lifecycle status from a runtime state.
    #[must_use]
    pub fn from_runtime(state: &RuntimeState) -> Self {
        match state.status {
            RuntimeStatus::Running => Self::Running,
            RuntimeStatus::Exited if state.exit_code == 0 => Self::Exited,
            RuntimeStatus::Exited => Self::Failed {
                message: state.error.clone(),
                exit_code: Some(state.exit_code),
            },
            other => Self::Pending(other),
        }
    }

    /// A failure caused by an operation error rather than an exit code.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            exit_code: None,
        }
    }

    /// Whether a watcher stops tracking once it observes this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Running | Self::Exited | Self::Failed { .. })
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Started => f.write_str("started"),
            Self::Running => f.write_str("running"),
            Self::Exited => f.write_str("exited"),
            Self::Failed {
                message,
                exit_code: Some(code),
            } => write!(f, "failed: {message}, exit_code: {code}"),
            Self::Failed {
                message,
                exit_code: None,
            } => write!(f, "failed: {message}"),
            Self::Pending(status) => write!(f, "{status}"),
        }
    }
}
