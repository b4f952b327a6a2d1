//! System-wide constants and defaults.

use std::time::Duration;

/// Default interface the gRPC server listens on.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default port for gRPC requests.
pub const DEFAULT_GRPC_PORT: u16 = 5600;

/// Default status store URL.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// URL scheme selecting the in-process status store.
pub const MEMORY_STORE_SCHEME: &str = "memory://";

/// Seconds between two inspections of a container by its watcher.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Inspections a watcher performs before giving up (10 minutes at 5s).
pub const DEFAULT_MAX_POLLS: u32 = 120;

/// Attempts made to clear a status entry when a container is deleted.
pub const DEFAULT_STORE_DELETE_ATTEMPTS: u32 = 3;

/// Pause between two attempts to clear a status entry.
pub const STORE_DELETE_BACKOFF: Duration = Duration::from_millis(200);

/// Tag pulled when an image reference names neither a tag nor a digest.
pub const DEFAULT_IMAGE_TAG: &str = "latest";

/// Binary name of the daemon.
pub const BIN_NAME: &str = "berthd";
