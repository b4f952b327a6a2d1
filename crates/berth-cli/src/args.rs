//! Command-line arguments.

use std::time::Duration;

use berth_common::config::{ServiceConfig, WatchPolicy};
use berth_common::constants::{
    BIN_NAME, DEFAULT_GRPC_PORT, DEFAULT_HOST, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_REDIS_URL, DEFAULT_STORE_DELETE_ATTEMPTS,
};
use clap::{Parser, ValueEnum};

/// Berth — container lifecycle service.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Host interface to listen on.
    #[arg(long, env = "BERTH_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on for gRPC requests.
    #[arg(long, env = "BERTH_GRPC_PORT", default_value_t = DEFAULT_GRPC_PORT)]
    pub grpc_port: u16,

    /// Minimum log level or filter directive; overrides `RUST_LOG`.
    #[arg(long, env = "BERTH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, env = "BERTH_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// URL of the status store (`redis://...`, or `memory://` for an
    /// in-process store).
    #[arg(long, env = "REDIS_URL", default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    /// Seconds between two inspections of a starting container.
    #[arg(long, env = "BERTH_POLL_INTERVAL_SECS", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// Inspections before a watcher gives up; 0 polls forever.
    #[arg(long, env = "BERTH_MAX_POLLS", default_value_t = DEFAULT_MAX_POLLS)]
    pub max_polls: u32,

    /// Attempts made to clear a status entry on delete.
    #[arg(long, env = "BERTH_STORE_DELETE_ATTEMPTS", default_value_t = DEFAULT_STORE_DELETE_ATTEMPTS)]
    pub store_delete_attempts: u32,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

impl Cli {
    /// Builds the service configuration from the parsed flags.
    pub fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            host: self.host,
            grpc_port: self.grpc_port,
            store_url: self.redis_url,
            watch: WatchPolicy {
                poll_interval: Duration::from_secs(self.poll_interval_secs),
                max_polls: (self.max_polls > 0).then_some(self.max_polls),
            },
            store_delete_attempts: self.store_delete_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn command_is_named_after_the_binary() {
        assert_eq!(Cli::command().get_name(), BIN_NAME);
    }

    #[test]
    fn defaults_match_constants() {
        let config = Cli::try_parse_from(["berthd"]).unwrap().into_config();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.grpc_port, 5600);
        assert_eq!(config.store_url, "redis://localhost:6379");
        assert_eq!(config.watch, WatchPolicy::default());
        assert_eq!(config.store_delete_attempts, 3);
    }

    #[test]
    fn zero_max_polls_means_unbounded() {
        let config = Cli::try_parse_from(["berthd", "--max-polls", "0", "--poll-interval-secs", "1"])
            .unwrap()
            .into_config();
        assert_eq!(config.watch.max_polls, None);
        assert_eq!(config.watch.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "berthd",
            "--host",
            "127.0.0.1",
            "--grpc-port",
            "7000",
            "--redis-url",
            "memory://",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));

        let config = cli.into_config();
        assert_eq!(config.listen_addr(), ("127.0.0.1", 7000));
        assert_eq!(config.store_url, "memory://");
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Cli::try_parse_from(["berthd", "--log-format", "xml"]).is_err());
    }
}
