//! # berthd — Berth container service
//!
//! Serves container create/get/delete over gRPC, tracking each container's
//! lifecycle status in a key-value store.

mod args;
mod logging;
mod serve;

use clap::Parser;

use crate::args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref(), cli.log_format)?;

    let config = cli.into_config();
    config.validate()?;
    serve::run(config).await
}
