#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod telemetry;

use std::process;

use anyhow::Context;
use stack_blob::ObjectBlobStore;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "stack_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "stack_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "stack_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "stack_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    cli.log();

    let store = ObjectBlobStore::from_config(&cli.store).context("failed to create blob store")?;

    let mut stdout = tokio::io::stdout();
    cli.command.execute(&store, &mut stdout).await
}
