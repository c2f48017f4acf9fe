#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod shutdown;
mod telemetry;

use std::process;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "stratus_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "stratus_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "stratus_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "stratus_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = format!("{error:#}"),
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(&cli.logging)?;
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "Starting stratus"
    );

    cli.log();
    cli.validate()?;

    let client = cli
        .storage
        .connect()
        .await
        .context("failed to connect to storage")?;
    client
        .verify_reachable()
        .await
        .with_context(|| format!("container '{}' is not reachable", client.container()))?;

    let cancel = CancellationToken::new();
    let signals = shutdown::cancel_on_signal(cancel.clone());

    let result = commands::execute(&client, &cli.command, &cancel).await;
    signals.abort();

    result
}
