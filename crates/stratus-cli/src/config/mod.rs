//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── storage: StorageConfig   # Provider, container, credentials
//! ├── logging: LoggingConfig   # Log output format
//! └── command: Command         # list | snapshots | demo
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod command;
mod logging;
mod storage;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use command::{Command, DemoArgs, ListArgs, SnapshotArgs};
pub use logging::{LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
pub use storage::{ProviderKind, StorageConfig};

use crate::TRACING_TARGET_STARTUP;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "stratus")]
#[command(about = "Blob storage listing, snapshot and delete walkthrough")]
#[command(version)]
pub struct Cli {
    /// Storage provider and credentials.
    #[clap(flatten)]
    pub storage: StorageConfig,

    /// Log output configuration.
    #[clap(flatten)]
    pub logging: LoggingConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so that values
    /// from it act as environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.storage
            .validate()
            .context("invalid storage configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.storage.log();
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_defaults() {
        let cli = Cli::try_parse_from(["stratus", "--provider", "memory", "list"]).unwrap();

        assert_eq!(cli.storage.provider, ProviderKind::Memory);
        assert_eq!(cli.storage.container, "demo");
        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.page_size, 3);
        assert_eq!(args.prefix, "");
    }

    #[test]
    fn rejects_zero_page_size() {
        let result = Cli::try_parse_from(["stratus", "list", "--page-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_demo_arguments() {
        let cli = Cli::try_parse_from([
            "stratus",
            "--container",
            "photos",
            "demo",
            "--blob",
            "notes.txt",
            "--workdir",
            "/tmp/stratus",
        ])
        .unwrap();

        assert_eq!(cli.storage.container, "photos");
        let Command::Demo(args) = cli.command else {
            panic!("expected demo command");
        };
        assert_eq!(args.blob, "notes.txt");
        assert_eq!(args.workdir, std::path::PathBuf::from("/tmp/stratus"));
    }
}
