//! Subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};

/// Blob used by the walkthrough when none is given.
const DEFAULT_BLOB: &str = "test-file.txt";

/// Operation to run against the configured container.
#[derive(Debug, Clone, Subcommand, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// List blobs page by page, following the continuation cursor.
    List(ListArgs),
    /// List the snapshots of one blob.
    Snapshots(SnapshotArgs),
    /// Upload, download, snapshot, restore and delete a blob.
    Demo(DemoArgs),
}

/// Arguments of `stratus list`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ListArgs {
    /// Only list blobs whose name starts with this prefix.
    #[arg(long, default_value = "")]
    #[serde(default)]
    pub prefix: String,

    /// Maximum number of blobs fetched per request.
    #[arg(long, env = "STRATUS_PAGE_SIZE", default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,
}

/// Arguments of `stratus snapshots`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct SnapshotArgs {
    /// Blob whose snapshots are listed.
    #[arg(long, default_value = DEFAULT_BLOB)]
    pub blob: String,

    /// Maximum number of entries fetched per request.
    #[arg(long, env = "STRATUS_PAGE_SIZE", default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,
}

/// Arguments of `stratus demo`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct DemoArgs {
    /// Blob the walkthrough uploads, snapshots and finally deletes.
    #[arg(long, default_value = DEFAULT_BLOB)]
    pub blob: String,

    /// Directory for the local files written and downloaded.
    #[arg(long, env = "STRATUS_WORKDIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Maximum number of entries fetched per listing request.
    #[arg(long, env = "STRATUS_PAGE_SIZE", default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,
}
