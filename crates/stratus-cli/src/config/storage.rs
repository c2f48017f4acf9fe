//! Storage provider configuration.

use std::path::PathBuf;

use anyhow::{Context, Result as AnyhowResult, anyhow, bail};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use stratus_object::prelude::*;

use crate::TRACING_TARGET_CONFIG;

/// Storage backend selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Azure Blob Storage.
    Azure,
    /// Amazon S3 or an S3-compatible service.
    S3,
    /// Process-local in-memory store; nothing is persisted.
    Memory,
}

/// Storage provider configuration.
///
/// # Environment Variables
///
/// - `STRATUS_PROVIDER` - `azure`, `s3` or `memory` (default: azure)
/// - `STRATUS_CONTAINER` - Container (or bucket) name (default: demo)
/// - `AZURE_STORAGE_CONNECTION_STRING` - Azure connection string
/// - `AZURE_STORAGE_ACCOUNT` / `AZURE_STORAGE_KEY` - Azure account and key
/// - `STRATUS_CONNECTION_STRING_FILE` - File holding the connection string
/// - `STRATUS_ENDPOINT` - Custom endpoint (Azurite, MinIO, sovereign clouds)
/// - `AWS_REGION` - S3 region; other `AWS_*` variables are read by the S3 client
#[derive(Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageConfig {
    /// Storage backend.
    #[arg(long, env = "STRATUS_PROVIDER", value_enum, default_value_t = ProviderKind::Azure)]
    pub provider: ProviderKind,

    /// Container (Azure) or bucket (S3) to operate on.
    #[arg(long, env = "STRATUS_CONTAINER", default_value = "demo")]
    pub container: String,

    /// Azure storage connection string.
    #[arg(long, env = "AZURE_STORAGE_CONNECTION_STRING", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub connection_string: Option<String>,

    /// File holding the Azure connection string, used when no other credentials are given.
    #[arg(
        long,
        env = "STRATUS_CONNECTION_STRING_FILE",
        default_value = "StorageConnectionString.txt"
    )]
    pub connection_string_file: PathBuf,

    /// Azure storage account name.
    #[arg(long, env = "AZURE_STORAGE_ACCOUNT")]
    pub account_name: Option<String>,

    /// Azure storage account key.
    #[arg(long, env = "AZURE_STORAGE_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub account_key: Option<String>,

    /// Custom service endpoint.
    #[arg(long, env = "STRATUS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// S3 region.
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,
}

impl StorageConfig {
    /// Validates configuration values that do not require reading credentials.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.container.trim().is_empty() {
            bail!("container name must not be empty");
        }

        if self.account_key.is_some() && self.account_name.is_none() {
            bail!("--account-key requires --account-name");
        }

        Ok(())
    }

    /// Logs the configuration without credentials.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            provider = ?self.provider,
            container = %self.container,
            endpoint = ?self.endpoint,
            has_connection_string = self.connection_string.is_some(),
            has_account_key = self.account_key.is_some(),
            "Storage configuration"
        );
    }

    /// Builds a client for the configured provider.
    pub async fn connect(&self) -> AnyhowResult<ObjectStoreClient> {
        let client = match self.provider {
            ProviderKind::Azure => {
                let creds = self.azure_credentials()?;
                AzureProvider::connect(&creds).await?.into_inner()
            }
            ProviderKind::S3 => {
                let creds = S3Credentials {
                    bucket: self.container.clone(),
                    region: self.region.clone(),
                    endpoint: self.endpoint.clone(),
                    access_key_id: None,
                    secret_access_key: None,
                };
                S3Provider::connect(&creds).await?.into_inner()
            }
            ProviderKind::Memory => {
                let creds = MemoryCredentials {
                    container: self.container.clone(),
                };
                MemoryProvider::connect(&creds).await?.into_inner()
            }
        };

        Ok(client)
    }

    /// Resolves Azure credentials from flags, environment, or the connection string file.
    pub fn azure_credentials(&self) -> AnyhowResult<AzureCredentials> {
        let mut creds = if let Some(conn) = &self.connection_string {
            AzureCredentials::from_connection_string(&self.container, conn)
                .context("invalid Azure connection string")?
        } else if let Some(account) = &self.account_name {
            AzureCredentials {
                container: self.container.clone(),
                account_name: account.clone(),
                access_key: self.account_key.clone(),
                ..Default::default()
            }
        } else {
            let path = &self.connection_string_file;
            let conn = std::fs::read_to_string(path).map_err(|e| {
                anyhow!(
                    "no Azure credentials given and {} could not be read: {e}",
                    path.display()
                )
            })?;
            AzureCredentials::from_connection_string(&self.container, &conn)
                .with_context(|| format!("invalid connection string in {}", path.display()))?
        };

        if let Some(endpoint) = &self.endpoint {
            creds.endpoint = Some(endpoint.clone());
        }

        Ok(creds)
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("provider", &self.provider)
            .field("container", &self.container)
            .field("connection_string_file", &self.connection_string_file)
            .field("account_name", &self.account_name)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
