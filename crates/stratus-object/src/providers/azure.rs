//! Azure Blob Storage provider using [`object_store::azure::MicrosoftAzureBuilder`].

use derive_more::Deref;
use object_store::azure::MicrosoftAzureBuilder;
use serde::{Deserialize, Serialize};

use super::Client;
use crate::TRACING_TARGET;
use crate::client::ObjectStoreClient;
use crate::types::Error;

/// Account name used by the local storage emulator (Azurite).
const EMULATOR_ACCOUNT: &str = "devstoreaccount1";

/// Endpoint suffix of the public Azure cloud.
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Typed credentials for Azure Blob Storage.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureCredentials {
    /// Azure storage container name.
    pub container: String,
    /// Azure storage account name.
    pub account_name: String,
    /// Storage account access key.
    #[serde(default)]
    pub access_key: Option<String>,
    /// Shared Access Signature token.
    #[serde(default)]
    pub sas_token: Option<String>,
    /// Custom blob endpoint URL (sovereign clouds, Azure Stack, Azurite).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Target the local storage emulator with its well-known key.
    #[serde(default)]
    pub use_emulator: bool,
}

impl AzureCredentials {
    /// Parses an Azure storage connection string.
    ///
    /// Accepts the `Key=Value;Key=Value` form shown in the Azure portal,
    /// e.g. `DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net`,
    /// as well as `UseDevelopmentStorage=true`. Unknown keys are ignored.
    pub fn from_connection_string(
        container: impl Into<String>,
        connection_string: &str,
    ) -> Result<Self, Error> {
        let mut creds = Self {
            container: container.into(),
            ..Default::default()
        };
        let mut protocol = "https";
        let mut suffix = None;

        for pair in connection_string.trim().split(';').filter(|p| !p.trim().is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::invalid_credentials(format!("malformed connection string segment: {pair}"))
            })?;
            let value = value.trim();

            match key.trim() {
                "DefaultEndpointsProtocol" => protocol = value,
                "AccountName" => creds.account_name = value.to_owned(),
                "AccountKey" => creds.access_key = Some(value.to_owned()),
                "SharedAccessSignature" => creds.sas_token = Some(value.to_owned()),
                "BlobEndpoint" => creds.endpoint = Some(value.to_owned()),
                "EndpointSuffix" => suffix = Some(value),
                "UseDevelopmentStorage" => creds.use_emulator = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        if creds.use_emulator {
            if creds.account_name.is_empty() {
                creds.account_name = EMULATOR_ACCOUNT.to_owned();
            }
            return Ok(creds);
        }

        if creds.account_name.is_empty() {
            return Err(Error::invalid_credentials(
                "connection string has no AccountName",
            ));
        }

        if creds.access_key.is_none() && creds.sas_token.is_none() {
            return Err(Error::invalid_credentials(
                "connection string has neither AccountKey nor SharedAccessSignature",
            ));
        }

        if creds.endpoint.is_none()
            && let Some(suffix) = suffix.filter(|s| *s != DEFAULT_ENDPOINT_SUFFIX)
        {
            creds.endpoint = Some(format!(
                "{protocol}://{}.blob.{suffix}",
                creds.account_name
            ));
        }

        Ok(creds)
    }
}

impl std::fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("container", &self.container)
            .field("account_name", &self.account_name)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("sas_token", &self.sas_token.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("use_emulator", &self.use_emulator)
            .finish()
    }
}

/// Splits a SAS token (`?sv=...&sig=...`) into query pairs.
fn sas_pairs(sas: &str) -> Vec<(String, String)> {
    sas.trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_owned(), value.to_owned()),
            None => (pair.to_owned(), String::new()),
        })
        .collect()
}

/// Azure Blob Storage-backed object storage client.
#[derive(Debug, Deref)]
pub struct AzureProvider(ObjectStoreClient);

impl Client for AzureProvider {
    type Credentials = AzureCredentials;

    const ID: &str = "azure";

    async fn connect(creds: &Self::Credentials) -> Result<Self, Error> {
        if creds.container.is_empty() {
            return Err(Error::invalid_credentials("container name is required"));
        }

        let mut builder = MicrosoftAzureBuilder::new()
            .with_container_name(&creds.container)
            .with_account(&creds.account_name);

        if creds.use_emulator {
            builder = builder.with_use_emulator(true);
        }

        if let Some(key) = &creds.access_key {
            builder = builder.with_access_key(key);
        }

        if let Some(sas) = &creds.sas_token {
            builder = builder.with_sas_authorization(sas_pairs(sas));
        }

        if let Some(endpoint) = &creds.endpoint {
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| Error::connection(Self::ID, "failed to build Azure client").with_source(e))?;

        tracing::info!(
            target: TRACING_TARGET,
            account = %creds.account_name,
            container = %creds.container,
            emulator = creds.use_emulator,
            "Azure Blob Storage client initialized"
        );

        Ok(Self(ObjectStoreClient::new_paginated(
            creds.container.clone(),
            store,
        )))
    }

    fn into_inner(self) -> ObjectStoreClient {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_portal_connection_string() {
        let creds = AzureCredentials::from_connection_string(
            "demo",
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=a2V5PT0=;EndpointSuffix=core.windows.net",
        )
        .unwrap();

        assert_eq!(creds.container, "demo");
        assert_eq!(creds.account_name, "acct");
        assert_eq!(creds.access_key.as_deref(), Some("a2V5PT0="));
        assert_eq!(creds.endpoint, None);
        assert!(!creds.use_emulator);
    }

    #[test]
    fn sovereign_suffix_builds_endpoint() {
        let creds = AzureCredentials::from_connection_string(
            "demo",
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=k;EndpointSuffix=core.chinacloudapi.cn;",
        )
        .unwrap();

        assert_eq!(
            creds.endpoint.as_deref(),
            Some("https://acct.blob.core.chinacloudapi.cn")
        );
    }

    #[test]
    fn explicit_blob_endpoint_wins() {
        let creds = AzureCredentials::from_connection_string(
            "demo",
            "AccountName=acct;SharedAccessSignature=sv=2022&sig=abc;BlobEndpoint=http://127.0.0.1:10000/acct;EndpointSuffix=example.net",
        )
        .unwrap();

        assert_eq!(creds.endpoint.as_deref(), Some("http://127.0.0.1:10000/acct"));
        assert_eq!(creds.sas_token.as_deref(), Some("sv=2022&sig=abc"));
    }

    #[test]
    fn development_storage() {
        let creds =
            AzureCredentials::from_connection_string("demo", "UseDevelopmentStorage=true").unwrap();

        assert!(creds.use_emulator);
        assert_eq!(creds.account_name, EMULATOR_ACCOUNT);
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = AzureCredentials::from_connection_string("demo", "AccountName=acct").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(_)));

        let err = AzureCredentials::from_connection_string("demo", "AccountKey=k").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(_)));

        let err = AzureCredentials::from_connection_string("demo", "garbage").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(_)));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds =
            AzureCredentials::from_connection_string("demo", "AccountName=acct;AccountKey=hunter2")
                .unwrap();
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn splits_sas_pairs() {
        assert_eq!(
            sas_pairs("?sv=2022-11-02&sig=abc%3D&flag"),
            [
                ("sv".to_owned(), "2022-11-02".to_owned()),
                ("sig".to_owned(), "abc%3D".to_owned()),
                ("flag".to_owned(), String::new()),
            ]
        );
    }

    #[tokio::test]
    async fn connect_to_emulator_without_network() {
        let creds =
            AzureCredentials::from_connection_string("demo", "UseDevelopmentStorage=true").unwrap();
        let provider = AzureProvider::connect(&creds).await.unwrap();
        assert_eq!(provider.container(), "demo");
        assert!(provider.paginated_store().is_some());
    }
}
