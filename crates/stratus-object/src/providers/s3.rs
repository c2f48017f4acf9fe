//! S3-compatible provider using [`object_store::aws::AmazonS3Builder`].
//!
//! Works with AWS S3, MinIO, and any S3-compatible service. The bucket
//! plays the role of the container.

use derive_more::Deref;
use object_store::aws::AmazonS3Builder;
use serde::{Deserialize, Serialize};

use super::Client;
use crate::TRACING_TARGET;
use crate::client::ObjectStoreClient;
use crate::types::Error;

/// Typed credentials for S3-compatible storage.
///
/// Unset fields fall back to the standard `AWS_*` environment variables.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    /// Bucket name.
    pub bucket: String,
    /// AWS region.
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint URL (e.g. `http://localhost:9000` for MinIO).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key ID for static credentials.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Secret access key for static credentials.
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// S3-backed object storage client.
#[derive(Debug, Deref)]
pub struct S3Provider(ObjectStoreClient);

impl Client for S3Provider {
    type Credentials = S3Credentials;

    const ID: &str = "s3";

    async fn connect(creds: &Self::Credentials) -> Result<Self, Error> {
        if creds.bucket.is_empty() {
            return Err(Error::invalid_credentials("bucket name is required"));
        }

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(&creds.bucket);

        if let Some(region) = &creds.region {
            builder = builder.with_region(region);
        }

        if let Some(endpoint) = &creds.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        match (&creds.access_key_id, &creds.secret_access_key) {
            (Some(id), Some(secret)) => {
                builder = builder
                    .with_access_key_id(id)
                    .with_secret_access_key(secret);
            }
            (None, None) => {}
            _ => {
                return Err(Error::invalid_credentials(
                    "access key id and secret access key must be set together",
                ));
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::connection(Self::ID, "failed to build S3 client").with_source(e))?;

        tracing::info!(
            target: TRACING_TARGET,
            bucket = %creds.bucket,
            endpoint = ?creds.endpoint,
            "S3 client initialized"
        );

        Ok(Self(ObjectStoreClient::new_paginated(
            creds.bucket.clone(),
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

    fn creds() -> S3Credentials {
        S3Credentials {
            bucket: "demo".to_owned(),
            region: Some("us-east-1".to_owned()),
            endpoint: Some("http://localhost:9000".to_owned()),
            access_key_id: Some("minio".to_owned()),
            secret_access_key: Some("minio-secret".to_owned()),
        }
    }

    #[tokio::test]
    async fn connect_with_static_keys() {
        let provider = S3Provider::connect(&creds()).await.unwrap();
        assert_eq!(provider.container(), "demo");
        assert!(provider.paginated_store().is_some());
    }

    #[tokio::test]
    async fn half_a_key_pair_is_rejected() {
        let creds = S3Credentials {
            secret_access_key: None,
            ..creds()
        };
        let err = S3Provider::connect(&creds).await.unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(_)));
    }

    #[test]
    fn debug_redacts_secret() {
        assert!(!format!("{:?}", creds()).contains("minio-secret"));
    }
}
