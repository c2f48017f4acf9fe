//! In-memory provider using [`object_store::memory::InMemory`].
//!
//! Nothing is persisted; useful for dry runs and tests.

use derive_more::Deref;
use object_store::memory::InMemory;
use serde::{Deserialize, Serialize};

use super::Client;
use crate::client::ObjectStoreClient;
use crate::types::Error;

/// Credentials for the in-memory provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryCredentials {
    /// Container name reported by the client.
    pub container: String,
}

/// In-memory object storage client.
#[derive(Debug, Deref)]
pub struct MemoryProvider(ObjectStoreClient);

impl Client for MemoryProvider {
    type Credentials = MemoryCredentials;

    const ID: &str = "memory";

    async fn connect(creds: &Self::Credentials) -> Result<Self, Error> {
        if creds.container.is_empty() {
            return Err(Error::invalid_credentials("container name is required"));
        }

        Ok(Self(ObjectStoreClient::new(
            creds.container.clone(),
            InMemory::new(),
        )))
    }

    fn into_inner(self) -> ObjectStoreClient {
        self.0
    }
}
