//! Provider trait for creating container-bound clients.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::client::ObjectStoreClient;
use crate::types::Error;

/// Factory for [`ObjectStoreClient`]s bound to one storage backend.
///
/// Implementations validate their credentials and build the backend store.
/// No network traffic is required to connect; use
/// [`ObjectStoreClient::verify_reachable`] to probe the service.
pub trait Client: Sized + Send {
    /// Strongly-typed credentials for this provider.
    type Credentials: DeserializeOwned + Send + Sync;

    /// Unique identifier (e.g. `"azure"`).
    const ID: &str;

    /// Build a client from `creds`.
    fn connect(creds: &Self::Credentials) -> impl Future<Output = Result<Self, Error>> + Send;

    /// Unwrap the container-bound client.
    fn into_inner(self) -> ObjectStoreClient;
}
