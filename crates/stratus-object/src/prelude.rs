//! Convenience re-exports.

pub use crate::client::{GetOutput, ObjectStoreClient, PutOutput};
pub use crate::providers::{
    AzureCredentials, AzureProvider, Client, MemoryCredentials, MemoryProvider, S3Credentials,
    S3Provider,
};
pub use crate::types::{DeleteSnapshots, Error, Result, Snapshot};
