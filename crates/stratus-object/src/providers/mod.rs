//! Client trait and object storage providers.

mod azure;
mod memory;
mod provider;
mod s3;

pub use azure::{AzureCredentials, AzureProvider};
pub use memory::{MemoryCredentials, MemoryProvider};
pub use provider::Client;
pub use s3::{S3Credentials, S3Provider};
