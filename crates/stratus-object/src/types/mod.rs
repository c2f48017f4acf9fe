//! Error and snapshot types shared by the client and providers.

pub mod error;
pub mod snapshot;

pub use error::{Error, Result};
pub use snapshot::{DeleteSnapshots, Snapshot};
