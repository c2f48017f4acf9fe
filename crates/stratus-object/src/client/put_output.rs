//! Result type for [`ObjectStoreClient::put`](super::ObjectStoreClient::put) and
//! the uploads built on it.

/// Result of a successful upload.
#[derive(Debug, Clone, Default)]
pub struct PutOutput {
    /// Entity tag of the stored blob, if the backend provides one.
    pub e_tag: Option<String>,
    /// Version identifier of the stored blob, if the backend provides one.
    pub version: Option<String>,
}

impl From<object_store::PutResult> for PutOutput {
    fn from(r: object_store::PutResult) -> Self {
        Self {
            e_tag: r.e_tag,
            version: r.version,
        }
    }
}
