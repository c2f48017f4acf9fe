//! Result type for [`ObjectStoreClient::get`](super::ObjectStoreClient::get).

use bytes::Bytes;
use jiff::Timestamp;
use object_store::ObjectMeta;

/// Contents and properties of a downloaded blob.
#[derive(Debug, Clone)]
pub struct GetOutput {
    /// Raw bytes of the blob.
    pub data: Bytes,
    /// MIME content-type, if the backend provides one.
    pub content_type: Option<String>,
    /// Size in bytes reported by the backend.
    pub size: u64,
    /// Last modification time.
    pub last_modified: Option<Timestamp>,
    /// Entity tag, if the backend provides one.
    pub e_tag: Option<String>,
}

impl GetOutput {
    pub(super) fn new(data: Bytes, content_type: Option<String>, meta: ObjectMeta) -> Self {
        Self {
            data,
            content_type,
            size: meta.size,
            last_modified: Timestamp::from_millisecond(meta.last_modified.timestamp_millis()).ok(),
            e_tag: meta.e_tag,
        }
    }
}
