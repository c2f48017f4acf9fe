//! [`PageSource`] implementation for [`ObjectStoreClient`].
//!
//! Backends with a native paged listing (Azure Blob Storage, S3) serve each
//! page with one bounded `list_paginated` request, and the service's own
//! continuation token becomes the cursor. Other stores fall back to
//! `list_with_offset`, resuming strictly after the last key of the previous
//! page; there the token is that key and backends are expected to list in
//! lexicographic key order, which holds for the in-memory store.

use futures::TryStreamExt;
use jiff::Timestamp;
use object_store::ObjectMeta;
use object_store::list::{PaginatedListOptions, PaginatedListStore};
use object_store::path::Path;
use stratus_listing::{ContinuationToken, Cursor, Item, ListingRequest, Page, PageSource};

use super::ObjectStoreClient;
use crate::TRACING_TARGET;
use crate::types::snapshot::{IS_SNAPSHOT_KEY, SNAPSHOT_NAMESPACE, SNAPSHOT_TIME_KEY};
use crate::types::{Error, Result, Snapshot};

#[async_trait::async_trait]
impl PageSource for ObjectStoreClient {
    type Error = Error;

    async fn list_page(&self, request: &ListingRequest) -> Result<Page> {
        if request.resource() != self.container {
            return Err(Error::InvalidResource {
                requested: request.resource().to_owned(),
                container: self.container.clone(),
            });
        }

        match self.paginated_store() {
            Some(pages) => self.native_page(pages, request).await,
            None => self.offset_page(request).await,
        }
    }
}

impl ObjectStoreClient {
    /// One `list_paginated` request of at most `page_size` keys.
    async fn native_page(
        &self,
        pages: &dyn PaginatedListStore,
        request: &ListingRequest,
    ) -> Result<Page> {
        let prefix = request.prefix();
        let include_snapshots = prefix.starts_with(SNAPSHOT_NAMESPACE);

        let page_token = match request.cursor() {
            Cursor::Absent => None,
            Cursor::Present(token) => Some(decode_token(token)?.to_owned()),
        };

        let opts = PaginatedListOptions {
            max_keys: Some(request.page_size().get() as usize),
            page_token,
            ..Default::default()
        };

        let listed = pages
            .list_paginated((!prefix.is_empty()).then_some(prefix), opts)
            .await?;

        let read = listed.result.objects.len();
        let items: Vec<_> = listed
            .result
            .objects
            .iter()
            .map(|meta| (meta.location.to_string(), meta))
            .filter(|(key, _)| include_snapshots || !Snapshot::is_snapshot_key(key))
            .map(|(key, meta)| to_item(&key, meta))
            .collect();

        let cursor = listed
            .page_token
            .filter(|token| !token.is_empty())
            .map_or(Cursor::Absent, Cursor::present);

        self.trace_page(prefix, read, &items, &cursor);
        Ok(Page::new(items, cursor))
    }

    /// Reads at most `page_size` keys from `list_with_offset`.
    async fn offset_page(&self, request: &ListingRequest) -> Result<Page> {
        let prefix = request.prefix();
        let limit = request.page_size().get() as usize;
        let include_snapshots = prefix.starts_with(SNAPSHOT_NAMESPACE);

        // object_store prefixes match whole path segments, so list from the
        // enclosing directory and apply the string prefix here.
        let directory = prefix
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .filter(|dir| !dir.is_empty())
            .map(Path::from);

        let mut entries = match request.cursor() {
            Cursor::Absent => self.store().list(directory.as_ref()),
            Cursor::Present(token) => {
                let offset = Path::parse(decode_token(token)?)
                    .map_err(|_| Error::InvalidCursor(format!("{token:?}")))?;
                self.store().list_with_offset(directory.as_ref(), &offset)
            }
        };

        let mut items = Vec::new();
        let mut read = 0usize;
        let mut last_key = None;
        let mut past_prefix = false;

        while let Some(meta) = entries.try_next().await? {
            let key = meta.location.to_string();
            read += 1;

            if key.starts_with(prefix) {
                if include_snapshots || !Snapshot::is_snapshot_key(&key) {
                    items.push(to_item(&key, &meta));
                }
            } else if key.as_str() > prefix {
                past_prefix = true;
                break;
            }

            last_key = Some(key);
            if read == limit {
                break;
            }
        }

        let cursor = match last_key {
            Some(key) if read == limit && !past_prefix => Cursor::present(key),
            _ => Cursor::Absent,
        };

        self.trace_page(prefix, read, &items, &cursor);
        Ok(Page::new(items, cursor))
    }

    fn trace_page(&self, prefix: &str, read: usize, items: &[Item], cursor: &Cursor) {
        tracing::trace!(
            target: TRACING_TARGET,
            container = %self.container,
            prefix,
            read,
            items = items.len(),
            has_more = cursor.is_present(),
            "Read listing page"
        );
    }
}

fn decode_token(token: &ContinuationToken) -> Result<&str> {
    token
        .as_str()
        .ok_or_else(|| Error::InvalidCursor(format!("{token:?}")))
}

fn to_item(key: &str, meta: &ObjectMeta) -> Item {
    let mut item = Item::new(key).with_size(meta.size);

    if let Ok(ts) = Timestamp::from_millisecond(meta.last_modified.timestamp_millis()) {
        item = item.with_last_modified(ts);
    }

    if let Some(snapshot) = Snapshot::from_key(key) {
        item = item
            .with_metadata(SNAPSHOT_TIME_KEY, snapshot.taken_at.to_string())
            .with_metadata(IS_SNAPSHOT_KEY, "true");
    }

    item
}
