//! Segmented listing driver.
//!
//! [`SegmentedLister`] repeatedly calls a [`PageSource`], forwarding each
//! page's cursor into the next request until the source reports the
//! cursor absent. Items are yielded lazily, in the order the source
//! returned them.

use std::num::NonZeroU32;

use futures::TryStreamExt;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::{Cursor, Item, ListingError, ListingRequest, ListingResult, Page, PageSource};
use crate::TRACING_TARGET;

/// A lazy stream of listed items.
pub type ItemStream<'a> = BoxStream<'a, ListingResult<Item>>;

/// Drives a [`PageSource`] until its continuation cursor is exhausted.
///
/// The lister holds no state between listings; every call to
/// [`list_all`](Self::list_all) starts from the first page.
#[derive(Debug, Clone)]
pub struct SegmentedLister<S> {
    source: S,
    cancel: Option<CancellationToken>,
}

impl<S: PageSource> SegmentedLister<S> {
    /// Creates a lister over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cancel: None,
        }
    }

    /// Stops issuing page requests once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the underlying page source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Lists every item of `resource` whose name starts with `prefix`.
    ///
    /// Arguments are validated before the stream is built, so an
    /// [`InvalidArgument`](ListingError::InvalidArgument) error never
    /// costs a remote call. Fetch failures and cancellation are yielded as
    /// the final element of the stream.
    pub fn list_all(
        &self,
        resource: &str,
        prefix: &str,
        page_size: u32,
    ) -> ListingResult<ItemStream<'_>> {
        if resource.trim().is_empty() {
            return Err(ListingError::invalid_argument("resource must not be empty"));
        }

        let Some(page_size) = NonZeroU32::new(page_size) else {
            return Err(ListingError::invalid_argument(
                "page size must be greater than zero",
            ));
        };

        let resource = resource.to_owned();
        let prefix = prefix.to_owned();
        let source = &self.source;
        let cancel = self.cancel.clone();

        let stream = async_stream::stream! {
            let mut cursor = Cursor::Absent;
            let mut emitted = 0u64;
            let mut pages = 0u64;

            loop {
                if cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        resource = %resource,
                        emitted,
                        "Listing cancelled between pages"
                    );
                    yield Err(ListingError::cancelled(emitted));
                    break;
                }

                let request = ListingRequest::new(resource.as_str(), prefix.as_str(), page_size, cursor);
                pages += 1;

                let fetched = match &cancel {
                    Some(token) => tokio::select! {
                        biased;
                        () = token.cancelled() => None,
                        result = source.list_page(&request) => Some(result),
                    },
                    None => Some(source.list_page(&request).await),
                };

                let Page { items, cursor: next } = match fetched {
                    Some(Ok(page)) => page,
                    Some(Err(err)) => {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            resource = %resource,
                            page = pages,
                            emitted,
                            error = %err,
                            "Page fetch failed"
                        );
                        yield Err(ListingError::remote(emitted, request.into_cursor(), err));
                        break;
                    }
                    None => {
                        tracing::debug!(
                            target: TRACING_TARGET,
                            resource = %resource,
                            page = pages,
                            emitted,
                            "Listing cancelled during page fetch"
                        );
                        yield Err(ListingError::cancelled(emitted));
                        break;
                    }
                };

                tracing::debug!(
                    target: TRACING_TARGET,
                    resource = %resource,
                    page = pages,
                    items = items.len(),
                    has_more = next.is_present(),
                    "Fetched page"
                );

                for item in items {
                    emitted += 1;
                    yield Ok(item);
                }

                match next {
                    Cursor::Present(token) => cursor = Cursor::Present(token),
                    Cursor::Absent => break,
                }
            }

            tracing::trace!(
                target: TRACING_TARGET,
                resource = %resource,
                pages,
                emitted,
                "Listing finished"
            );
        };

        Ok(Box::pin(stream))
    }

    /// Drains [`list_all`](Self::list_all) into a vector.
    pub async fn collect_all(
        &self,
        resource: &str,
        prefix: &str,
        page_size: u32,
    ) -> ListingResult<Vec<Item>> {
        self.list_all(resource, prefix, page_size)?
            .try_collect()
            .await
    }
}
