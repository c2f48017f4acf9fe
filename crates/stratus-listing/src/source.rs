//! The paging primitive consumed by the lister.

use std::sync::Arc;

use crate::{ListingRequest, Page};

/// A remote resource that can be read one bounded page at a time.
///
/// Implementations issue exactly one remote call per invocation and must
/// not retry on their own behalf.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Error returned by a failed page fetch.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the page described by `request`.
    async fn list_page(&self, request: &ListingRequest) -> Result<Page, Self::Error>;
}

#[async_trait::async_trait]
impl<T: PageSource + ?Sized> PageSource for &T {
    type Error = T::Error;

    async fn list_page(&self, request: &ListingRequest) -> Result<Page, Self::Error> {
        (**self).list_page(request).await
    }
}

#[async_trait::async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    type Error = T::Error;

    async fn list_page(&self, request: &ListingRequest) -> Result<Page, Self::Error> {
        (**self).list_page(request).await
    }
}
