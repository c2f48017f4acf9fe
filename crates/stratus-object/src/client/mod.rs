//! Container-scoped blob client backed by [`object_store::ObjectStore`].
//!
//! [`ObjectStoreClient`] is a thin, cloneable wrapper around
//! `Arc<dyn ObjectStore>` bound to a single container. Every public method
//! is instrumented with [`tracing`] for observability.

use std::sync::Arc;

use bytes::Bytes;
use object_store::list::PaginatedListStore;
use object_store::path::Path;
use object_store::{ObjectStore, PutMode, PutOptions, PutPayload};
use stratus_listing::{Item, SegmentedLister};
use tokio_util::sync::CancellationToken;

use crate::types::{Error, Result, Snapshot};

mod file;
mod get_output;
mod pager;
mod put_output;
mod snapshot;

pub use get_output::GetOutput;
pub use put_output::PutOutput;

/// Cloneable handle to one container of any [`ObjectStore`] backend.
///
/// Blob names are plain string keys; `/` separates virtual directories.
/// Names under the snapshot namespace are reserved and rejected by writes.
#[derive(Clone)]
pub struct ObjectStoreClient {
    store: Arc<dyn ObjectStore>,
    pages: Option<Arc<dyn PaginatedListStore>>,
    container: String,
    cancel: Option<CancellationToken>,
}

impl ObjectStoreClient {
    /// Wrap a concrete [`ObjectStore`] implementation serving `container`.
    ///
    /// Listings page through `list_with_offset`, resuming after the last key.
    pub fn new(container: impl Into<String>, store: impl ObjectStore) -> Self {
        Self {
            store: Arc::new(store),
            pages: None,
            container: container.into(),
            cancel: None,
        }
    }

    /// Wrap a store that also exposes the service's native paged listing.
    ///
    /// Each listing page is then one bounded request carrying the
    /// service's own continuation token.
    pub fn new_paginated<T>(container: impl Into<String>, store: T) -> Self
    where
        T: ObjectStore + PaginatedListStore,
    {
        let store = Arc::new(store);
        Self {
            store: store.clone(),
            pages: Some(store),
            container: container.into(),
            cancel: None,
        }
    }

    /// Serves listing pages from `pages` instead of the object store.
    pub fn with_paginated_store(mut self, pages: Arc<dyn PaginatedListStore>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Ends every listing issued by this client once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Name of the container this client is bound to.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Verify that the backing container is reachable.
    ///
    /// Issues a HEAD for a probe key. A not-found response means the
    /// container answered; any other error is propagated.
    #[tracing::instrument(name = "object.verify", skip(self), fields(container = %self.container))]
    pub async fn verify_reachable(&self) -> Result<()> {
        match self.head("_stratus_verify_probe").await {
            Ok(_) | Err(Error::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Returns true if a blob named `name` exists.
    #[tracing::instrument(name = "object.exists", skip(self))]
    pub async fn exists(&self, name: &str) -> Result<bool> {
        match self.head(name).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Lists blob names under `prefix`, `page_size` entries per request.
    ///
    /// Snapshot copies are not included.
    pub async fn list(&self, prefix: &str, page_size: u32) -> Result<Vec<Item>> {
        let items = self
            .lister()
            .collect_all(&self.container, prefix, page_size)
            .await?;
        Ok(items)
    }

    /// Retrieve the raw bytes, content-type, and metadata stored at `name`.
    #[tracing::instrument(name = "object.get", skip(self))]
    pub async fn get(&self, name: &str) -> Result<GetOutput> {
        let result = self.store.get(&Path::from(name)).await?;
        let content_type = result
            .attributes
            .get(&object_store::Attribute::ContentType)
            .map(|v| v.to_string());
        let meta = result.meta.clone();
        let data = result.bytes().await?;
        Ok(GetOutput::new(data, content_type, meta))
    }

    /// Upload `data` to `name`, replacing any existing blob.
    pub async fn put(
        &self,
        name: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<PutOutput> {
        self.put_opts(name, data, PutMode::Overwrite, content_type)
            .await
    }

    /// Upload `data` to `name` with the specified [`PutMode`].
    #[tracing::instrument(name = "object.put", skip(self, data), fields(size = data.len()))]
    pub async fn put_opts(
        &self,
        name: &str,
        data: Bytes,
        mode: PutMode,
        content_type: Option<&str>,
    ) -> Result<PutOutput> {
        ensure_writable(name)?;

        let mut opts = PutOptions {
            mode,
            ..Default::default()
        };
        if let Some(ct) = content_type {
            opts.attributes
                .insert(object_store::Attribute::ContentType, ct.to_string().into());
        }

        let result = self
            .store
            .put_opts(&Path::from(name), PutPayload::from(data), opts)
            .await?;
        Ok(result.into())
    }

    /// Get blob metadata without downloading the body.
    #[tracing::instrument(name = "object.head", skip(self))]
    pub async fn head(&self, name: &str) -> Result<object_store::ObjectMeta> {
        Ok(self.store.head(&Path::from(name)).await?)
    }

    /// Delete the blob at `name`.
    ///
    /// Snapshots are left untouched; see
    /// [`delete_if_exists`](Self::delete_if_exists) for snapshot-aware deletes.
    #[tracing::instrument(name = "object.delete", skip(self))]
    pub async fn delete(&self, name: &str) -> Result<()> {
        Ok(self.store.delete(&Path::from(name)).await?)
    }

    /// Server-side copy of `src` onto `dst` within the container.
    ///
    /// `dst` must not lie in the snapshot namespace.
    #[tracing::instrument(name = "object.copy", skip(self))]
    pub async fn copy(&self, src: &str, dst: &str) -> Result<()> {
        ensure_writable(dst)?;
        self.copy_unchecked(src, dst).await
    }

    pub(crate) async fn copy_unchecked(&self, src: &str, dst: &str) -> Result<()> {
        Ok(self.store.copy(&Path::from(src), &Path::from(dst)).await?)
    }

    /// Returns the backing store.
    pub(crate) fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Returns the native paged listing, if the backend has one.
    pub(crate) fn paginated_store(&self) -> Option<&dyn PaginatedListStore> {
        self.pages.as_deref()
    }

    /// Builds a lister over this client honouring its cancellation token.
    pub(crate) fn lister(&self) -> SegmentedLister<&Self> {
        let lister = SegmentedLister::new(self);
        match &self.cancel {
            Some(token) => lister.with_cancellation(token.clone()),
            None => lister,
        }
    }
}

impl std::fmt::Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreClient")
            .field("store", &self.store)
            .field("container", &self.container)
            .field("paginated", &self.pages.is_some())
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// Rejects names inside the reserved snapshot namespace.
pub(crate) fn ensure_writable(name: &str) -> Result<()> {
    if Snapshot::is_snapshot_key(name) {
        return Err(Error::ReservedName(name.to_owned()));
    }
    Ok(())
}
