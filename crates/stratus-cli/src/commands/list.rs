//! `stratus list`.

use anyhow::Context;
use futures::TryStreamExt;
use stratus_listing::{Item, SegmentedLister};
use stratus_object::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_COMMAND;

/// Lists the container page by page and logs every blob name.
pub async fn list_blobs(
    client: &ObjectStoreClient,
    prefix: &str,
    page_size: u32,
    cancel: &CancellationToken,
) -> anyhow::Result<Vec<Item>> {
    let lister = SegmentedLister::new(client).with_cancellation(cancel.clone());
    let mut stream = lister.list_all(client.container(), prefix, page_size)?;

    let mut items = Vec::new();
    while let Some(item) = stream
        .try_next()
        .await
        .with_context(|| format!("failed to list container '{}'", client.container()))?
    {
        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            blob = %item.name,
            size = ?item.size,
            "Blob name: {}",
            item.name
        );
        items.push(item);
    }

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        container = client.container(),
        count = items.len(),
        "Listing finished"
    );
    Ok(items)
}

#[cfg(test)]
mod tests {
    use stratus_listing::ListingError;

    use super::*;

    async fn client_with(names: &[&str]) -> ObjectStoreClient {
        let creds = MemoryCredentials {
            container: "demo".to_owned(),
        };
        let client = MemoryProvider::connect(&creds).await.unwrap().into_inner();
        for name in names {
            client.put(name, name.to_string().into(), None).await.unwrap();
        }
        client
    }

    #[tokio::test]
    async fn lists_every_blob_across_pages() {
        let client = client_with(&["a", "b", "c", "d", "e", "f", "g"]).await;
        let cancel = CancellationToken::new();

        let items = list_blobs(&client, "", 3, &cancel).await.unwrap();
        let names: Vec<_> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[tokio::test]
    async fn cancelled_listing_reports_cancellation() {
        let client = client_with(&["a", "b"]).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = list_blobs(&client, "", 1, &cancel).await.unwrap_err();
        let listing = err.downcast_ref::<ListingError>().unwrap();
        assert!(listing.is_cancelled());
    }
}
