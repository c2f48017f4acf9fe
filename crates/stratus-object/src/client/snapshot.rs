//! Snapshot creation, listing, restore and snapshot-aware deletes.

use jiff::{SignedDuration, Timestamp};

use super::{ObjectStoreClient, ensure_writable};
use crate::TRACING_TARGET;
use crate::types::{DeleteSnapshots, Error, Result, Snapshot};

/// Page size used when enumerating snapshots internally.
const SNAPSHOT_PAGE_SIZE: u32 = 100;

/// Attempts at finding a free snapshot key when two snapshots share a microsecond.
const SNAPSHOT_KEY_ATTEMPTS: i64 = 8;

impl ObjectStoreClient {
    /// Takes a snapshot of the blob at `name`.
    ///
    /// Fails with [`Error::NotFound`] if the blob does not exist.
    #[tracing::instrument(name = "object.snapshot", skip(self))]
    pub async fn snapshot(&self, name: &str) -> Result<Snapshot> {
        ensure_writable(name)?;
        if !self.exists(name).await? {
            return Err(Error::NotFound(name.to_owned()));
        }

        let now = Timestamp::from_microsecond(Timestamp::now().as_microsecond())
            .unwrap_or_else(|_| Timestamp::now());

        for attempt in 0..SNAPSHOT_KEY_ATTEMPTS {
            let taken_at = now + SignedDuration::from_micros(attempt);
            let snapshot = Snapshot::new(name, taken_at);
            let key = snapshot.key();

            if self.exists(&key).await? {
                continue;
            }

            self.copy_unchecked(name, &key).await?;
            tracing::debug!(
                target: TRACING_TARGET,
                blob = name,
                taken_at = %snapshot.taken_at,
                "Snapshot created"
            );
            return Ok(snapshot);
        }

        Err(Error::AlreadyExists(Snapshot::new(name, now).key()))
    }

    /// Lists the snapshots of exactly `name`, oldest first.
    ///
    /// Honours the client's cancellation token.
    #[tracing::instrument(name = "object.list_snapshots", skip(self))]
    pub async fn list_snapshots(&self, name: &str, page_size: u32) -> Result<Vec<Snapshot>> {
        let prefix = Snapshot::prefix_for(name);
        let items = self
            .lister()
            .collect_all(&self.container, &prefix, page_size)
            .await?;

        let mut snapshots: Vec<_> = items
            .iter()
            .filter_map(|item| Snapshot::from_key(&item.name))
            .filter(|snapshot| snapshot.name == name)
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.taken_at);

        Ok(snapshots)
    }

    /// Restores `snapshot` by copying it over its base blob.
    #[tracing::instrument(name = "object.restore", skip(self), fields(blob = %snapshot.name))]
    pub async fn restore_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.copy(&snapshot.key(), &snapshot.name).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            blob = %snapshot.name,
            taken_at = %snapshot.taken_at,
            "Snapshot restored"
        );
        Ok(())
    }

    /// Deletes `name` and/or its snapshots as selected by `option`.
    ///
    /// Returns whether anything was deleted. [`DeleteSnapshots::None`] is
    /// refused with [`Error::SnapshotsPresent`] while snapshots exist.
    #[tracing::instrument(name = "object.delete_if_exists", skip(self))]
    pub async fn delete_if_exists(&self, name: &str, option: DeleteSnapshots) -> Result<bool> {
        let snapshots = self.list_snapshots(name, SNAPSHOT_PAGE_SIZE).await?;

        let deleted = match option {
            DeleteSnapshots::None => {
                if !snapshots.is_empty() {
                    return Err(Error::SnapshotsPresent {
                        name: name.to_owned(),
                        count: snapshots.len(),
                    });
                }
                self.delete_blob_if_exists(name).await?
            }
            DeleteSnapshots::IncludeSnapshots => {
                let removed = self.delete_snapshots(&snapshots).await?;
                self.delete_blob_if_exists(name).await? || removed > 0
            }
            DeleteSnapshots::SnapshotsOnly => self.delete_snapshots(&snapshots).await? > 0,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            blob = name,
            option = %option,
            snapshots = snapshots.len(),
            deleted,
            "Delete completed"
        );
        Ok(deleted)
    }

    async fn delete_snapshots(&self, snapshots: &[Snapshot]) -> Result<usize> {
        let mut removed = 0;
        for snapshot in snapshots {
            if self.delete_blob_if_exists(&snapshot.key()).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn delete_blob_if_exists(&self, key: &str) -> Result<bool> {
        if !self.exists(key).await? {
            return Ok(false);
        }

        match self.delete(key).await {
            Ok(()) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::client::tests::test_client;

    async fn upload(client: &ObjectStoreClient, name: &str, content: &'static str) {
        client.put(name, Bytes::from(content), None).await.unwrap();
    }

    async fn content(client: &ObjectStoreClient, name: &str) -> Bytes {
        client.get(name).await.unwrap().data
    }

    #[tokio::test]
    async fn snapshot_then_restore() {
        let client = test_client();
        upload(&client, "test-file.txt", "test content").await;

        let snapshot = client.snapshot("test-file.txt").await.unwrap();
        upload(&client, "test-file.txt", "test content modified").await;
        assert_eq!(content(&client, "test-file.txt").await, "test content modified");

        client.restore_snapshot(&snapshot).await.unwrap();
        assert_eq!(content(&client, "test-file.txt").await, "test content");
    }

    #[tokio::test]
    async fn snapshot_of_missing_blob_fails() {
        let client = test_client();
        let err = client.snapshot("missing.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_snapshots_matches_exact_name() {
        let client = test_client();
        upload(&client, "a", "base").await;
        upload(&client, "a/b", "nested").await;

        let first = client.snapshot("a").await.unwrap();
        let second = client.snapshot("a").await.unwrap();
        client.snapshot("a/b").await.unwrap();

        let snapshots = client.list_snapshots("a", 1).await.unwrap();
        assert_eq!(snapshots, [first, second]);
    }

    #[tokio::test]
    async fn plain_delete_is_refused_with_snapshots() {
        let client = test_client();
        upload(&client, "test-file.txt", "x").await;
        client.snapshot("test-file.txt").await.unwrap();

        let err = client
            .delete_if_exists("test-file.txt", DeleteSnapshots::None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SnapshotsPresent { count: 1, .. }));
        assert!(client.exists("test-file.txt").await.unwrap());
    }

    #[tokio::test]
    async fn delete_including_snapshots() {
        let client = test_client();
        upload(&client, "test-file.txt", "x").await;
        client.snapshot("test-file.txt").await.unwrap();

        let deleted = client
            .delete_if_exists("test-file.txt", DeleteSnapshots::IncludeSnapshots)
            .await
            .unwrap();
        assert!(deleted);
        assert!(!client.exists("test-file.txt").await.unwrap());
        assert!(client.list_snapshots("test-file.txt", 10).await.unwrap().is_empty());

        let again = client
            .delete_if_exists("test-file.txt", DeleteSnapshots::SnapshotsOnly)
            .await
            .unwrap();
        assert!(!again);
    }

    #[tokio::test]
    async fn delete_snapshots_only_keeps_blob() {
        let client = test_client();
        upload(&client, "test-file.txt", "x").await;
        client.snapshot("test-file.txt").await.unwrap();
        client.snapshot("test-file.txt").await.unwrap();

        let deleted = client
            .delete_if_exists("test-file.txt", DeleteSnapshots::SnapshotsOnly)
            .await
            .unwrap();
        assert!(deleted);
        assert!(client.exists("test-file.txt").await.unwrap());
        assert!(client.list_snapshots("test-file.txt", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_client_stops_snapshot_scans() {
        let token = CancellationToken::new();
        let client = test_client().with_cancellation(token.clone());
        upload(&client, "test-file.txt", "x").await;
        client.snapshot("test-file.txt").await.unwrap();

        token.cancel();

        let err = client.list_snapshots("test-file.txt", 1).await.unwrap_err();
        assert!(err.is_cancelled());

        let err = client
            .delete_if_exists("test-file.txt", DeleteSnapshots::IncludeSnapshots)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(client.exists("test-file.txt").await.unwrap());
    }

    #[tokio::test]
    async fn snapshot_keys_cannot_be_snapshotted() {
        let client = test_client();
        let err = client
            .snapshot("_snapshots/test-file.txt/00000000000000000001")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReservedName(_)));
    }

    #[tokio::test]
    async fn plain_delete_of_missing_blob_reports_false() {
        let client = test_client();
        let deleted = client
            .delete_if_exists("missing.txt", DeleteSnapshots::None)
            .await
            .unwrap();
        assert!(!deleted);
    }
}
