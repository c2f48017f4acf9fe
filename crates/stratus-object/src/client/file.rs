//! Transfers between blobs and local files.

use std::path::Path;

use bytes::Bytes;

use super::{ObjectStoreClient, PutOutput, ensure_writable};
use crate::TRACING_TARGET;
use crate::types::{Error, Result};

impl ObjectStoreClient {
    /// Uploads the local file at `path` to blob `name`, replacing any existing blob.
    #[tracing::instrument(name = "object.upload", skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload_from_path(&self, name: &str, path: impl AsRef<Path>) -> Result<PutOutput> {
        ensure_writable(name)?;

        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(path, e))?;

        tracing::debug!(
            target: TRACING_TARGET,
            blob = name,
            size = data.len(),
            "Uploading file"
        );

        self.put(name, Bytes::from(data), None).await
    }

    /// Downloads blob `name` into the local file at `path`.
    ///
    /// The file is created, or truncated if it already exists. Returns the
    /// number of bytes written.
    #[tracing::instrument(name = "object.download", skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn download_to_path(&self, name: &str, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        let output = self.get(name).await?;

        tokio::fs::write(path, &output.data)
            .await
            .map_err(|e| Error::io(path, e))?;

        tracing::debug!(
            target: TRACING_TARGET,
            blob = name,
            size = output.data.len(),
            "Downloaded file"
        );

        Ok(output.data.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;

    #[tokio::test]
    async fn upload_then_download() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("test-file.txt");
        let fetched = dir.path().join("test-file-from-azure.txt");
        std::fs::write(&local, "test content").unwrap();

        let client = test_client();
        client.upload_from_path("test-file.txt", &local).await.unwrap();
        let written = client
            .download_to_path("test-file.txt", &fetched)
            .await
            .unwrap();

        assert_eq!(written, 12);
        assert_eq!(std::fs::read_to_string(&fetched).unwrap(), "test content");
    }

    #[tokio::test]
    async fn download_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = dir.path().join("out.txt");
        std::fs::write(&fetched, "a much longer previous body").unwrap();

        let client = test_client();
        client
            .put("short.txt", Bytes::from("short"), None)
            .await
            .unwrap();
        client.download_to_path("short.txt", &fetched).await.unwrap();

        assert_eq!(std::fs::read_to_string(&fetched).unwrap(), "short");
    }

    #[tokio::test]
    async fn upload_of_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        let client = test_client();
        let err = client
            .upload_from_path("nope.txt", &missing)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!client.exists("nope.txt").await.unwrap());
    }

    #[tokio::test]
    async fn upload_into_snapshot_namespace_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("test-file.txt");
        std::fs::write(&local, "test content").unwrap();

        let client = test_client();
        let err = client
            .upload_from_path("_snapshots/test-file.txt/00000000000000000001", &local)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReservedName(_)));
    }

    #[tokio::test]
    async fn download_of_missing_blob_fails() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client();

        let err = client
            .download_to_path("missing.txt", dir.path().join("missing.txt"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
