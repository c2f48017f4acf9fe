//! `stratus demo`: upload, snapshot, restore and delete one blob.

use std::path::{Path, PathBuf};

use anyhow::Context;
use stratus_object::prelude::*;
use tokio_util::sync::CancellationToken;

use super::{ensure_running, list, snapshots};
use crate::TRACING_TARGET_COMMAND;
use crate::config::DemoArgs;

const ORIGINAL_CONTENT: &str = "test content";
const MODIFIED_CONTENT: &str = "test content modified";

/// Account-level container enumeration; `object_store` is scoped to one container.
const LIST_CONTAINERS_STEP: &str = "list_containers";

/// What one walkthrough did.
#[derive(Debug, Default)]
pub struct DemoSummary {
    /// Blobs seen by the initial listing.
    pub listed: usize,
    /// Whether the blob was missing and got uploaded.
    pub uploaded: bool,
    /// Snapshots found after the modified upload.
    pub snapshots: usize,
    /// Outcome of each snapshot-aware delete, in order.
    pub deleted: Vec<(DeleteSnapshots, bool)>,
    /// Steps the backend cannot perform.
    pub skipped: Vec<&'static str>,
}

/// Runs the full walkthrough against `client`.
pub async fn run(
    client: &ObjectStoreClient,
    args: &DemoArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<DemoSummary> {
    let blob = args.blob.as_str();
    let mut summary = DemoSummary::default();

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        step = LIST_CONTAINERS_STEP,
        "Skipping container enumeration: the client is bound to a single container"
    );
    summary.skipped.push(LIST_CONTAINERS_STEP);

    summary.listed = list::list_blobs(client, "", args.page_size, cancel)
        .await?
        .len();

    ensure_running(cancel, "upload")?;
    if !client.exists(blob).await? {
        summary.uploaded = true;
        let local = args.workdir.join(blob);
        write_local(&local, ORIGINAL_CONTENT).await?;
        client
            .upload_from_path(blob, &local)
            .await
            .with_context(|| format!("failed to upload {}", local.display()))?;

        let downloaded = args.workdir.join(local_name(blob, "-from-azure"));
        let size = client
            .download_to_path(blob, &downloaded)
            .await
            .with_context(|| format!("failed to download {blob}"))?;
        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            blob,
            path = %downloaded.display(),
            size,
            "Blob uploaded and downloaded"
        );
    }

    ensure_running(cancel, "snapshot")?;
    let snapshot = client.snapshot(blob).await?;
    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        blob,
        taken_at = %snapshot.taken_at,
        "Snapshot created"
    );

    ensure_running(cancel, "modified upload")?;
    let modified = args.workdir.join(local_name(blob, "-modified"));
    write_local(&modified, MODIFIED_CONTENT).await?;
    client
        .upload_from_path(blob, &modified)
        .await
        .with_context(|| format!("failed to upload {}", modified.display()))?;

    ensure_running(cancel, "snapshot listing")?;
    let snapshots = snapshots::print_snapshots(client, blob, args.page_size).await?;
    summary.snapshots = snapshots.len();

    ensure_running(cancel, "restore")?;
    let first = snapshots
        .first()
        .with_context(|| format!("no snapshot of {blob} to restore"))?;
    client.restore_snapshot(first).await?;
    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        blob,
        taken_at = %first.taken_at,
        "Snapshot restored"
    );

    ensure_running(cancel, "delete")?;
    for option in [DeleteSnapshots::IncludeSnapshots, DeleteSnapshots::SnapshotsOnly] {
        let deleted = client.delete_if_exists(blob, option).await?;
        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            blob,
            option = %option,
            deleted,
            "Delete issued"
        );
        summary.deleted.push((option, deleted));
    }

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        blob,
        listed = summary.listed,
        uploaded = summary.uploaded,
        snapshots = summary.snapshots,
        deletes = ?summary.deleted,
        skipped = ?summary.skipped,
        "Walkthrough finished"
    );
    Ok(summary)
}

async fn write_local(path: &Path, contents: &str) -> anyhow::Result<()> {
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Inserts `suffix` between the stem and extension of `blob`.
///
/// `test-file.txt` with `-modified` becomes `test-file-modified.txt`.
fn local_name(blob: &str, suffix: &str) -> PathBuf {
    let path = Path::new(blob);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| blob.to_owned());

    match path.extension() {
        Some(ext) => PathBuf::from(format!("{stem}{suffix}.{}", ext.to_string_lossy())),
        None => PathBuf::from(format!("{stem}{suffix}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_client() -> ObjectStoreClient {
        let creds = MemoryCredentials {
            container: "demo".to_owned(),
        };
        MemoryProvider::connect(&creds).await.unwrap().into_inner()
    }

    fn args(workdir: &Path) -> DemoArgs {
        DemoArgs {
            blob: "test-file.txt".to_owned(),
            workdir: workdir.to_path_buf(),
            page_size: 3,
        }
    }

    #[test]
    fn local_name_keeps_extension() {
        assert_eq!(
            local_name("test-file.txt", "-from-azure"),
            PathBuf::from("test-file-from-azure.txt")
        );
        assert_eq!(local_name("notes", "-modified"), PathBuf::from("notes-modified"));
    }

    #[tokio::test]
    async fn walkthrough_leaves_container_empty() {
        let dir = tempfile::tempdir().unwrap();
        let client = memory_client().await;
        let cancel = CancellationToken::new();

        let summary = run(&client, &args(dir.path()), &cancel).await.unwrap();
        assert!(summary.uploaded);
        assert_eq!(summary.listed, 0);
        assert_eq!(summary.snapshots, 1);
        assert_eq!(
            summary.deleted,
            [
                (DeleteSnapshots::IncludeSnapshots, true),
                (DeleteSnapshots::SnapshotsOnly, false),
            ]
        );
        assert_eq!(summary.skipped, [LIST_CONTAINERS_STEP]);

        let downloaded = std::fs::read_to_string(dir.path().join("test-file-from-azure.txt"));
        assert_eq!(downloaded.unwrap(), ORIGINAL_CONTENT);
        assert!(dir.path().join("test-file-modified.txt").exists());

        assert!(!client.exists("test-file.txt").await.unwrap());
        assert!(client.list_snapshots("test-file.txt", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn existing_blob_skips_upload() {
        let dir = tempfile::tempdir().unwrap();
        let client = memory_client().await;
        client
            .put("test-file.txt", "already here".to_string().into(), None)
            .await
            .unwrap();

        let summary = run(&client, &args(dir.path()), &CancellationToken::new())
            .await
            .unwrap();
        assert!(!summary.uploaded);
        assert_eq!(summary.listed, 1);

        assert!(!dir.path().join("test-file.txt").exists());
        assert!(!dir.path().join("test-file-from-azure.txt").exists());
    }

    #[tokio::test]
    async fn cancelled_walkthrough_stops_before_upload() {
        let dir = tempfile::tempdir().unwrap();
        let client = memory_client().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(run(&client, &args(dir.path()), &cancel).await.is_err());
        assert!(!client.exists("test-file.txt").await.unwrap());
    }
}
