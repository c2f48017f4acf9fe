//! `stratus snapshots`.

use stratus_object::prelude::*;

use crate::TRACING_TARGET_COMMAND;

/// Lists the snapshots of `blob`, oldest first, logging each one.
pub async fn print_snapshots(
    client: &ObjectStoreClient,
    blob: &str,
    page_size: u32,
) -> anyhow::Result<Vec<Snapshot>> {
    let snapshots = client.list_snapshots(blob, page_size).await?;

    for snapshot in &snapshots {
        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            blob = %snapshot.name,
            taken_at = %snapshot.taken_at,
            "Snapshot of {} taken at: {}",
            snapshot.name,
            snapshot.taken_at
        );
    }

    if snapshots.is_empty() {
        tracing::info!(target: TRACING_TARGET_COMMAND, blob, "No snapshots found");
    }

    Ok(snapshots)
}
