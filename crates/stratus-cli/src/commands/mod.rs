//! Subcommand implementations.

mod demo;
mod list;
mod snapshots;

use anyhow::bail;
use stratus_object::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::config::Command;

/// Runs `command` against `client`.
///
/// Every listing the command issues, including snapshot scans, ends with a
/// cancellation error once `cancel` fires.
pub async fn execute(
    client: &ObjectStoreClient,
    command: &Command,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let client = &client.clone().with_cancellation(cancel.clone());

    match command {
        Command::List(args) => {
            list::list_blobs(client, &args.prefix, args.page_size, cancel).await?;
        }
        Command::Snapshots(args) => {
            snapshots::print_snapshots(client, &args.blob, args.page_size).await?;
        }
        Command::Demo(args) => {
            demo::run(client, args, cancel).await?;
        }
    }

    Ok(())
}

/// Fails when `cancel` has fired, naming the step that was skipped.
fn ensure_running(cancel: &CancellationToken, step: &str) -> anyhow::Result<()> {
    if cancel.is_cancelled() {
        bail!("cancelled before {step}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnapshotArgs;

    async fn memory_client() -> ObjectStoreClient {
        let creds = MemoryCredentials {
            container: "demo".to_owned(),
        };
        MemoryProvider::connect(&creds).await.unwrap().into_inner()
    }

    fn snapshots_of(blob: &str) -> Command {
        Command::Snapshots(SnapshotArgs {
            blob: blob.to_owned(),
            page_size: 3,
        })
    }

    #[tokio::test]
    async fn snapshots_command_lists_snapshots() {
        let client = memory_client().await;
        client
            .put("test-file.txt", "x".to_string().into(), None)
            .await
            .unwrap();
        client.snapshot("test-file.txt").await.unwrap();

        execute(&client, &snapshots_of("test-file.txt"), &CancellationToken::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn snapshots_command_honours_cancellation() {
        let client = memory_client().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = execute(&client, &snapshots_of("test-file.txt"), &cancel)
            .await
            .unwrap_err();
        let error = err.downcast_ref::<Error>().unwrap();
        assert!(error.is_cancelled());
    }
}
