//! Refresh command - run one cycle and print every view.

use anyhow::Result;
use gamerpower_store::SnapshotStore;
use tracing::info;

use super::{build_scheduler, load_settings};
use crate::output::{JsonFormatter, RefreshOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the refresh command.
///
/// A failed cycle still prints the views, with the recorded error, before
/// the failure is returned for the exit code.
pub async fn run(cli: &Cli) -> Result<()> {
    info!("Running refresh");

    let settings = load_settings(cli).await.get().await;
    let scheduler = build_scheduler(&settings)?;
    let outcome = scheduler.refresh_once().await;
    let output = collect(scheduler.store()).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!(
                "{}",
                formatter.format_views(&output.views, output.fetched_at, output.error.as_deref())
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
    }

    Ok(outcome?)
}

async fn collect(store: &SnapshotStore) -> RefreshOutput {
    RefreshOutput {
        views: store.render_views().await,
        fetched_at: store.snapshot().await.map(|s| s.fetched_at),
        error: store.last_error().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_carries_recorded_error() {
        let store = SnapshotStore::new();
        store.set_error("request timed out after 30s".into()).await;

        let output = collect(&store).await;
        assert_eq!(output.error.as_deref(), Some("request timed out after 30s"));
        assert!(output.fetched_at.is_none());
        assert!(!output.views.is_empty());
    }

    #[tokio::test]
    async fn test_collect_without_error() {
        let output = collect(&SnapshotStore::new()).await;
        assert!(output.error.is_none());
    }
}
