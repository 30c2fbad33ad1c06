//! Summary command - one line per view.

use anyhow::Result;
use tracing::info;

use super::fetch_once;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the summary command.
pub async fn run(cli: &Cli) -> Result<()> {
    info!("Running summary");

    let store = fetch_once(cli).await?;
    let views = store.render_views().await;
    let fetched_at = store.snapshot().await.map(|s| s.fetched_at);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_summary(&views, fetched_at));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let values = views
                .iter()
                .map(|view| Ok((view.kind.key().to_string(), serde_json::to_value(&view.value)?)))
                .collect::<Result<serde_json::Map<_, _>>>()?;
            println!("{}", formatter.format(&values)?);
        }
    }

    Ok(())
}
