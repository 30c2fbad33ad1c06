//! List command - active giveaways.

use anyhow::Result;
use clap::Args;
use gamerpower_core::active_list;
use tracing::info;

use super::fetch_once;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Group titles by platform.
    #[arg(long, short = 'p')]
    pub by_platform: bool,
}

/// Runs the list command.
pub async fn run(args: &ListArgs, cli: &Cli) -> Result<()> {
    info!(by_platform = args.by_platform, "Running list");

    let store = fetch_once(cli).await?;
    let snapshot = store.snapshot().await;
    let list = active_list(snapshot.as_ref());

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_active_list(&list, args.by_platform));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let output = if args.by_platform {
                formatter.format(&list.by_platform)?
            } else {
                formatter.format(&list)?
            };
            println!("{output}");
        }
    }

    Ok(())
}
