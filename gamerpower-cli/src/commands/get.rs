//! Get command - look up giveaways by id.

use anyhow::Result;
use clap::Args;
use futures::future::join_all;
use gamerpower_fetch::GiveawaySource;
use tracing::info;

use super::{CliError, build_client, load_settings};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Giveaway ids (positive integers).
    #[arg(required = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub ids: Vec<u64>,
}

/// Runs the get command.
///
/// Lookups run concurrently. Every result is printed before a missing id
/// fails the command.
pub async fn run(args: &GetArgs, cli: &Cli) -> Result<()> {
    info!(count = args.ids.len(), "Looking up giveaways");

    let settings = load_settings(cli).await.get().await;
    let client = build_client(&settings)?;

    let lookups = args.ids.iter().map(|id| client.fetch_giveaway(*id));
    let results: Vec<(u64, _)> = args.ids.iter().copied().zip(join_all(lookups).await).collect();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            let blocks: Vec<String> = results
                .iter()
                .map(|(id, giveaway)| match giveaway {
                    Some(g) => formatter.format_giveaway(g),
                    None => formatter.format_not_found(*id),
                })
                .collect();
            println!("{}", blocks.join("\n\n"));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_lookup(&results)?);
        }
    }

    let missing: Vec<String> = results
        .iter()
        .filter(|(_, giveaway)| giveaway.is_none())
        .map(|(id, _)| id.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CliError::NotFound(missing.join(", ")).into())
    }
}
