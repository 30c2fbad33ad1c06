//! Watch command - keep polling and redraw on every change.

use anyhow::Result;
use chrono::Local;
use clap::Args;
use gamerpower_fetch::{Probe, RefreshCycle};
use gamerpower_store::{RefreshScheduler, SchedulerHandle, SnapshotStore};
use std::io::{BufRead, Write, stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use super::{CliError, build_client, load_settings};
use crate::output::{JsonFormatter, RefreshOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Minutes between refreshes, overriding the configured interval.
    #[arg(long, short)]
    pub interval: Option<u32>,
}

/// Runs the watch command.
///
/// The API is probed first and the first cycle must succeed before the
/// timer starts. Typing `r` + Enter refreshes early; `q` + Enter or Ctrl+C
/// stops.
pub async fn run(args: &WatchArgs, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli).await.get().await;
    let filter = match args.interval {
        Some(minutes) => settings.filter.clone().with_scan_interval_minutes(minutes)?,
        None => settings.filter.clone(),
    };
    let client = build_client(&settings)?;

    let probe = Probe::for_client(&client)?;
    let probe_result = probe.check().await;
    if !probe_result.reachable {
        let reason = probe_result
            .error
            .or_else(|| probe_result.status_code.map(|code| format!("HTTP {code}")))
            .unwrap_or_else(|| "no response".to_string());
        return Err(CliError::CannotConnect(reason).into());
    }

    let minutes = filter.scan_interval_minutes();
    let cycle = RefreshCycle::new(Arc::new(client), filter.clone());
    let store = Arc::new(SnapshotStore::new());
    let scheduler =
        RefreshScheduler::new(Arc::new(cycle), Arc::clone(&store), filter.scan_interval());
    let handle = scheduler.start().await?;

    info!(minutes, "Starting watch mode");

    let result = watch_loop(&handle, &store, minutes, cli).await;
    handle.shutdown().await;
    result
}

async fn watch_loop(
    handle: &SchedulerHandle,
    store: &SnapshotStore,
    minutes: u32,
    cli: &Cli,
) -> Result<()> {
    let mut changes = store.subscribe();
    let mut input = spawn_input_reader();
    let mut input_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    render(store, minutes, cli).await?;

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                render(store, minutes, cli).await?;
            }
            line = input.recv(), if input_open => match line {
                Some(line) => match line.trim() {
                    "r" | "R" => handle.request_refresh()?,
                    "q" | "Q" => break,
                    _ => {}
                },
                None => input_open = false,
            },
            _ = &mut ctrl_c => break,
        }
    }

    Ok(())
}

/// Reads stdin lines on a plain thread so a pending read never blocks
/// runtime shutdown.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn render(store: &SnapshotStore, minutes: u32, cli: &Cli) -> Result<()> {
    let refreshing = store.is_refreshing().await;
    let views = store.render_views().await;
    let fetched_at = store.snapshot().await.map(|s| s.fetched_at);
    let error = store.last_error().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            // Clear screen
            print!("\x1b[2J\x1b[H");
            stdout().flush()?;

            println!(
                "GamerPower Watch Mode - {} (refresh: every {} min)",
                Local::now().format("%H:%M:%S"),
                minutes
            );
            println!();
            println!("{}", formatter.format_summary(&views, fetched_at));
            println!();
            if refreshing {
                println!("Refreshing...");
            }
            if let Some(error) = &error {
                println!("{}", formatter.format_error(error));
            }
            println!("Press r + Enter to refresh, q + Enter or Ctrl+C to exit");
        }
        OutputFormat::Json => {
            // one document per finished cycle
            if refreshing {
                return Ok(());
            }
            let formatter = JsonFormatter::new(cli.pretty);
            let output = RefreshOutput {
                views,
                fetched_at,
                error,
            };
            println!("{}", formatter.format(&output)?);
        }
    }

    Ok(())
}
