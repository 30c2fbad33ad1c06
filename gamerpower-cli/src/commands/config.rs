//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use gamerpower_core::{GiveawayType, Platform};
use gamerpower_store::{SettingsStore, default_config_dir};
use std::str::FromStr;
use tracing::info;

use super::load_settings;
use crate::output::{JsonFormatter, KeysOutput, SettingsOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Select platforms. No keys selects all platforms.
    Platforms {
        /// Platform keys, e.g. pc steam epic-games-store.
        keys: Vec<String>,
    },

    /// Select giveaway types. No keys selects all types.
    Types {
        /// Type keys: game, loot, beta.
        keys: Vec<String>,
    },

    /// Set the scan interval.
    Interval {
        /// Minutes between refreshes (5 to 1440).
        minutes: u32,
    },

    /// Set the API base URL. No URL restores the public API.
    ApiUrl {
        /// Base URL, e.g. http://localhost:8080/api.
        url: Option<String>,
    },

    /// Reset to defaults.
    Reset,

    /// List the available platform and type keys.
    Keys,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli).await,
        ConfigAction::Platforms { keys } => set_platforms(keys, cli).await,
        ConfigAction::Types { keys } => set_types(keys, cli).await,
        ConfigAction::Interval { minutes } => set_interval(*minutes, cli).await,
        ConfigAction::ApiUrl { url } => set_api_url(url.clone(), cli).await,
        ConfigAction::Reset => reset_config(cli).await,
        ConfigAction::Keys => show_keys(cli),
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = load_settings(cli).await;
    let settings = store.get().await;
    let path = store.path().display().to_string();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_settings(&path, &settings));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&SettingsOutput::new(&path, &settings))?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let store = load_settings(cli).await;

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", store.path().display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": store.path().display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

/// Parses filter keys, naming the first unknown one.
fn parse_keys<T>(keys: &[String]) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    keys.iter()
        .map(|key| {
            key.parse::<T>().map_err(|e| {
                anyhow::anyhow!("{e} (run `gamerpower config keys` for the valid keys)")
            })
        })
        .collect()
}

async fn set_platforms(keys: &[String], cli: &Cli) -> Result<()> {
    let platforms: Vec<Platform> = parse_keys(keys)?;

    let store = load_settings(cli).await;
    store.set_platforms(platforms).await;
    store.save().await?;

    let selected = store.filter().await;
    info!(count = selected.platforms().len(), "Platforms updated");
    print_selection("Platforms", selected.platforms().iter().map(Platform::key), cli);

    Ok(())
}

async fn set_types(keys: &[String], cli: &Cli) -> Result<()> {
    let giveaway_types: Vec<GiveawayType> = parse_keys(keys)?;

    let store = load_settings(cli).await;
    store.set_giveaway_types(giveaway_types).await;
    store.save().await?;

    let selected = store.filter().await;
    info!(count = selected.giveaway_types().len(), "Giveaway types updated");
    print_selection("Types", selected.giveaway_types().iter().map(GiveawayType::key), cli);

    Ok(())
}

fn print_selection<'a>(label: &str, keys: impl Iterator<Item = &'a str>, cli: &Cli) {
    if cli.quiet {
        return;
    }
    let keys: Vec<&str> = keys.collect();
    if keys.is_empty() {
        println!("{label}: all");
    } else {
        println!("{label}: {}", keys.join(", "));
    }
}

async fn set_interval(minutes: u32, cli: &Cli) -> Result<()> {
    let store = load_settings(cli).await;
    store.set_scan_interval(minutes).await?;
    store.save().await?;

    info!(minutes, "Scan interval updated");
    if !cli.quiet {
        println!("Scan interval set to {minutes} minutes");
    }

    Ok(())
}

async fn set_api_url(url: Option<String>, cli: &Cli) -> Result<()> {
    let store = load_settings(cli).await;
    store.set_api_base_url(url).await?;
    store.save().await?;

    let effective = store.api_base_url().await;
    info!(url = %effective, "API base URL updated");
    if !cli.quiet {
        println!("API base URL: {effective}");
    }

    Ok(())
}

async fn reset_config(cli: &Cli) -> Result<()> {
    let store: SettingsStore = load_settings(cli).await;
    store.reset().await;
    store.save().await?;

    info!(path = %store.path().display(), "Settings reset");
    if !cli.quiet {
        println!("Configuration reset to defaults");
    }

    Ok(())
}

fn show_keys(cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_keys());
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&KeysOutput::all())?);
        }
    }

    Ok(())
}
