//! Check command - probe the API.

use anyhow::Result;
use gamerpower_fetch::Probe;
use tracing::info;

use super::{CliError, build_client, load_settings};
use crate::output::{JsonFormatter, ProbeOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the check command.
pub async fn run(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli).await.get().await;
    let client = build_client(&settings)?;
    let probe = Probe::for_client(&client)?;

    info!(url = %probe.url, "Checking API");
    let result = probe.check().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_probe(probe.url.as_str(), &result));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&ProbeOutput::new(probe.url.as_str(), &result))?);
        }
    }

    if result.reachable {
        Ok(())
    } else {
        let reason = result
            .error
            .or_else(|| result.status_code.map(|code| format!("HTTP {code}")))
            .unwrap_or_else(|| "no response".to_string());
        Err(CliError::CannotConnect(reason).into())
    }
}
