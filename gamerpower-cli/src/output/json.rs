//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use gamerpower_core::{Giveaway, GiveawayType, Platform, ViewState};
use gamerpower_fetch::ProbeResult;
use gamerpower_store::Settings;
use serde::{Serialize, Serializer};
use serde_json::Value;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output of a refresh.
#[derive(Debug, Serialize)]
pub struct RefreshOutput {
    /// Every rendered view.
    pub views: Vec<ViewState>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON output of a connectivity check.
#[derive(Debug, Serialize)]
pub struct ProbeOutput {
    pub url: String,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(serialize_with = "serialize_datetime")]
    pub checked_at: DateTime<Utc>,
}

impl ProbeOutput {
    /// Builds the output from a probe result.
    pub fn new(url: &str, result: &ProbeResult) -> Self {
        Self {
            url: url.to_string(),
            reachable: result.reachable,
            status_code: result.status_code,
            response_time_ms: result.response_time_ms,
            error: result.error.clone(),
            checked_at: Utc::now(),
        }
    }
}

/// JSON output of the stored settings.
#[derive(Debug, Serialize)]
pub struct SettingsOutput {
    pub path: String,
    pub platforms: Vec<&'static str>,
    pub types: Vec<&'static str>,
    pub scan_interval_minutes: u32,
    pub api_base_url: String,
}

impl SettingsOutput {
    /// Builds the output from settings and their file path.
    pub fn new(path: &str, settings: &Settings) -> Self {
        Self {
            path: path.to_string(),
            platforms: settings.filter.platforms().iter().map(Platform::key).collect(),
            types: settings
                .filter
                .giveaway_types()
                .iter()
                .map(GiveawayType::key)
                .collect(),
            scan_interval_minutes: settings.filter.scan_interval_minutes(),
            api_base_url: settings.effective_base_url().to_string(),
        }
    }
}

/// A filter key with its display name.
#[derive(Debug, Serialize)]
pub struct KeyOutput {
    pub key: &'static str,
    pub name: &'static str,
}

/// JSON output of the available filter keys.
#[derive(Debug, Serialize)]
pub struct KeysOutput {
    pub platforms: Vec<KeyOutput>,
    pub types: Vec<KeyOutput>,
}

impl KeysOutput {
    /// Lists every platform and giveaway type key.
    pub fn all() -> Self {
        Self {
            platforms: Platform::all()
                .iter()
                .map(|p| KeyOutput {
                    key: p.key(),
                    name: p.display_name(),
                })
                .collect(),
            types: GiveawayType::all()
                .iter()
                .map(|t| KeyOutput {
                    key: t.key(),
                    name: t.display_name(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats lookup results.
    ///
    /// A missing giveaway is written as `{}`. A single id gives a single
    /// object, several ids give an array in request order.
    pub fn format_lookup(&self, results: &[(u64, Option<Giveaway>)]) -> Result<String> {
        let values = results
            .iter()
            .map(|(_, giveaway)| match giveaway {
                Some(g) => serde_json::to_value(g),
                None => Ok(Value::Object(serde_json::Map::new())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() == 1 {
            self.format(&values[0])
        } else {
            self.format(&values)
        }
    }
}
