//! Giveaway listing type.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::worth::parse_currency;

/// Date format used by the API for `published_date` and `end_date`.
pub const API_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single giveaway as returned by the API.
///
/// Everything except `id` is optional; the API omits fields freely and uses
/// `"N/A"` for unknown worth and end dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Giveaway {
    /// Numeric identifier, unique within one listing.
    pub id: u64,
    /// Title of the giveaway.
    pub title: Option<String>,
    /// Original price, e.g. `"$29.99"` or `"N/A"`.
    pub worth: Option<String>,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Full-size image URL.
    pub image: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// Claim instructions.
    pub instructions: Option<String>,
    /// Direct link to claim the giveaway.
    pub open_giveaway_url: Option<String>,
    /// Publication date (`YYYY-MM-DD HH:MM:SS`).
    pub published_date: Option<String>,
    /// Giveaway type as reported by the API, e.g. `"Game"` or `"DLC"`.
    #[serde(rename = "type")]
    pub giveaway_type: Option<String>,
    /// Comma-joined platform names, e.g. `"PC, Steam"`.
    pub platforms: Option<String>,
    /// End date (`YYYY-MM-DD HH:MM:SS` or `"N/A"`).
    pub end_date: Option<String>,
    /// Number of users who claimed it.
    pub users: Option<u64>,
    /// Status, usually `"Active"`.
    pub status: Option<String>,
    /// Link to the giveaway page on gamerpower.com.
    pub gamerpower_url: Option<String>,
    /// Short claim link.
    pub open_giveaway: Option<String>,
}

impl Giveaway {
    /// Creates a giveaway with only an id and title set.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            worth: None,
            thumbnail: None,
            image: None,
            description: None,
            instructions: None,
            open_giveaway_url: None,
            published_date: None,
            giveaway_type: None,
            platforms: None,
            end_date: None,
            users: None,
            status: None,
            gamerpower_url: None,
            open_giveaway: None,
        }
    }

    /// Sets the comma-joined platform string.
    pub fn with_platforms(mut self, platforms: impl Into<String>) -> Self {
        self.platforms = Some(platforms.into());
        self
    }

    /// Sets the giveaway type.
    pub fn with_type(mut self, giveaway_type: impl Into<String>) -> Self {
        self.giveaway_type = Some(giveaway_type.into());
        self
    }

    /// Sets the worth string.
    pub fn with_worth(mut self, worth: impl Into<String>) -> Self {
        self.worth = Some(worth.into());
        self
    }

    /// Title, or `"Unknown"` when the API left it out.
    pub fn title_or_unknown(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }

    /// Platform names in listing order, trimmed, empty entries skipped.
    pub fn platform_names(&self) -> Vec<&str> {
        self.platforms
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Parsed worth in USD, `None` for `"N/A"` or missing.
    pub fn worth_usd(&self) -> Option<f64> {
        self.worth.as_deref().and_then(parse_currency)
    }

    /// Parsed end date, `None` for `"N/A"`, missing or malformed.
    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        parse_api_date(self.end_date.as_deref()?)
    }
}

fn parse_api_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), API_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_platform_names_split() {
        let giveaway = Giveaway::new(1, "Test").with_platforms("PC, Steam, Epic Games Store");
        assert_eq!(giveaway.platform_names(), vec!["PC", "Steam", "Epic Games Store"]);
    }

    #[test]
    fn test_platform_names_skip_empty() {
        let giveaway = Giveaway::new(1, "Test").with_platforms("PC, , ");
        assert_eq!(giveaway.platform_names(), vec!["PC"]);

        let bare = Giveaway::new(2, "Bare");
        assert!(bare.platform_names().is_empty());
    }

    #[test]
    fn test_title_or_unknown() {
        let mut giveaway = Giveaway::new(1, "Named");
        assert_eq!(giveaway.title_or_unknown(), "Named");
        giveaway.title = None;
        assert_eq!(giveaway.title_or_unknown(), "Unknown");
    }

    #[test]
    fn test_worth_usd() {
        assert_eq!(Giveaway::new(1, "A").with_worth("$29.99").worth_usd(), Some(29.99));
        assert_eq!(Giveaway::new(1, "A").with_worth("N/A").worth_usd(), None);
        assert_eq!(Giveaway::new(1, "A").worth_usd(), None);
    }

    #[test]
    fn test_end_date_parsing() {
        let mut giveaway = Giveaway::new(1, "A");
        giveaway.end_date = Some("2025-03-14 23:59:00".to_string());
        let ends = giveaway.ends_at().unwrap();
        assert_eq!(ends.year(), 2025);
        assert_eq!(ends.month(), 3);
        assert_eq!(ends.hour(), 23);

        giveaway.end_date = Some("N/A".to_string());
        assert!(giveaway.ends_at().is_none());
    }
}
