//! Worth estimation types.

use serde::{Deserialize, Serialize};

/// An amount the API reports either as a formatted string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorthAmount {
    /// Already numeric.
    Number(f64),
    /// Formatted currency, e.g. `"$1,234.56"` or `"~$99"`.
    Text(String),
}

impl WorthAmount {
    /// Returns the amount as a number, `None` if the text does not parse.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => parse_currency(text),
        }
    }
}

/// Response of the worth endpoint.
///
/// The default value is the empty record substituted when the endpoint
/// fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorthEstimation {
    /// Number of live giveaways as counted by the API.
    pub active_giveaways_number: Option<u64>,
    /// Estimated total worth in USD.
    pub worth_estimation_usd: Option<WorthAmount>,
}

impl WorthEstimation {
    /// Returns true if neither field is present.
    pub fn is_empty(&self) -> bool {
        self.active_giveaways_number.is_none() && self.worth_estimation_usd.is_none()
    }
}

/// Parses a currency string by dropping `$`, `,` and `~`.
///
/// `"$1,234.56"` gives `1234.56`, `"~$99"` gives `99.0`; anything that is
/// still not a number afterwards gives `None`.
pub fn parse_currency(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '~'))
        .collect();
    cleaned.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$1,234.56"), Some(1234.56));
        assert_eq!(parse_currency("~$1,234.56"), Some(1234.56));
        assert_eq!(parse_currency("~$99"), Some(99.0));
        assert_eq!(parse_currency("0"), Some(0.0));
        assert_eq!(parse_currency("not a number"), None);
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("N/A"), None);
    }

    #[test]
    fn test_worth_amount_passthrough() {
        assert_eq!(WorthAmount::Number(42.5).to_f64(), Some(42.5));
        assert_eq!(WorthAmount::Text("$10".to_string()).to_f64(), Some(10.0));
    }

    #[test]
    fn test_worth_amount_untagged() {
        let text: WorthAmount = serde_json::from_str(r#""$5.00""#).unwrap();
        assert_eq!(text, WorthAmount::Text("$5.00".to_string()));

        let number: WorthAmount = serde_json::from_str("12.5").unwrap();
        assert_eq!(number, WorthAmount::Number(12.5));
    }

    #[test]
    fn test_empty_estimation() {
        assert!(WorthEstimation::default().is_empty());
        let parsed: WorthEstimation = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
    }
}
