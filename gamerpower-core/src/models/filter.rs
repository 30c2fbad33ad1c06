//! Filter configuration types.
//!
//! This module contains the keys a user can filter giveaways by and the
//! validated configuration that drives each fetch cycle:
//! - [`Platform`] - Platforms known to the GamerPower API
//! - [`GiveawayType`] - Giveaway categories known to the API
//! - [`FilterConfig`] - Selected platforms, types and refresh period

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CoreError;

/// Default refresh period in minutes.
pub const DEFAULT_SCAN_INTERVAL_MINUTES: u32 = 30;

/// Smallest accepted refresh period in minutes.
pub const MIN_SCAN_INTERVAL_MINUTES: u32 = 5;

/// Largest accepted refresh period in minutes (24 hours).
pub const MAX_SCAN_INTERVAL_MINUTES: u32 = 1440;

/// Separator the API expects between multiple filter values.
pub const FILTER_SEPARATOR: &str = ".";

// ============================================================================
// Platform
// ============================================================================

/// Platforms the API can filter by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// PC
    #[serde(rename = "pc")]
    Pc,
    /// Steam
    #[serde(rename = "steam")]
    Steam,
    /// Epic Games Store
    #[serde(rename = "epic-games-store")]
    EpicGamesStore,
    /// Ubisoft
    #[serde(rename = "ubisoft")]
    Ubisoft,
    /// GOG
    #[serde(rename = "gog")]
    Gog,
    /// itch.io
    #[serde(rename = "itchio")]
    Itchio,
    /// PlayStation 4
    #[serde(rename = "ps4")]
    Ps4,
    /// PlayStation 5
    #[serde(rename = "ps5")]
    Ps5,
    /// Xbox One
    #[serde(rename = "xbox-one")]
    XboxOne,
    /// Xbox Series X|S
    #[serde(rename = "xbox-series-xs")]
    XboxSeriesXs,
    /// Nintendo Switch
    #[serde(rename = "switch")]
    Switch,
    /// Android
    #[serde(rename = "android")]
    Android,
    /// iOS
    #[serde(rename = "ios")]
    Ios,
    /// VR
    #[serde(rename = "vr")]
    Vr,
    /// Battle.net
    #[serde(rename = "battlenet")]
    Battlenet,
    /// Origin
    #[serde(rename = "origin")]
    Origin,
    /// DRM-Free
    #[serde(rename = "drm-free")]
    DrmFree,
}

impl Platform {
    /// Returns the key sent to the API.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::Steam => "steam",
            Self::EpicGamesStore => "epic-games-store",
            Self::Ubisoft => "ubisoft",
            Self::Gog => "gog",
            Self::Itchio => "itchio",
            Self::Ps4 => "ps4",
            Self::Ps5 => "ps5",
            Self::XboxOne => "xbox-one",
            Self::XboxSeriesXs => "xbox-series-xs",
            Self::Switch => "switch",
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Vr => "vr",
            Self::Battlenet => "battlenet",
            Self::Origin => "origin",
            Self::DrmFree => "drm-free",
        }
    }

    /// Returns the display name for this platform.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Steam => "Steam",
            Self::EpicGamesStore => "Epic Games Store",
            Self::Ubisoft => "Ubisoft",
            Self::Gog => "GOG",
            Self::Itchio => "itch.io",
            Self::Ps4 => "PlayStation 4",
            Self::Ps5 => "PlayStation 5",
            Self::XboxOne => "Xbox One",
            Self::XboxSeriesXs => "Xbox Series X|S",
            Self::Switch => "Nintendo Switch",
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Vr => "VR",
            Self::Battlenet => "Battle.net",
            Self::Origin => "Origin",
            Self::DrmFree => "DRM-Free",
        }
    }

    /// Returns all platforms in menu order.
    pub fn all() -> &'static [Platform] {
        &[
            Self::Pc,
            Self::Steam,
            Self::EpicGamesStore,
            Self::Ubisoft,
            Self::Gog,
            Self::Itchio,
            Self::Ps4,
            Self::Ps5,
            Self::XboxOne,
            Self::XboxSeriesXs,
            Self::Switch,
            Self::Android,
            Self::Ios,
            Self::Vr,
            Self::Battlenet,
            Self::Origin,
            Self::DrmFree,
        ]
    }

    /// Looks up a platform by its API key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.key() == key)
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(&s.trim().to_lowercase())
            .ok_or_else(|| CoreError::UnknownPlatform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Giveaway Type
// ============================================================================

/// Giveaway categories the API can filter by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiveawayType {
    /// Full game
    Game,
    /// In-game loot (DLC, skins, items)
    Loot,
    /// Beta access
    Beta,
}

impl GiveawayType {
    /// Returns the key sent to the API.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Loot => "loot",
            Self::Beta => "beta",
        }
    }

    /// Returns the display name for this type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Game => "Full Game",
            Self::Loot => "In-Game Loot",
            Self::Beta => "Beta Access",
        }
    }

    /// Returns all giveaway types.
    pub fn all() -> &'static [GiveawayType] {
        &[Self::Game, Self::Loot, Self::Beta]
    }

    /// Looks up a type by its API key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.key() == key)
    }
}

impl FromStr for GiveawayType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(&s.trim().to_lowercase())
            .ok_or_else(|| CoreError::UnknownGiveawayType(s.to_string()))
    }
}

impl fmt::Display for GiveawayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Filter Configuration
// ============================================================================

/// Validated filter configuration for one running tracker.
///
/// Selections keep the order they were given in, minus duplicates. The first
/// selected platform and type are the ones passed to the worth endpoint,
/// which accepts a single value of each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilterConfig")]
pub struct FilterConfig {
    platforms: Vec<Platform>,
    #[serde(rename = "types")]
    giveaway_types: Vec<GiveawayType>,
    #[serde(rename = "scan_interval")]
    scan_interval_minutes: u32,
}

/// Unvalidated shape of [`FilterConfig`] as it appears on disk.
#[derive(Deserialize)]
struct RawFilterConfig {
    #[serde(default)]
    platforms: Vec<Platform>,
    #[serde(default)]
    types: Vec<GiveawayType>,
    #[serde(default = "default_scan_interval")]
    scan_interval: u32,
}

fn default_scan_interval() -> u32 {
    DEFAULT_SCAN_INTERVAL_MINUTES
}

impl TryFrom<RawFilterConfig> for FilterConfig {
    type Error = CoreError;

    fn try_from(raw: RawFilterConfig) -> Result<Self, Self::Error> {
        Self::new(raw.platforms, raw.types, raw.scan_interval)
    }
}

impl FilterConfig {
    /// Creates a filter configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the refresh period is outside
    /// `MIN_SCAN_INTERVAL_MINUTES..=MAX_SCAN_INTERVAL_MINUTES`.
    pub fn new(
        platforms: impl IntoIterator<Item = Platform>,
        giveaway_types: impl IntoIterator<Item = GiveawayType>,
        scan_interval_minutes: u32,
    ) -> Result<Self, CoreError> {
        validate_scan_interval(scan_interval_minutes)?;

        Ok(Self {
            platforms: dedup_ordered(platforms),
            giveaway_types: dedup_ordered(giveaway_types),
            scan_interval_minutes,
        })
    }

    /// Selected platforms, in selection order.
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Selected giveaway types, in selection order.
    pub fn giveaway_types(&self) -> &[GiveawayType] {
        &self.giveaway_types
    }

    /// Refresh period in minutes.
    pub fn scan_interval_minutes(&self) -> u32 {
        self.scan_interval_minutes
    }

    /// Refresh period as a duration.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.scan_interval_minutes) * 60)
    }

    /// Returns true if any platform or type is selected.
    pub fn is_filtered(&self) -> bool {
        !self.platforms.is_empty() || !self.giveaway_types.is_empty()
    }

    /// The `platform` query value, e.g. `pc.steam`.
    pub fn platform_param(&self) -> Option<String> {
        join_keys(self.platforms.iter().map(Platform::key))
    }

    /// The `type` query value, e.g. `game.loot`.
    pub fn type_param(&self) -> Option<String> {
        join_keys(self.giveaway_types.iter().map(GiveawayType::key))
    }

    /// The single platform passed to the worth endpoint.
    pub fn worth_platform(&self) -> Option<Platform> {
        self.platforms.first().copied()
    }

    /// The single giveaway type passed to the worth endpoint.
    pub fn worth_type(&self) -> Option<GiveawayType> {
        self.giveaway_types.first().copied()
    }

    /// Returns a copy with a different platform selection.
    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = dedup_ordered(platforms);
        self
    }

    /// Returns a copy with a different type selection.
    pub fn with_giveaway_types(
        mut self,
        giveaway_types: impl IntoIterator<Item = GiveawayType>,
    ) -> Self {
        self.giveaway_types = dedup_ordered(giveaway_types);
        self
    }

    /// Returns a copy with a different refresh period.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the period is out of bounds.
    pub fn with_scan_interval_minutes(mut self, minutes: u32) -> Result<Self, CoreError> {
        validate_scan_interval(minutes)?;
        self.scan_interval_minutes = minutes;
        Ok(self)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            platforms: Vec::new(),
            giveaway_types: Vec::new(),
            scan_interval_minutes: DEFAULT_SCAN_INTERVAL_MINUTES,
        }
    }
}

fn validate_scan_interval(minutes: u32) -> Result<(), CoreError> {
    if (MIN_SCAN_INTERVAL_MINUTES..=MAX_SCAN_INTERVAL_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(CoreError::InvalidConfig(format!(
            "scan interval must be between {MIN_SCAN_INTERVAL_MINUTES} and \
             {MAX_SCAN_INTERVAL_MINUTES} minutes, got {minutes}"
        )))
    }
}

fn dedup_ordered<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a str>) -> Option<String> {
    let keys: Vec<&str> = keys.collect();
    if keys.is_empty() {
        None
    } else {
        Some(keys.join(FILTER_SEPARATOR))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_keys_roundtrip() {
        assert_eq!(Platform::all().len(), 17);
        for platform in Platform::all() {
            assert_eq!(Platform::from_key(platform.key()), Some(*platform));
            assert!(!platform.key().contains('.'));
        }
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("Steam".parse::<Platform>().unwrap(), Platform::Steam);
        assert_eq!(
            "epic-games-store".parse::<Platform>().unwrap(),
            Platform::EpicGamesStore
        );
        assert!("dreamcast".parse::<Platform>().is_err());
    }

    #[test]
    fn test_giveaway_type_from_str() {
        assert_eq!("loot".parse::<GiveawayType>().unwrap(), GiveawayType::Loot);
        assert!("dlc".parse::<GiveawayType>().is_err());
        assert_eq!(GiveawayType::Beta.display_name(), "Beta Access");
    }

    #[test]
    fn test_default_config_is_unfiltered() {
        let config = FilterConfig::default();
        assert!(!config.is_filtered());
        assert_eq!(config.scan_interval_minutes(), 30);
        assert_eq!(config.scan_interval(), Duration::from_secs(1800));
        assert_eq!(config.platform_param(), None);
        assert_eq!(config.type_param(), None);
    }

    #[test]
    fn test_params_are_joined_with_separator() {
        let config = FilterConfig::new(
            [Platform::Pc, Platform::Steam, Platform::Pc],
            [GiveawayType::Game, GiveawayType::Loot],
            60,
        )
        .unwrap();

        assert!(config.is_filtered());
        assert_eq!(config.platforms(), &[Platform::Pc, Platform::Steam]);
        assert_eq!(config.platform_param().as_deref(), Some("pc.steam"));
        assert_eq!(config.type_param().as_deref(), Some("game.loot"));
        assert_eq!(config.worth_platform(), Some(Platform::Pc));
        assert_eq!(config.worth_type(), Some(GiveawayType::Game));
    }

    #[test]
    fn test_type_only_filter() {
        let config = FilterConfig::default().with_giveaway_types([GiveawayType::Beta]);
        assert!(config.is_filtered());
        assert_eq!(config.platform_param(), None);
        assert_eq!(config.type_param().as_deref(), Some("beta"));
    }

    #[test]
    fn test_scan_interval_bounds() {
        assert!(FilterConfig::new([], [], 4).is_err());
        assert!(FilterConfig::new([], [], 5).is_ok());
        assert!(FilterConfig::new([], [], 1440).is_ok());
        assert!(FilterConfig::new([], [], 1441).is_err());
        assert!(FilterConfig::default().with_scan_interval_minutes(0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: FilterConfig =
            serde_json::from_str(r#"{"platforms":["steam"],"types":["game"],"scan_interval":15}"#)
                .unwrap();
        assert_eq!(ok.platforms(), &[Platform::Steam]);
        assert_eq!(ok.scan_interval_minutes(), 15);

        let defaults: FilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, FilterConfig::default());

        assert!(serde_json::from_str::<FilterConfig>(r#"{"scan_interval":2}"#).is_err());
        assert!(serde_json::from_str::<FilterConfig>(r#"{"platforms":["amiga"]}"#).is_err());
    }

    #[test]
    fn test_serialize_uses_config_keys() {
        let config = FilterConfig::new([Platform::DrmFree], [GiveawayType::Loot], 30).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["platforms"][0], "drm-free");
        assert_eq!(json["types"][0], "loot");
        assert_eq!(json["scan_interval"], 30);
    }
}
