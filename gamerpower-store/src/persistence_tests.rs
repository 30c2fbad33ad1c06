//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O operations, JSON persistence, and settings round-trip.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::persistence::{load_json, load_json_or_default, save_json};
use crate::settings_store::{Settings, SettingsStore};
use gamerpower_core::{FilterConfig, GiveawayType, Platform};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.json");

    let settings = Settings::default();
    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    let data = serde_json::json!({"key": "value"});
    save_json(&nested_path, &data).await.unwrap();
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(result.is_err());

    let fallback: Settings = load_json_or_default(&file_path).await;
    assert_eq!(fallback, Settings::default());
}

#[tokio::test]
async fn test_atomic_write() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("atomic.json");

    save_json(&file_path, &Settings::default()).await.unwrap();

    assert!(!file_path.with_extension("json.tmp").exists());
    assert!(file_path.exists());
}

// ============================================================================
// Settings Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_settings_full_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        filter: FilterConfig::new(
            [Platform::EpicGamesStore, Platform::Steam],
            [GiveawayType::Loot],
            120,
        )
        .unwrap(),
        api_base_url: Some("http://localhost:9000/api".to_string()),
    };

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, settings);
    assert_eq!(loaded.filter.platform_param().as_deref(), Some("epic-games-store.steam"));
}

#[tokio::test]
async fn test_settings_store_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config").join("settings.json");

    let store = SettingsStore::new(file_path.clone());
    store.set_platforms(vec![Platform::Gog]).await;
    store.set_scan_interval(15).await.unwrap();
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(file_path).await;
    let filter = reloaded.filter().await;
    assert_eq!(filter.platforms(), &[Platform::Gog]);
    assert_eq!(filter.scan_interval_minutes(), 15);
}

#[tokio::test]
async fn test_on_disk_shape() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("shape.json");

    let settings = Settings {
        filter: FilterConfig::new([Platform::Pc], [GiveawayType::Game], 30).unwrap(),
        api_base_url: None,
    };
    save_json(&file_path, &settings).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&tokio::fs::read_to_string(&file_path).await.unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!({
            "filter": {"platforms": ["pc"], "types": ["game"], "scan_interval": 30}
        })
    );
}

// ============================================================================
// Backward Compatibility Tests
// ============================================================================

#[tokio::test]
async fn test_load_minimal_json_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("minimal.json");
    tokio::fs::write(&file_path, "{}").await.unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded, Settings::default());
}

#[tokio::test]
async fn test_load_json_with_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("extra_fields.json");

    let json = r#"{
        "filter": {"platforms": ["steam"]},
        "unknown_field_1": "value1",
        "nested_unknown": {"key": "value"}
    }"#;
    tokio::fs::write(&file_path, json).await.unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded.filter.platforms(), &[Platform::Steam]);
    assert_eq!(loaded.filter.scan_interval_minutes(), 30);
}

#[tokio::test]
async fn test_invalid_interval_on_disk_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("bad_interval.json");
    tokio::fs::write(&file_path, r#"{"filter": {"scan_interval": 2}}"#)
        .await
        .unwrap();

    assert!(load_json::<Settings>(&file_path).await.is_err());

    let store = SettingsStore::load(file_path).await;
    assert_eq!(store.get().await, Settings::default());
}

#[tokio::test]
async fn test_unknown_platform_on_disk_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("bad_platform.json");
    tokio::fs::write(&file_path, r#"{"filter": {"platforms": ["dreamcast"]}}"#)
        .await
        .unwrap();

    assert!(load_json::<Settings>(&file_path).await.is_err());
}
