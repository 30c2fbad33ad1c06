//! Integration tests for snapshots and views.

use gamerpower_core::{Giveaway, Snapshot, ViewKind, ViewValue, WorthEstimation, new_since, render};

#[test]
fn test_snapshot_serialization_roundtrip() {
    let snapshot = Snapshot::new(
        vec![Giveaway::new(5, "Loot Pack").with_platforms("PC")],
        WorthEstimation::default(),
        Vec::new(),
    );
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn test_new_items_feed_active_list() {
    let previous = vec![Giveaway::new(1, "Old")];
    let current = vec![Giveaway::new(2, "Fresh"), Giveaway::new(1, "Old")];

    let baseline = gamerpower_core::giveaway_ids(&previous);
    let fresh = new_since(&current, Some(&baseline));
    let snapshot = Snapshot::new(current, WorthEstimation::default(), fresh);

    let state = render(ViewKind::ActiveGiveawaysList, Some(&snapshot));
    assert_eq!(state.value, ViewValue::Count(2));
    assert_eq!(
        state.attributes["new_since_last_update"],
        serde_json::json!(["Fresh"])
    );
}
