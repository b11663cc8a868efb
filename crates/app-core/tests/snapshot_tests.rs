// Capability snapshot completeness and sentinel serialization.

use app_core::{BatteryInfo, CapabilitySnapshot, Probed, NOT_AVAILABLE};

#[test]
fn probed_serializes_value_or_sentinel() {
    let v: Probed<u32> = Probed::Value(7);
    assert_eq!(serde_json::to_value(&v).unwrap(), serde_json::json!(7));

    let n: Probed<u32> = Probed::NotAvailable;
    assert_eq!(
        serde_json::to_value(&n).unwrap(),
        serde_json::json!(NOT_AVAILABLE)
    );
}

#[test]
fn probed_displays_sentinel_text() {
    let n: Probed<f64> = Probed::NotAvailable;
    assert_eq!(n.to_string(), "Not available");
    let v: Probed<f64> = Probed::Value(1.5);
    assert_eq!(v.to_string(), "1.5");
}

#[test]
fn probed_from_option() {
    assert!(Probed::from(Some(1)).is_available());
    assert!(!Probed::<i32>::from(None).is_available());
}

#[test]
fn every_declared_group_is_present_after_serialization() {
    let snapshot = CapabilitySnapshot::unavailable();
    let value = serde_json::to_value(&snapshot).unwrap();
    let map = value.as_object().expect("snapshot serializes to an object");

    for group in CapabilitySnapshot::GROUPS {
        assert!(map.contains_key(*group), "missing group {group}");
    }
    // And nothing beyond the declared set.
    assert_eq!(map.len(), CapabilitySnapshot::GROUPS.len());
}

#[test]
fn unavailable_snapshot_uses_sentinels_not_missing_fields() {
    let snapshot = CapabilitySnapshot::unavailable();
    let value = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(value["connection"], serde_json::json!(NOT_AVAILABLE));
    assert_eq!(value["battery"], serde_json::json!(NOT_AVAILABLE));
    assert_eq!(value["webgl"], serde_json::json!(NOT_AVAILABLE));
    assert_eq!(value["timezone"], serde_json::json!(NOT_AVAILABLE));
    // Nested probed fields keep the sentinel too.
    assert_eq!(value["storage"]["quota_bytes"], serde_json::json!(NOT_AVAILABLE));
    assert_eq!(value["storage"]["persisted"], serde_json::json!(NOT_AVAILABLE));
    assert_eq!(
        value["navigator"]["device_memory_gb"],
        serde_json::json!(NOT_AVAILABLE)
    );
}

#[test]
fn viewport_degrades_to_sentinels_not_zeros() {
    let snapshot = CapabilitySnapshot::unavailable();
    let value = serde_json::to_value(&snapshot).unwrap();

    for field in [
        "inner_width",
        "inner_height",
        "outer_width",
        "outer_height",
        "scroll_x",
        "scroll_y",
    ] {
        assert_eq!(
            value["viewport"][field],
            serde_json::json!(NOT_AVAILABLE),
            "viewport.{field} should degrade to the sentinel, not a number"
        );
    }
}

#[test]
fn resolved_fields_serialize_concrete_values() {
    let mut snapshot = CapabilitySnapshot::unavailable();
    snapshot.battery = Probed::Value(BatteryInfo {
        charging: true,
        charging_time_sec: 1200.0,
        discharging_time_sec: f64::MAX,
        level: 0.82,
    });
    snapshot.timezone = Probed::Value("Europe/Berlin".to_string());

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["battery"]["charging"], serde_json::json!(true));
    assert_eq!(value["battery"]["level"], serde_json::json!(0.82));
    assert_eq!(value["timezone"], serde_json::json!("Europe/Berlin"));
}
