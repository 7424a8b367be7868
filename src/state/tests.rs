use super::*;
use crate::asset::{Asset, GeoPoint};
use std::sync::Arc;
use std::thread;

fn make_asset(id: &str, lat: f64, lng: f64) -> Asset {
    Asset {
        id: id.to_string(),
        name: format!("Vehicle {}", id),
        lat,
        lng,
        heading_deg: 90.0,
        speed_kph: 40.0,
        status: "moving".to_string(),
        last_update: None,
    }
}

#[test]
fn test_upsert_inserts_new_asset() {
    let registry = AssetRegistry::new();

    let previous = registry.upsert(make_asset("asset-001", 31.5, 74.3));
    assert!(previous.is_none());
    assert_eq!(registry.len(), 1);

    let asset = registry.get("asset-001").unwrap();
    assert_eq!(asset.name, "Vehicle asset-001");
    assert_eq!(asset.lat, 31.5);
}

#[test]
fn test_upsert_is_last_write_wins() {
    let registry = AssetRegistry::new();

    registry.upsert(make_asset("asset-001", 31.5, 74.3));

    let mut update = make_asset("asset-001", 31.6, 74.4);
    update.speed_kph = 0.0;
    update.status = "stopped".to_string();
    let previous = registry.upsert(update);

    assert_eq!(previous.unwrap().status, "moving");
    assert_eq!(registry.len(), 1);

    let asset = registry.get("asset-001").unwrap();
    assert_eq!(asset.lat, 31.6);
    assert_eq!(asset.speed_kph, 0.0);
    assert_eq!(asset.status, "stopped");
}

#[test]
fn test_snapshot_fully_replaces_contents() {
    let registry = AssetRegistry::new();

    // Asset C exists only before the snapshot
    registry.upsert(make_asset("asset-c", 30.0, 70.0));

    let count = registry.replace_all(&[
        make_asset("asset-a", 31.5, 74.3),
        make_asset("asset-b", 31.6, 74.4),
    ]);

    assert_eq!(count, 2);
    assert!(registry.get("asset-a").is_some());
    assert!(registry.get("asset-b").is_some());
    assert!(registry.get("asset-c").is_none());
}

#[test]
fn test_snapshot_rebuilds_bounds_from_scratch() {
    let registry = AssetRegistry::new();

    // Old far-away position must not leak into the new bounds
    registry.upsert(make_asset("asset-old", -10.0, -10.0));

    registry.replace_all(&[
        make_asset("asset-a", 31.5, 74.3),
        make_asset("asset-b", 31.6, 74.4),
    ]);

    let bounds = registry.bounds().unwrap();
    assert_eq!(bounds.south, 31.5);
    assert_eq!(bounds.north, 31.6);
    assert!(!bounds.contains(GeoPoint {
        lat: -10.0,
        lng: -10.0
    }));
}

#[test]
fn test_bounds_cover_all_snapshot_positions() {
    let registry = AssetRegistry::new();
    let assets = vec![
        make_asset("a", 31.5, 74.3),
        make_asset("b", 31.7, 74.1),
        make_asset("c", 31.4, 74.6),
    ];
    registry.replace_all(&assets);

    let bounds = registry.bounds().unwrap();
    for asset in &assets {
        assert!(bounds.contains(asset.position()));
    }
}

#[test]
fn test_upsert_extends_bounds() {
    let registry = AssetRegistry::new();
    registry.replace_all(&[make_asset("a", 31.5, 74.3)]);

    registry.upsert(make_asset("b", 31.9, 74.9));

    let bounds = registry.bounds().unwrap();
    assert!(bounds.contains(GeoPoint {
        lat: 31.9,
        lng: 74.9
    }));
    assert!(bounds.contains(GeoPoint {
        lat: 31.5,
        lng: 74.3
    }));
}

#[test]
fn test_empty_registry_has_no_bounds() {
    let registry = AssetRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.bounds().is_none());

    // An empty snapshot also clears the bounds
    registry.upsert(make_asset("a", 31.5, 74.3));
    registry.replace_all(&[]);
    assert!(registry.bounds().is_none());
}

#[test]
fn test_get_nonexistent_asset() {
    let registry = AssetRegistry::new();
    assert!(registry.get("nonexistent").is_none());
}

#[test]
fn test_concurrent_upserts() {
    let registry = Arc::new(AssetRegistry::new());
    let mut handles = vec![];

    for i in 0..10 {
        let registry_clone = Arc::clone(&registry);
        let handle = thread::spawn(move || {
            let id = format!("asset-{:03}", i);
            registry_clone.upsert(make_asset(&id, 31.5 + i as f64 * 0.01, 74.3));
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 10);
    let bounds = registry.bounds().unwrap();
    assert!(bounds.contains(GeoPoint {
        lat: 31.59,
        lng: 74.3
    }));
}
