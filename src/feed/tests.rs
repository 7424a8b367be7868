use super::*;

#[test]
fn test_decode_snapshot() {
    let raw = r#"{
        "type": "snapshot",
        "data": [
            {"id": "asset-001", "name": "Vehicle 001", "lat": 31.52, "lng": 74.35, "heading_deg": 90.0, "speed_kph": 42.25, "status": "moving"},
            {"id": "asset-002", "name": "Vehicle 002", "lat": 31.53, "lng": 74.36, "heading_deg": 180.0, "speed_kph": 12.0, "status": "moving"}
        ]
    }"#;

    match FeedMessage::decode(raw).unwrap() {
        FeedMessage::Snapshot { data } => {
            assert_eq!(data.len(), 2);
            assert_eq!(data[0].id, "asset-001");
            assert_eq!(data[1].heading_deg, 180.0);
        }
        other => panic!("expected snapshot, got {:?}", other),
    }
}

#[test]
fn test_decode_asset_update() {
    let raw = r#"{
        "type": "asset_update",
        "data": {"id": "asset-001", "name": "Vehicle 001", "lat": 31.52, "lng": 74.35, "heading_deg": 90.0, "speed_kph": 42.25, "status": "moving", "last_update": "2026-02-12T15:30:45Z"}
    }"#;

    match FeedMessage::decode(raw).unwrap() {
        FeedMessage::AssetUpdate { data } => {
            assert_eq!(data.id, "asset-001");
            assert_eq!(data.speed_kph, 42.25);
            assert!(data.last_update.is_some());
        }
        other => panic!("expected asset_update, got {:?}", other),
    }
}

#[test]
fn test_unknown_type_decodes_to_unknown() {
    let raw = r#"{"type": "ping"}"#;
    assert!(matches!(
        FeedMessage::decode(raw).unwrap(),
        FeedMessage::Unknown
    ));
}

#[test]
fn test_unknown_type_with_payload_decodes_to_unknown() {
    let raw = r#"{"type": "server_notice", "data": {"text": "maintenance at midnight"}}"#;
    assert!(matches!(
        FeedMessage::decode(raw).unwrap(),
        FeedMessage::Unknown
    ));
}

#[test]
fn test_malformed_payload_is_error() {
    assert!(FeedMessage::decode("not json").is_err());
    assert!(FeedMessage::decode(r#"{"data": []}"#).is_err());
}

#[test]
fn test_update_missing_required_field_is_error() {
    // lat is required on the asset record
    let raw = r#"{
        "type": "asset_update",
        "data": {"id": "asset-001", "name": "Vehicle 001", "lng": 74.35, "heading_deg": 90.0, "speed_kph": 42.25, "status": "moving"}
    }"#;
    assert!(FeedMessage::decode(raw).is_err());
}
