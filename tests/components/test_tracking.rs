//! Tests for components/tracking.rs

use std::time::Duration;

use serde_json::json;

use campaign_classic_push::components::tracking::track_event;
use campaign_classic_push::{
    CampaignError, HttpMethod, TrackInfo, TrackRequestManager, TrackingDispatcher, TrackingKind,
};

use crate::support::{Harness, data};

fn manager(harness: &Harness) -> TrackRequestManager {
    TrackRequestManager::new(harness.extension_api(), harness.network_service())
}

#[test]
fn test_dispatcher_emits_receive_event() {
    let harness = Harness::new();
    let tracking = TrackingDispatcher::new(harness.event_dispatcher());

    tracking
        .track(
            TrackingKind::Receive,
            &data(&[("_mId", "12345"), ("_dId", "67890"), ("extra", "ignored")]),
        )
        .unwrap();

    let events = harness.dispatcher.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.name, "CampaignClassic Track Notification Receive");
    assert!(event.is_campaign_request());
    assert!(event.is_track_receive_event());
    assert!(!event.is_track_click_event());
    assert_eq!(event.message_id(), Some("12345"));
    assert_eq!(event.delivery_id(), Some("67890"));
    assert_eq!(event.data["trackinfo"].as_object().map(|o| o.len()), Some(2));
}

#[test]
fn test_dispatcher_rejects_incomplete_track_info() {
    let harness = Harness::new();
    let tracking = TrackingDispatcher::new(harness.event_dispatcher());

    let result = tracking.track(TrackingKind::Click, &data(&[("_mId", "12345")]));

    assert!(matches!(result, Err(CampaignError::ValidationError { .. })));
    assert!(harness.dispatcher.events().is_empty());
}

#[tokio::test]
async fn test_receive_request_uses_hex_message_id() {
    let harness = Harness::new();
    let event = track_event(TrackingKind::Receive, &TrackInfo::new("12345", "67890"));

    manager(&harness)
        .handle_track_request(&event, TrackingKind::Receive)
        .await
        .unwrap();

    let requests = harness.network.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, "https://tracking.example.com/r/?id=h3039,67890,1");
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.body, None);
    assert!(request.headers.is_empty());
    assert_eq!(request.read_timeout, Duration::from_secs(5));
}

#[tokio::test]
async fn test_click_request_keeps_uuid_message_id() {
    let harness = Harness::new();
    let message_id = "6b6499a8-9d43-4bc5-acf0-b6aeb96846f6";
    let event = track_event(TrackingKind::Click, &TrackInfo::new(message_id, "delivery"));

    manager(&harness)
        .handle_track_request(&event, TrackingKind::Click)
        .await
        .unwrap();

    assert_eq!(
        harness.network.requests()[0].url,
        format!("https://tracking.example.com/r/?id=h{},delivery,2", message_id)
    );
}

#[tokio::test]
async fn test_invalid_message_id_sends_nothing() {
    let harness = Harness::new();
    let event = track_event(TrackingKind::Receive, &TrackInfo::new("not-a-number", "67890"));

    manager(&harness)
        .handle_track_request(&event, TrackingKind::Receive)
        .await
        .unwrap();

    assert!(harness.network.requests().is_empty());
}

#[tokio::test]
async fn test_privacy_not_opted_in_sends_nothing() {
    let harness = Harness::new();
    harness.api.set_configuration(json!({
        "global.privacy": "optunknown",
        "campaignclassic.trackingServer": "tracking.example.com"
    }));
    let event = track_event(TrackingKind::Receive, &TrackInfo::new("12345", "67890"));

    manager(&harness)
        .handle_track_request(&event, TrackingKind::Receive)
        .await
        .unwrap();

    assert!(harness.network.requests().is_empty());
}

#[tokio::test]
async fn test_missing_tracking_server_sends_nothing() {
    let harness = Harness::new();
    harness.api.set_configuration(json!({ "global.privacy": "optedin" }));
    let event = track_event(TrackingKind::Click, &TrackInfo::new("12345", "67890"));

    assert!(manager(&harness).prepare(&event, TrackingKind::Click).is_none());
}

#[tokio::test]
async fn test_failed_status_is_not_an_error() {
    let harness = Harness::new();
    harness.network.respond_with(500);
    let event = track_event(TrackingKind::Receive, &TrackInfo::new("12345", "67890"));

    let result = manager(&harness)
        .handle_track_request(&event, TrackingKind::Receive)
        .await;

    assert!(result.is_ok());
    assert_eq!(harness.network.requests().len(), 1);
}

#[tokio::test]
async fn test_missing_network_service_is_reported() {
    let harness = Harness::new();
    let manager = TrackRequestManager::new(harness.extension_api(), None);
    let event = track_event(TrackingKind::Receive, &TrackInfo::new("12345", "67890"));

    let result = manager.handle_track_request(&event, TrackingKind::Receive).await;

    assert!(matches!(result, Err(CampaignError::ServiceUnavailable { .. })));
}
