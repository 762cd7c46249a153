//! Tests for components/extension.rs

use std::sync::Arc;

use serde_json::json;

use campaign_classic_push::components::registration::register_event;
use campaign_classic_push::components::tracking::track_event;
use campaign_classic_push::{
    CampaignClassicExtension, DeviceInforming, Event, InMemoryDataStore, NamedCollection,
    TrackInfo, TrackingKind,
};

use crate::support::{Harness, mock_device};

fn extension(harness: &Harness, datastore: &Arc<InMemoryDataStore>) -> CampaignClassicExtension {
    CampaignClassicExtension::new(
        harness.extension_api(),
        Some(Arc::new(mock_device()) as Arc<dyn DeviceInforming>),
        Some(datastore.clone() as Arc<dyn NamedCollection>),
        harness.network_service(),
    )
}

#[test]
fn test_extension_identity() {
    let harness = Harness::new();
    let ext = extension(&harness, &Arc::new(InMemoryDataStore::new()));
    assert_eq!(ext.name(), "com.adobe.module.campaignclassic");
    assert_eq!(ext.friendly_name(), "CampaignClassic");
    assert_eq!(ext.version(), "2.1.3");
}

#[test]
fn test_ready_only_with_configuration() {
    let harness = Harness::new();
    let ext = extension(&harness, &Arc::new(InMemoryDataStore::new()));
    let event = register_event("token", None, None);
    assert!(ext.ready_for_event(&event));

    harness.api.set_configuration(json!(null));
    assert!(!ext.ready_for_event(&event));
}

#[tokio::test]
async fn test_routes_register_and_track_events() {
    let harness = Harness::new();
    let datastore = Arc::new(InMemoryDataStore::new());
    let ext = extension(&harness, &datastore);
    let info = TrackInfo::new("12345", "67890");

    ext.handle_event(&register_event("token", None, None)).await.unwrap();
    ext.handle_event(&track_event(TrackingKind::Receive, &info)).await.unwrap();
    ext.handle_event(&track_event(TrackingKind::Click, &info)).await.unwrap();

    let urls: Vec<_> = harness.network.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://marketing.example.com/nms/mobile/1/registerAndroid.jssp".to_string(),
            "https://tracking.example.com/r/?id=h3039,67890,1".to_string(),
            "https://tracking.example.com/r/?id=h3039,67890,2".to_string(),
        ]
    );
    assert!(!datastore.is_empty());
}

#[tokio::test]
async fn test_events_without_data_are_ignored() {
    let harness = Harness::new();
    let ext = extension(&harness, &Arc::new(InMemoryDataStore::new()));

    ext.handle_event(&Event::campaign_request("empty")).await.unwrap();
    ext.handle_event(&Event::new("other", "com.adobe.eventType.hub", "com.adobe.eventSource.sharedState"))
        .await
        .unwrap();

    assert!(harness.network.requests().is_empty());
}

#[tokio::test]
async fn test_opt_out_clears_registration() {
    let harness = Harness::new();
    let datastore = Arc::new(InMemoryDataStore::new());
    let ext = extension(&harness, &datastore);

    ext.handle_event(&register_event("token", None, None)).await.unwrap();
    assert!(!datastore.is_empty());

    let opt_in = Event::new(
        "Configuration Response",
        "com.adobe.eventType.configuration",
        "com.adobe.eventSource.responseContent",
    )
    .with_entry("global.privacy", "optedin");
    ext.handle_event(&opt_in).await.unwrap();
    assert!(!datastore.is_empty());

    let opt_out = Event::new(
        "Configuration Response",
        "com.adobe.eventType.configuration",
        "com.adobe.eventSource.responseContent",
    )
    .with_entry("global.privacy", "optedout");
    ext.handle_event(&opt_out).await.unwrap();
    assert!(datastore.is_empty());
}
