// Receive/click tracking
// The public API side packages track info into events; the extension side turns them into GET requests

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::CampaignConfiguration;
use super::constants::{
    MESSAGE_CLICKED_TAG_ID, MESSAGE_RECEIVED_TAG_ID, config_keys, event_keys, event_names,
};
use super::event::{Event, track_info_value};
use super::payload::TrackInfo;
use super::services::{EventDispatcher, ExtensionApi, NetworkRequest, Networking};
use super::{CampaignError, CampaignResult};

/// Message ids sent by newer servers are UUIDs and are used verbatim
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[0-9a-f]{8}-([0-9a-f]{4}-){3}[0-9a-f]{12}$")
        .expect("UUID pattern must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingKind {
    Receive,
    Click,
}

impl TrackingKind {
    pub fn event_name(&self) -> &'static str {
        match self {
            TrackingKind::Receive => event_names::TRACK_RECEIVE,
            TrackingKind::Click => event_names::TRACK_CLICK,
        }
    }

    pub fn flag_key(&self) -> &'static str {
        match self {
            TrackingKind::Receive => event_keys::TRACK_RECEIVE,
            TrackingKind::Click => event_keys::TRACK_CLICK,
        }
    }

    /// Tag id appended to the tracking URL
    pub fn tag_id(&self) -> &'static str {
        match self {
            TrackingKind::Receive => MESSAGE_RECEIVED_TAG_ID,
            TrackingKind::Click => MESSAGE_CLICKED_TAG_ID,
        }
    }
}

/// Campaign request event asking the extension to track `info`
pub fn track_event(kind: TrackingKind, info: &TrackInfo) -> Event {
    Event::campaign_request(kind.event_name())
        .with_entry(kind.flag_key(), true)
        .with_entry(event_keys::TRACK_INFO, track_info_value(info))
}

/// Hands receive/click notifications to the host event bus
#[derive(Clone)]
pub struct TrackingDispatcher {
    dispatcher: Arc<dyn EventDispatcher>,
}

impl TrackingDispatcher {
    pub fn new(dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Dispatch one tracking event; keys other than `_mId` and `_dId` are ignored
    pub fn track(&self, kind: TrackingKind, track_info: &HashMap<String, String>) -> CampaignResult<()> {
        let info = TrackInfo::from_map(track_info).inspect_err(|e| {
            tracing::error!(
                kind = ?kind,
                error = %e,
                "Cannot track notification, trackInfo is missing a required identifier"
            );
        })?;
        self.track_info(kind, &info);
        Ok(())
    }

    pub fn track_info(&self, kind: TrackingKind, info: &TrackInfo) {
        tracing::debug!(
            kind = ?kind,
            message_id = %info.message_id,
            delivery_id = %info.delivery_id,
            "Dispatching track notification event"
        );
        self.dispatcher.dispatch(track_event(kind, info));
    }
}

/// Normalise a message id for the tracking URL
///
/// UUIDs pass through, decimal ids become lowercase hex of their 32-bit value.
pub fn normalize_message_id(message_id: &str) -> Option<String> {
    if UUID_PATTERN.is_match(message_id) {
        return Some(message_id.to_string());
    }
    match message_id.parse::<i32>() {
        Ok(id) => Some(format!("{:x}", id)),
        Err(e) => {
            tracing::debug!(
                message_id = message_id,
                error = %e,
                "handleTrackRequest - messageId could not be parsed as a UUID or a decimal (integer)"
            );
            None
        },
    }
}

pub fn tracking_url(tracking_server: &str, message_id: &str, delivery_id: &str, kind: TrackingKind) -> String {
    format!(
        "https://{}/r/?id=h{},{},{}",
        tracking_server,
        message_id,
        delivery_id,
        kind.tag_id()
    )
}

/// Sends tracking requests for campaign request events
#[derive(Clone)]
pub struct TrackRequestManager {
    api: Arc<dyn ExtensionApi>,
    network: Option<Arc<dyn Networking>>,
}

impl TrackRequestManager {
    pub fn new(api: Arc<dyn ExtensionApi>, network: Option<Arc<dyn Networking>>) -> Self {
        Self { api, network }
    }

    /// Build the tracking request for `event`, or `None` when it must not be sent
    pub fn prepare(&self, event: &Event, kind: TrackingKind) -> Option<NetworkRequest> {
        let config = CampaignConfiguration::from_optional(
            self.api
                .shared_state(config_keys::EXTENSION_NAME, event)
                .as_ref(),
        );

        if !config.is_opted_in() {
            tracing::debug!(
                "handleTrackRequest - Failed to process TrackNotification request, MobilePrivacyStatus is not optedIn."
            );
            return None;
        }
        let Some(tracking_server) = config.tracking_server.as_deref() else {
            tracing::debug!(
                "handleTrackRequest - Failed to process TrackNotification request, Configuration not available."
            );
            return None;
        };
        let Some(delivery_id) = event.delivery_id() else {
            tracing::debug!(
                "handleTrackRequest - Failed to process TrackNotification request, trackingInfo deliveryId is null or empty."
            );
            return None;
        };
        let Some(message_id) = event.message_id() else {
            tracing::debug!(
                "handleTrackRequest - Failed to process TrackNotification request, trackingInfo messageId is null or empty."
            );
            return None;
        };
        let message_id = normalize_message_id(message_id)?;

        let url = tracking_url(tracking_server, &message_id, delivery_id, kind);
        Some(NetworkRequest::get(url, config.timeout))
    }

    pub async fn handle_track_request(&self, event: &Event, kind: TrackingKind) -> CampaignResult<()> {
        let Some(request) = self.prepare(event, kind) else {
            return Ok(());
        };
        let Some(network) = self.network.as_ref() else {
            tracing::debug!("sendTrackingRequest - Cannot send request, Network service is not available");
            return Err(CampaignError::ServiceUnavailable {
                service: "network".to_string(),
            });
        };

        tracing::trace!(url = %request.url, "sendTrackingRequest - TrackingNotification network call initiated");
        let response = network.connect(request).await?;
        if response.is_ok() {
            tracing::trace!(message = ?response.message, "sendTrackingRequest - Connection successful");
        } else {
            tracing::warn!(
                status = response.status,
                message = ?response.message,
                "sendTrackingRequest - Connection failed"
            );
        }
        Ok(())
    }
}
