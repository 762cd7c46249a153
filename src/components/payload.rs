// Inbound push message model
// Validates the identifiers and text every notification needs before any template is built

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::constants::{event_keys, payload_keys};
use super::{CampaignError, CampaignResult, non_empty};

/// Optional `notification` block of a transport message
///
/// Values here only fill gaps: a key already present in the data map wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteNotification {
    pub tag: Option<String>,
    pub icon: Option<String>,
    pub sound: Option<String>,
    pub click_action: Option<String>,
    pub channel_id: Option<String>,
    pub ticker: Option<String>,
    pub sticky: Option<bool>,
    pub visibility: Option<String>,
    pub notification_priority: Option<String>,
    pub notification_count: Option<u32>,
    pub body: Option<String>,
    pub title: Option<String>,
    pub image_url: Option<String>,
}

impl RemoteNotification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_sticky(mut self, sticky: bool) -> Self {
        self.sticky = Some(sticky);
        self
    }

    fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            (payload_keys::TAG, self.tag.clone()),
            (payload_keys::SMALL_ICON, self.icon.clone()),
            (payload_keys::SOUND, self.sound.clone()),
            (payload_keys::ACTION_URI, self.click_action.clone()),
            (payload_keys::CHANNEL_ID, self.channel_id.clone()),
            (payload_keys::TICKER, self.ticker.clone()),
            (payload_keys::STICKY, self.sticky.map(|s| s.to_string())),
            (payload_keys::VISIBILITY, self.visibility.clone()),
            (payload_keys::PRIORITY, self.notification_priority.clone()),
            (
                payload_keys::BADGE_COUNT,
                self.notification_count.map(|c| c.to_string()),
            ),
            (payload_keys::BODY, self.body.clone()),
            (payload_keys::TITLE, self.title.clone()),
            (payload_keys::IMAGE_URL, self.image_url.clone()),
        ]
    }
}

/// Validated push message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    message_id: String,
    delivery_id: String,
    tag: String,
    data: HashMap<String, String>,
}

impl PushPayload {
    /// Build a payload from the flat data map of a push message
    pub fn new(data: HashMap<String, String>) -> CampaignResult<Self> {
        Self::from_message(data, None)
    }

    /// Build a payload, first folding in the optional notification block
    pub fn from_message(
        mut data: HashMap<String, String>,
        notification: Option<&RemoteNotification>,
    ) -> CampaignResult<Self> {
        if data.is_empty() {
            return Err(CampaignError::validation(
                "data",
                "remote message data payload is empty",
            ));
        }

        if let Some(notification) = notification {
            for (key, value) in notification.entries() {
                let Some(value) = value else { continue };
                if non_empty(&data, key).is_none() {
                    data.insert(key.to_string(), value);
                }
            }
        }

        let message_id = required(&data, event_keys::TRACK_INFO_MESSAGE_ID, "message id")?;
        let delivery_id = required(&data, event_keys::TRACK_INFO_DELIVERY_ID, "delivery id")?;

        let tag = match non_empty(&data, payload_keys::TAG) {
            Some(tag) => tag.to_string(),
            None => {
                data.insert(payload_keys::TAG.to_string(), message_id.clone());
                message_id.clone()
            },
        };

        if non_empty(&data, payload_keys::BODY).is_none() {
            match non_empty(&data, payload_keys::LEGACY_BODY) {
                Some(legacy) => {
                    let legacy = legacy.to_string();
                    data.insert(payload_keys::BODY.to_string(), legacy);
                },
                None => {
                    return Err(CampaignError::validation(
                        payload_keys::BODY,
                        "neither adb_body nor _msg carries a message body",
                    ));
                },
            }
        }

        required(&data, payload_keys::TITLE, "title")?;

        tracing::trace!(
            message_id = %message_id,
            delivery_id = %delivery_id,
            tag = %tag,
            "Parsed push payload"
        );

        Ok(Self {
            message_id,
            delivery_id,
            tag,
            data,
        })
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn delivery_id(&self) -> &str {
        &self.delivery_id
    }

    /// Identifier used to replace or cancel the shown notification
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn data(&self) -> &HashMap<String, String> {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        non_empty(&self.data, key)
    }

    pub fn track_info(&self) -> TrackInfo {
        TrackInfo {
            message_id: self.message_id.clone(),
            delivery_id: self.delivery_id.clone(),
        }
    }
}

fn required(data: &HashMap<String, String>, key: &str, what: &str) -> CampaignResult<String> {
    non_empty(data, key)
        .map(str::to_string)
        .ok_or_else(|| CampaignError::validation(key, format!("{} is missing or empty", what)))
}

/// Message/delivery identifier pair reported back on receive and click
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackInfo {
    #[serde(rename = "_mId")]
    pub message_id: String,
    #[serde(rename = "_dId")]
    pub delivery_id: String,
}

impl TrackInfo {
    pub fn new(message_id: impl Into<String>, delivery_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            delivery_id: delivery_id.into(),
        }
    }

    /// Extract the pair from an arbitrary mapping; other keys are ignored
    pub fn from_map(map: &HashMap<String, String>) -> CampaignResult<Self> {
        let message_id = required(map, event_keys::TRACK_INFO_MESSAGE_ID, "message id")?;
        let delivery_id = required(map, event_keys::TRACK_INFO_DELIVERY_ID, "delivery id")?;
        Ok(Self {
            message_id,
            delivery_id,
        })
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                event_keys::TRACK_INFO_MESSAGE_ID.to_string(),
                self.message_id.clone(),
            ),
            (
                event_keys::TRACK_INFO_DELIVERY_ID.to_string(),
                self.delivery_id.clone(),
            ),
        ])
    }
}
