// Events exchanged with the host event bus

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::constants::{event_keys, event_sources, event_types};
use super::payload::TrackInfo;
use super::serializer::AdditionalParameters;

/// JSON object carried by an event or published as shared state
pub type EventData = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub event_type: String,
    pub source: String,
    pub data: EventData,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(
        name: impl Into<String>,
        event_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            event_type: event_type.into(),
            source: source.into(),
            data: EventData::new(),
            timestamp: Utc::now(),
        }
    }

    /// Campaign request content event, the kind the extension listens for
    pub fn campaign_request(name: impl Into<String>) -> Self {
        Self::new(name, event_types::CAMPAIGN, event_sources::REQUEST_CONTENT)
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn is_campaign_request(&self) -> bool {
        self.event_type == event_types::CAMPAIGN && self.source == event_sources::REQUEST_CONTENT
    }

    pub fn is_configuration_response(&self) -> bool {
        self.event_type == event_types::CONFIGURATION
            && self.source == event_sources::RESPONSE_CONTENT
    }

    pub fn flag(&self, key: &str) -> bool {
        self.data.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// String value for `key`, `None` when missing or blank
    pub fn string(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn is_register_event(&self) -> bool {
        self.flag(event_keys::REGISTER_DEVICE)
    }

    pub fn is_track_receive_event(&self) -> bool {
        self.flag(event_keys::TRACK_RECEIVE)
    }

    pub fn is_track_click_event(&self) -> bool {
        self.flag(event_keys::TRACK_CLICK)
    }

    pub fn device_token(&self) -> Option<&str> {
        self.string(event_keys::DEVICE_TOKEN)
    }

    pub fn user_key(&self) -> Option<&str> {
        self.string(event_keys::USER_KEY)
    }

    pub fn additional_parameters(&self) -> AdditionalParameters {
        self.data
            .get(event_keys::ADDITIONAL_PARAMETERS)
            .and_then(Value::as_object)
            .map(AdditionalParameters::from_json)
            .unwrap_or_default()
    }

    fn tracking_value(&self, key: &str) -> Option<&str> {
        self.data
            .get(event_keys::TRACK_INFO)
            .and_then(Value::as_object)
            .and_then(|info| info.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn message_id(&self) -> Option<&str> {
        self.tracking_value(event_keys::TRACK_INFO_MESSAGE_ID)
    }

    pub fn delivery_id(&self) -> Option<&str> {
        self.tracking_value(event_keys::TRACK_INFO_DELIVERY_ID)
    }
}

pub(crate) fn track_info_value(info: &TrackInfo) -> Value {
    let map: HashMap<String, String> = info.to_map();
    Value::Object(map.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
}
