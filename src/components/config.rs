// Extension configuration read from the host's configuration shared state

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::{DEFAULT_TIMEOUT_SECS, config_keys};
use super::event::EventData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrivacyStatus {
    OptIn,
    OptOut,
    #[default]
    Unknown,
}

impl PrivacyStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "optedin" => PrivacyStatus::OptIn,
            "optedout" => PrivacyStatus::OptOut,
            _ => PrivacyStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyStatus::OptIn => "optedin",
            PrivacyStatus::OptOut => "optedout",
            PrivacyStatus::Unknown => "optunknown",
        }
    }
}

/// Campaign settings published by the configuration extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfiguration {
    pub privacy: PrivacyStatus,
    pub marketing_server: Option<String>,
    pub tracking_server: Option<String>,
    pub integration_key: Option<String>,
    pub timeout: Duration,
}

impl Default for CampaignConfiguration {
    fn default() -> Self {
        Self {
            privacy: PrivacyStatus::Unknown,
            marketing_server: None,
            tracking_server: None,
            integration_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CampaignConfiguration {
    pub fn from_shared_state(state: &EventData) -> Self {
        let text = |key: &str| {
            state
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        let timeout = state
            .get(config_keys::TIMEOUT)
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            privacy: state
                .get(config_keys::GLOBAL_PRIVACY)
                .and_then(Value::as_str)
                .map(PrivacyStatus::parse)
                .unwrap_or_default(),
            marketing_server: text(config_keys::MARKETING_SERVER),
            tracking_server: text(config_keys::TRACKING_SERVER),
            integration_key: text(config_keys::INTEGRATION_KEY),
            timeout: Duration::from_secs(timeout),
        }
    }

    /// Configuration for when no shared state has been published
    pub fn from_optional(state: Option<&EventData>) -> Self {
        state.map(Self::from_shared_state).unwrap_or_default()
    }

    pub fn is_opted_in(&self) -> bool {
        self.privacy == PrivacyStatus::OptIn
    }
}
