// The `adb_template_type` discriminator
// Unrecognised codes map to `Unknown` and render like the legacy layout

use serde::{Deserialize, Serialize};

use super::constants::payload_keys;
use super::payload::PushPayload;

/// Layout family requested by `adb_template_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PushTemplateType {
    Legacy,
    Basic,
    AutoCarousel,
    ManualCarousel,
    InputBox,
    /// Anything unrecognised; rendered exactly like `Legacy`
    #[default]
    Unknown,
}

impl PushTemplateType {
    /// Total mapping from the discriminator string
    pub fn from_code(code: &str) -> Self {
        match code {
            "-1" => PushTemplateType::Legacy,
            "0" => PushTemplateType::Basic,
            "1" => PushTemplateType::AutoCarousel,
            "2" => PushTemplateType::ManualCarousel,
            "3" => PushTemplateType::InputBox,
            _ => PushTemplateType::Unknown,
        }
    }

    pub fn from_payload(payload: &PushPayload) -> Self {
        payload
            .get(payload_keys::TEMPLATE_TYPE)
            .map(Self::from_code)
            .unwrap_or_default()
    }

    /// Wire code, `None` for `Unknown`
    pub fn code(&self) -> Option<&'static str> {
        match self {
            PushTemplateType::Legacy => Some("-1"),
            PushTemplateType::Basic => Some("0"),
            PushTemplateType::AutoCarousel => Some("1"),
            PushTemplateType::ManualCarousel => Some("2"),
            PushTemplateType::InputBox => Some("3"),
            PushTemplateType::Unknown => None,
        }
    }

    pub fn is_carousel(&self) -> bool {
        matches!(
            self,
            PushTemplateType::AutoCarousel | PushTemplateType::ManualCarousel
        )
    }
}

impl std::fmt::Display for PushTemplateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PushTemplateType::Legacy => "legacy",
            PushTemplateType::Basic => "basic",
            PushTemplateType::AutoCarousel => "auto_carousel",
            PushTemplateType::ManualCarousel => "manual_carousel",
            PushTemplateType::InputBox => "input_box",
            PushTemplateType::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}
