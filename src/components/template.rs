// Typed push templates
// Every optional payload field resolves to a documented default here so builders never re-parse strings

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::{defaults, payload_keys};
use super::payload::{PushPayload, TrackInfo};
use super::template_type::PushTemplateType;
use super::{CampaignError, CampaignResult};

/// What happens when the notification body or a button is tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionType {
    Deeplink,
    WebUrl,
    Dismiss,
    OpenApp,
    #[default]
    None,
}

impl ActionType {
    pub fn parse(value: &str) -> Self {
        match value {
            "DEEPLINK" => ActionType::Deeplink,
            "WEBURL" => ActionType::WebUrl,
            "DISMISS" => ActionType::Dismiss,
            "OPENAPP" => ActionType::OpenApp,
            _ => ActionType::None,
        }
    }

    /// Only link-carrying actions keep their uri
    pub fn carries_uri(&self) -> bool {
        matches!(self, ActionType::Deeplink | ActionType::WebUrl)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub label: String,
    pub link: Option<String>,
    pub action_type: ActionType,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, link: Option<String>, action_type: ActionType) -> Self {
        Self {
            label: label.into(),
            link,
            action_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum NotificationPriority {
    Min,
    Low,
    #[default]
    Default,
    High,
    Max,
}

impl NotificationPriority {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("PRIORITY_MIN") => NotificationPriority::Min,
            Some("PRIORITY_LOW") => NotificationPriority::Low,
            Some("PRIORITY_DEFAULT") => NotificationPriority::Default,
            Some("PRIORITY_HIGH") => NotificationPriority::High,
            Some("PRIORITY_MAX") => NotificationPriority::Max,
            _ => NotificationPriority::Default,
        }
    }

    /// Channel importance matching this priority
    pub fn importance(&self) -> NotificationImportance {
        match self {
            NotificationPriority::Min => NotificationImportance::Min,
            NotificationPriority::Low => NotificationImportance::Low,
            NotificationPriority::Default => NotificationImportance::Default,
            NotificationPriority::High => NotificationImportance::High,
            NotificationPriority::Max => NotificationImportance::Max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum NotificationImportance {
    Min,
    Low,
    #[default]
    Default,
    High,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NotificationVisibility {
    Public,
    #[default]
    Private,
    Secret,
}

impl NotificationVisibility {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("PUBLIC") => NotificationVisibility::Public,
            Some("PRIVATE") => NotificationVisibility::Private,
            Some("SECRET") => NotificationVisibility::Secret,
            _ => NotificationVisibility::Private,
        }
    }
}

/// Six hex digit color hints; invalid values are dropped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateColors {
    pub title_text: Option<String>,
    pub expanded_body_text: Option<String>,
    pub small_icon: Option<String>,
    pub background: Option<String>,
}

impl TemplateColors {
    fn from_payload(payload: &PushPayload) -> Self {
        Self {
            title_text: hex_color(payload, payload_keys::TITLE_TEXT_COLOR),
            expanded_body_text: hex_color(payload, payload_keys::EXPANDED_BODY_TEXT_COLOR),
            small_icon: hex_color(payload, payload_keys::SMALL_ICON_COLOR),
            background: hex_color(payload, payload_keys::BACKGROUND_COLOR),
        }
    }
}

fn hex_color(payload: &PushPayload, key: &str) -> Option<String> {
    let value = payload.get(key)?;
    if value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", value))
    } else {
        tracing::debug!(key = key, value = value, "Ignoring color that is not six hex digits");
        None
    }
}

/// "Remind me later" button shown by basic and input box templates
///
/// Only present when both the label and a positive timestamp are in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemindLater {
    pub text: String,
    /// Epoch seconds at which the notification should reappear
    pub timestamp: i64,
}

impl RemindLater {
    fn from_payload(payload: &PushPayload) -> Option<Self> {
        let text = payload.get(payload_keys::REMIND_LATER_TEXT)?;
        let raw = payload.get(payload_keys::REMIND_LATER_TIMESTAMP)?;
        match raw.parse::<i64>() {
            Ok(timestamp) if timestamp > 0 => Some(Self {
                text: text.to_string(),
                timestamp,
            }),
            Ok(timestamp) => {
                tracing::debug!(timestamp, "Remind later timestamp is not positive, skipping button");
                None
            },
            Err(e) => {
                tracing::debug!(value = raw, error = %e, "Invalid remind later timestamp");
                None
            },
        }
    }
}

/// Fields shared by every template variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateBase {
    pub template_type: PushTemplateType,
    pub payload_version: u32,
    pub title: String,
    pub body: String,
    pub expanded_body: Option<String>,
    pub sound: Option<String>,
    pub badge_count: u32,
    pub priority: NotificationPriority,
    pub importance: NotificationImportance,
    pub visibility: NotificationVisibility,
    pub channel_id: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub ticker: Option<String>,
    pub sticky: bool,
    pub action_type: ActionType,
    pub action_uri: Option<String>,
    pub action_buttons: Vec<ActionButton>,
    pub colors: TemplateColors,
    pub message_id: String,
    pub delivery_id: String,
    pub tag: String,
}

impl TemplateBase {
    pub fn from_payload(payload: &PushPayload) -> CampaignResult<Self> {
        let title = payload
            .get(payload_keys::TITLE)
            .ok_or_else(|| CampaignError::validation(payload_keys::TITLE, "required field not found"))?
            .to_string();
        let body = payload
            .get(payload_keys::BODY)
            .ok_or_else(|| CampaignError::validation(payload_keys::BODY, "required field not found"))?
            .to_string();

        let payload_version = match payload.get(payload_keys::VERSION) {
            Some(version) => version.parse::<u32>().unwrap_or_else(|e| {
                tracing::debug!(value = version, error = %e, "Invalid payload version, using legacy");
                defaults::LEGACY_PAYLOAD_VERSION
            }),
            None => defaults::LEGACY_PAYLOAD_VERSION,
        };

        let badge_count = match payload.get(payload_keys::BADGE_COUNT) {
            Some(count) => count.parse::<u32>().unwrap_or_else(|e| {
                tracing::debug!(
                    value = count,
                    error = %e,
                    "Exception in converting notification badge count to int"
                );
                0
            }),
            None => 0,
        };

        let priority = NotificationPriority::parse(payload.get(payload_keys::PRIORITY));
        let action_type = payload
            .get(payload_keys::ACTION_TYPE)
            .map(ActionType::parse)
            .unwrap_or_default();

        let action_buttons = match payload.get(payload_keys::ACTION_BUTTONS) {
            Some(raw) => parse_action_buttons(raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Dropping action buttons");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let optional = |key: &str| payload.get(key).map(str::to_string);

        Ok(Self {
            template_type: PushTemplateType::from_payload(payload),
            payload_version,
            title,
            body,
            expanded_body: optional(payload_keys::EXPANDED_BODY_TEXT),
            sound: optional(payload_keys::SOUND),
            badge_count,
            priority,
            importance: priority.importance(),
            visibility: NotificationVisibility::parse(payload.get(payload_keys::VISIBILITY)),
            channel_id: optional(payload_keys::CHANNEL_ID),
            icon: optional(payload_keys::SMALL_ICON).or_else(|| optional(payload_keys::ICON)),
            image_url: optional(payload_keys::IMAGE_URL),
            ticker: optional(payload_keys::TICKER),
            sticky: payload
                .get(payload_keys::STICKY)
                .is_some_and(|s| s.eq_ignore_ascii_case("true")),
            action_type,
            action_uri: optional(payload_keys::ACTION_URI),
            action_buttons,
            colors: TemplateColors::from_payload(payload),
            message_id: payload.message_id().to_string(),
            delivery_id: payload.delivery_id().to_string(),
            tag: payload.tag().to_string(),
        })
    }

    pub fn track_info(&self) -> TrackInfo {
        TrackInfo::new(self.message_id.clone(), self.delivery_id.clone())
    }
}

/// Parse the `adb_act` JSON array
///
/// Entries without a label or type are skipped. A value that is not an array of
/// objects is rejected as a whole.
pub fn parse_action_buttons(raw: &str) -> CampaignResult<Vec<ActionButton>> {
    let entries = parse_object_array(raw, "action buttons")?;
    let mut buttons = Vec::with_capacity(entries.len());

    for entry in entries {
        let label = entry.get("label").and_then(Value::as_str).unwrap_or_default();
        if label.is_empty() {
            tracing::debug!("Label is empty");
            continue;
        }
        let Some(kind) = entry.get("type").and_then(Value::as_str) else {
            tracing::warn!(label = label, "Action button has no type");
            continue;
        };
        let action_type = ActionType::parse(kind);
        let link = if action_type.carries_uri() {
            entry
                .get("uri")
                .and_then(Value::as_str)
                .map(str::to_string)
        } else {
            None
        };
        tracing::trace!(label = label, link = ?link, kind = kind, "Creating an ActionButton");
        buttons.push(ActionButton::new(label, link, action_type));
    }

    Ok(buttons)
}

fn parse_object_array(
    raw: &str,
    content_type: &str,
) -> CampaignResult<Vec<serde_json::Map<String, Value>>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CampaignError::malformed(content_type, e.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(CampaignError::malformed(content_type, "expected a JSON array"));
    };
    entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(map) => Ok(map),
            other => Err(CampaignError::malformed(
                content_type,
                format!("expected an object, found {}", other),
            )),
        })
        .collect()
}

/// One image of a carousel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselItem {
    pub image_uri: String,
    pub caption_text: Option<String>,
    pub interaction_uri: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarouselMode {
    Auto,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CarouselLayout {
    #[default]
    Default,
    Filmstrip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselTemplate {
    pub base: TemplateBase,
    pub mode: CarouselMode,
    pub layout: CarouselLayout,
    pub items: Vec<CarouselItem>,
}

impl CarouselTemplate {
    pub fn from_payload(payload: &PushPayload) -> CampaignResult<Self> {
        let base = TemplateBase::from_payload(payload)?;

        let mode = match payload.get(payload_keys::CAROUSEL_MODE) {
            Some(defaults::AUTO_CAROUSEL_MODE) => CarouselMode::Auto,
            Some(defaults::MANUAL_CAROUSEL_MODE) => CarouselMode::Manual,
            _ if base.template_type == PushTemplateType::AutoCarousel => CarouselMode::Auto,
            _ => CarouselMode::Manual,
        };

        let layout = match payload.get(payload_keys::CAROUSEL_LAYOUT) {
            Some(defaults::FILMSTRIP_LAYOUT) => CarouselLayout::Filmstrip,
            Some(_) => CarouselLayout::Default,
            None => {
                tracing::debug!("Required field \"adb_car_layout\" not found, using default layout");
                CarouselLayout::Default
            },
        };

        let items = match payload.get(payload_keys::CAROUSEL_ITEMS) {
            Some(raw) => parse_carousel_items(raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Dropping carousel items");
                Vec::new()
            }),
            None => {
                tracing::debug!("Required field \"adb_items\" not found");
                Vec::new()
            },
        };

        Ok(Self {
            base,
            mode,
            layout,
            items,
        })
    }
}

/// Parse the `adb_items` JSON array, stopping at the first entry without an image
pub fn parse_carousel_items(raw: &str) -> CampaignResult<Vec<CarouselItem>> {
    let entries = parse_object_array(raw, "carousel items")?;
    let text = |entry: &serde_json::Map<String, Value>, key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let mut items = Vec::with_capacity(entries.len());
    for entry in &entries {
        let Some(image_uri) = text(entry, payload_keys::CAROUSEL_ITEM_IMAGE) else {
            break;
        };
        items.push(CarouselItem {
            image_uri,
            caption_text: text(entry, payload_keys::CAROUSEL_ITEM_TEXT),
            interaction_uri: text(entry, payload_keys::CAROUSEL_ITEM_URI),
        });
    }
    Ok(items)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicTemplate {
    pub base: TemplateBase,
    pub remind_later: Option<RemindLater>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputBoxTemplate {
    pub base: TemplateBase,
    pub input_hint: Option<String>,
    pub feedback_text: Option<String>,
    pub feedback_image: Option<String>,
    pub remind_later: Option<RemindLater>,
}

impl InputBoxTemplate {
    pub fn from_payload(payload: &PushPayload) -> CampaignResult<Self> {
        Ok(Self {
            base: TemplateBase::from_payload(payload)?,
            input_hint: payload.get(payload_keys::INPUT_FIELD_TEXT).map(str::to_string),
            feedback_text: payload
                .get(payload_keys::FEEDBACK_RECEIVED_TEXT)
                .map(str::to_string),
            feedback_image: payload
                .get(payload_keys::FEEDBACK_RECEIVED_IMAGE)
                .map(str::to_string),
            remind_later: RemindLater::from_payload(payload),
        })
    }
}

/// Template variant chosen from `adb_template_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PushTemplate {
    Legacy(TemplateBase),
    Basic(BasicTemplate),
    Carousel(CarouselTemplate),
    InputBox(InputBoxTemplate),
}

impl PushTemplate {
    pub fn from_payload(payload: &PushPayload) -> CampaignResult<Self> {
        let template = match PushTemplateType::from_payload(payload) {
            PushTemplateType::Legacy | PushTemplateType::Unknown => {
                PushTemplate::Legacy(TemplateBase::from_payload(payload)?)
            },
            PushTemplateType::Basic => PushTemplate::Basic(BasicTemplate {
                base: TemplateBase::from_payload(payload)?,
                remind_later: RemindLater::from_payload(payload),
            }),
            PushTemplateType::AutoCarousel | PushTemplateType::ManualCarousel => {
                PushTemplate::Carousel(CarouselTemplate::from_payload(payload)?)
            },
            PushTemplateType::InputBox => {
                PushTemplate::InputBox(InputBoxTemplate::from_payload(payload)?)
            },
        };
        Ok(template)
    }

    pub fn base(&self) -> &TemplateBase {
        match self {
            PushTemplate::Legacy(base) => base,
            PushTemplate::Basic(basic) => &basic.base,
            PushTemplate::Carousel(carousel) => &carousel.base,
            PushTemplate::InputBox(input) => &input.base,
        }
    }
}
