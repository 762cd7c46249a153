// Push payload parsing, template selection, tracking and registration
// Host platform collaborators are reached only through the traits in `services`

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod carousel;
pub mod config;
pub mod constants;
pub mod event;
pub mod extension;
pub mod interaction;
pub mod messaging;
pub mod payload;
pub mod registration;
pub mod serializer;
pub mod services;
pub mod template;
pub mod template_type;
pub mod tracking;

pub use builder::{
    BuildOutcome, Builder, ChannelSpec, FallbackReason, NotificationBuilder, NotificationLayout,
    NotificationSpec,
};
pub use carousel::{
    CarouselFrame, CarouselIndices, CarouselNavigationState, Direction, Navigate, advance,
};
pub use config::{CampaignConfiguration, PrivacyStatus};
pub use event::{Event, EventData};
pub use extension::CampaignClassicExtension;
pub use interaction::{InteractionOutcome, NotificationInteraction, PlatformCommand};
pub use messaging::PushMessageHandler;
pub use payload::{PushPayload, RemoteNotification, TrackInfo};
pub use registration::RegistrationManager;
pub use serializer::{AdditionalParameters, ParamValue, serialize_map};
pub use services::{
    DeviceInfo, DeviceInforming, EventDispatcher, ExtensionApi, FetchedImage, HttpMethod,
    ImageFetcher, NamedCollection, NetworkRequest, NetworkResponse, Networking,
    NotificationPresenter, ServiceFuture,
};
pub use template::{
    ActionButton, ActionType, BasicTemplate, CarouselItem, CarouselLayout, CarouselMode,
    CarouselTemplate, InputBoxTemplate, NotificationImportance, NotificationPriority,
    NotificationVisibility, PushTemplate, RemindLater, TemplateBase, TemplateColors,
};
pub use template_type::PushTemplateType;
pub use tracking::{TrackRequestManager, TrackingDispatcher, TrackingKind};

/// Error types shared by every component of the extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum CampaignError {
    /// A required field is missing, empty or unusable
    #[error("Validation error in {field}: {message}")]
    ValidationError { field: String, message: String },
    /// Image download/decode failure or an unusable local resource
    #[error("Resource error with {resource_type} '{resource_id}': {message}")]
    ResourceError {
        resource_type: String,
        resource_id: String,
        message: String,
    },
    /// Transport level failure talking to a remote server
    #[error("Network error for {url}: {message}")]
    NetworkError { url: String, message: String },
    /// JSON embedded in the payload could not be decoded
    #[error("Malformed {content_type}: {message}")]
    MalformedContent {
        content_type: String,
        message: String,
    },
    /// A host collaborator the operation depends on is not available
    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },
    #[error("Timeout error in {operation} after {timeout_duration:?}")]
    TimeoutError {
        operation: String,
        timeout_duration: Duration,
    },
}

impl CampaignError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn image(resource_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResourceError {
            resource_type: "image".to_string(),
            resource_id: resource_id.into(),
            message: message.into(),
        }
    }

    pub fn malformed(content_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedContent {
            content_type: content_type.into(),
            message: message.into(),
        }
    }

    /// Validation failures mean the notification must not be shown
    pub fn is_validation(&self) -> bool {
        matches!(self, CampaignError::ValidationError { .. })
    }
}

/// Type alias for results produced by this crate
pub type CampaignResult<T> = Result<T, CampaignError>;

/// Returns the value for `key` when it is present and not empty
pub(crate) fn non_empty<'a>(
    data: &'a std::collections::HashMap<String, String>,
    key: &str,
) -> Option<&'a str> {
    data.get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
