//! Campaign Classic push messaging
//!
//! Device registration with the marketing server, receive/click tracking and
//! template-driven notification building (basic, input box and carousel
//! layouts) for push messages sent by Campaign Classic.
//!
//! The host platform is reached through the traits in [`components::services`]:
//! it owns the event hub, persistence, device information and the notification
//! tray. [`backends`] ships reqwest and in-memory implementations of the
//! networking, image and storage seams.

use std::collections::HashMap;
use std::sync::Arc;

pub mod backends;
pub mod components;

pub use backends::*;
pub use components::*;

use components::constants::EXTENSION_VERSION;
use components::registration::register_event;

/// Public entry points used by the application
#[derive(Clone)]
pub struct CampaignClassic {
    dispatcher: Arc<dyn EventDispatcher>,
    tracking: TrackingDispatcher,
}

impl CampaignClassic {
    pub fn new(dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self {
            tracking: TrackingDispatcher::new(dispatcher.clone()),
            dispatcher,
        }
    }

    pub fn extension_version() -> &'static str {
        EXTENSION_VERSION
    }

    /// Ask the extension to register `token` with the marketing server
    pub fn register_device(
        &self,
        token: &str,
        user_key: Option<&str>,
        additional_params: Option<&AdditionalParameters>,
    ) -> CampaignResult<()> {
        if token.is_empty() {
            tracing::warn!("registerDevice - Failed to register device, token is null or empty.");
            return Err(CampaignError::validation("token", "device token is null or empty"));
        }

        tracing::debug!("registerDevice - Dispatching register device event");
        self.dispatcher
            .dispatch(register_event(token, user_key, additional_params));
        Ok(())
    }

    /// Report that a Campaign notification reached the device
    pub fn track_notification_receive(&self, track_info: &HashMap<String, String>) -> CampaignResult<()> {
        self.tracking.track(TrackingKind::Receive, track_info)
    }

    /// Report that the user tapped a Campaign notification
    pub fn track_notification_click(&self, track_info: &HashMap<String, String>) -> CampaignResult<()> {
        self.tracking.track(TrackingKind::Click, track_info)
    }
}

impl std::fmt::Debug for CampaignClassic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignClassic")
            .field("version", &EXTENSION_VERSION)
            .finish_non_exhaustive()
    }
}
