// Campaign Classic extension: routes hub events to the registration and tracking managers

use std::sync::Arc;

use super::config::{CampaignConfiguration, PrivacyStatus};
use super::constants::{EXTENSION_NAME, EXTENSION_VERSION, FRIENDLY_NAME, config_keys};
use super::event::Event;
use super::registration::RegistrationManager;
use super::services::{DeviceInforming, ExtensionApi, NamedCollection, Networking};
use super::tracking::{TrackRequestManager, TrackingKind};
use super::CampaignResult;

#[derive(Clone)]
pub struct CampaignClassicExtension {
    api: Arc<dyn ExtensionApi>,
    registration: RegistrationManager,
    tracking: TrackRequestManager,
}

impl CampaignClassicExtension {
    pub fn new(
        api: Arc<dyn ExtensionApi>,
        device_info: Option<Arc<dyn DeviceInforming>>,
        datastore: Option<Arc<dyn NamedCollection>>,
        network: Option<Arc<dyn Networking>>,
    ) -> Self {
        Self {
            registration: RegistrationManager::new(api.clone(), device_info, datastore, network.clone()),
            tracking: TrackRequestManager::new(api.clone(), network),
            api,
        }
    }

    pub fn name(&self) -> &'static str {
        EXTENSION_NAME
    }

    pub fn friendly_name(&self) -> &'static str {
        FRIENDLY_NAME
    }

    pub fn version(&self) -> &'static str {
        EXTENSION_VERSION
    }

    /// Events are held back until configuration has been published
    pub fn ready_for_event(&self, event: &Event) -> bool {
        self.api
            .shared_state(config_keys::EXTENSION_NAME, event)
            .is_some()
    }

    pub fn registration(&self) -> &RegistrationManager {
        &self.registration
    }

    pub async fn handle_event(&self, event: &Event) -> CampaignResult<()> {
        if event.is_campaign_request() {
            self.handle_campaign_request_event(event).await
        } else if event.is_configuration_response() {
            self.handle_configuration_response_event(event);
            Ok(())
        } else {
            tracing::trace!(name = %event.name, "Ignoring event of unhandled type");
            Ok(())
        }
    }

    pub async fn handle_campaign_request_event(&self, event: &Event) -> CampaignResult<()> {
        if event.data.is_empty() {
            tracing::debug!("handleCampaignRequestEvent - Ignoring event with null or empty EventData.");
            return Ok(());
        }

        if event.is_register_event() {
            self.registration.register_device(event).await
        } else if event.is_track_receive_event() {
            self.tracking
                .handle_track_request(event, TrackingKind::Receive)
                .await
        } else if event.is_track_click_event() {
            self.tracking
                .handle_track_request(event, TrackingKind::Click)
                .await
        } else {
            tracing::trace!(name = %event.name, "handleCampaignRequestEvent - Event carries no known request flag");
            Ok(())
        }
    }

    /// Opting out forgets the stored registration
    pub fn handle_configuration_response_event(&self, event: &Event) {
        let config = CampaignConfiguration::from_shared_state(&event.data);
        if config.privacy == PrivacyStatus::OptOut {
            tracing::debug!("handleConfigurationResponseEvent - Privacy status is optedOut, clearing registration data.");
            self.registration.clear_registration_data();
        }
    }
}

impl std::fmt::Debug for CampaignClassicExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignClassicExtension")
            .field("name", &EXTENSION_NAME)
            .field("version", &EXTENSION_VERSION)
            .finish_non_exhaustive()
    }
}
