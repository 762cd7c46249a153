// Device registration with the marketing server
// A hash of the registration inputs is persisted so unchanged registrations are not re-sent

use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::config::CampaignConfiguration;
use super::constants::{REGISTER_PARAM_DEVICE_OS_NAME, config_keys, datastore_keys, event_keys, event_names, http};
use super::event::Event;
use super::serializer::{AdditionalParameters, serialize_map};
use super::services::{DeviceInfo, DeviceInforming, ExtensionApi, NamedCollection, NetworkRequest, Networking};
use super::{CampaignError, CampaignResult};

/// Campaign request event asking the extension to register `token`
pub fn register_event(token: &str, user_key: Option<&str>, params: Option<&AdditionalParameters>) -> Event {
    let mut event = Event::campaign_request(event_names::REGISTER_DEVICE)
        .with_entry(event_keys::REGISTER_DEVICE, true)
        .with_entry(event_keys::DEVICE_TOKEN, token);
    if let Some(user_key) = user_key {
        event = event.with_entry(event_keys::USER_KEY, user_key);
    }
    if let Some(params) = params {
        event = event.with_entry(
            event_keys::ADDITIONAL_PARAMETERS,
            serde_json::Value::Object(params.to_json()),
        );
    }
    event
}

pub fn register_url(marketing_server: &str) -> String {
    format!("https://{}/nms/mobile/1/registerAndroid.jssp", marketing_server)
}

/// Lowercase hex SHA-256 of the registration inputs
pub fn registration_hash(token: &str, user_key: &str, additional_params: &str, device_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.update(user_key.as_bytes());
    hasher.update(additional_params.as_bytes());
    hasher.update(device_id.as_bytes());
    hex::encode(hasher.finalize())
}

/// Form-encoded registration body
pub fn registration_params(
    token: &str,
    integration_key: &str,
    user_key: &str,
    additional_params: &str,
    device: &DeviceInfo,
) -> String {
    let field = |value: Option<&String>| value.map(String::as_str).unwrap_or_default().to_string();
    let os_version = format!(
        "{} {}",
        field(device.os_name.as_ref()),
        field(device.os_version.as_ref())
    );
    let locale = field(device.active_locale.as_ref()).replace('_', "-");

    let pairs: [(&str, String); 12] = [
        ("registrationToken", token.to_string()),
        ("mobileAppUuid", integration_key.to_string()),
        ("userKey", user_key.to_string()),
        ("deviceImei", field(device.device_unique_id.as_ref())),
        ("deviceName", field(device.device.as_ref())),
        ("deviceModel", field(device.device_name.as_ref())),
        ("deviceBrand", field(device.device_brand.as_ref())),
        ("deviceManufacturer", field(device.device_manufacturer.as_ref())),
        ("osName", REGISTER_PARAM_DEVICE_OS_NAME.to_string()),
        ("osVersion", os_version),
        ("osLanguage", locale),
        ("additionalParams", additional_params.to_string()),
    ];

    pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Handles register-device requests for the extension
#[derive(Clone)]
pub struct RegistrationManager {
    api: Arc<dyn ExtensionApi>,
    device_info: Option<Arc<dyn DeviceInforming>>,
    datastore: Option<Arc<dyn NamedCollection>>,
    network: Option<Arc<dyn Networking>>,
}

impl RegistrationManager {
    pub fn new(
        api: Arc<dyn ExtensionApi>,
        device_info: Option<Arc<dyn DeviceInforming>>,
        datastore: Option<Arc<dyn NamedCollection>>,
        network: Option<Arc<dyn Networking>>,
    ) -> Self {
        Self {
            api,
            device_info,
            datastore,
            network,
        }
    }

    /// Build the registration request and its hash, or `None` when nothing should be sent
    pub fn prepare(&self, event: &Event) -> Option<(NetworkRequest, String)> {
        let Some(token) = event.device_token() else {
            tracing::debug!("registerDevice - Failed to process device registration request, device token is not available.");
            return None;
        };

        let config = CampaignConfiguration::from_optional(
            self.api
                .shared_state(config_keys::EXTENSION_NAME, event)
                .as_ref(),
        );
        if !config.is_opted_in() {
            tracing::debug!("registerDevice - Failed to process device registration request, MobilePrivacyStatus is not optedIn.");
            return None;
        }
        let Some(marketing_server) = config.marketing_server.as_deref() else {
            tracing::debug!("registerDevice - Failed to process device registration request, Marketing server is not configured.");
            return None;
        };
        let Some(integration_key) = config.integration_key.as_deref() else {
            tracing::debug!("registerDevice - Failed to process device registration request, Integration key is not configured.");
            return None;
        };

        let user_key = event.user_key().unwrap_or_default();
        let params = event.additional_parameters();
        let additional_params = serialize_map(Some(&params));
        let device = self
            .device_info
            .as_ref()
            .map(|info| info.device_info())
            .unwrap_or_default();

        let hash = registration_hash(
            token,
            user_key,
            &additional_params,
            device.device_unique_id.as_deref().unwrap_or_default(),
        );
        if !self.has_registration_info_changed(&hash) {
            tracing::debug!("registerDevice - Not sending device registration request, there is no change in registration info.");
            return None;
        }

        let body = registration_params(token, integration_key, user_key, &additional_params, &device);
        let content_length = body.len().to_string();
        let request = NetworkRequest::post(register_url(marketing_server), body.into_bytes(), config.timeout)
            .with_header(http::HEADER_CONTENT_TYPE, http::CONTENT_TYPE_FORM_UTF8)
            .with_header(http::HEADER_CONTENT_LENGTH, content_length);
        Some((request, hash))
    }

    pub async fn register_device(&self, event: &Event) -> CampaignResult<()> {
        let Some((request, hash)) = self.prepare(event) else {
            return Ok(());
        };
        let Some(network) = self.network.as_ref() else {
            tracing::debug!("sendRegistrationRequest - Cannot send request, Network service is not available.");
            return Err(CampaignError::ServiceUnavailable {
                service: "network".to_string(),
            });
        };

        tracing::trace!(url = %request.url, "sendRegistrationRequest - Registration request was sent");
        let response = network.connect(request).await?;
        if response.is_ok() {
            tracing::debug!("sendRegistrationRequest - Registration successful.");
            self.store_registration_hash(Some(&hash));
        } else {
            tracing::debug!(
                status = response.status,
                "sendRegistrationRequest - Unsuccessful Registration request"
            );
        }
        Ok(())
    }

    /// Forget the persisted registration so the next request is always sent
    pub fn clear_registration_data(&self) {
        self.store_registration_hash(None);
    }

    fn has_registration_info_changed(&self, hash: &str) -> bool {
        let Some(datastore) = self.datastore.as_ref() else {
            tracing::debug!("hasRegistrationInfoChanged - Cannot get registration info, Data store is not available.");
            return true;
        };
        let stored = datastore.get_string(datastore_keys::TOKEN_HASH);
        if stored.as_deref() == Some(hash) {
            tracing::trace!("hasRegistrationInfoChanged - Registration information has not changed in Data store.");
            return false;
        }
        true
    }

    fn store_registration_hash(&self, hash: Option<&str>) {
        let Some(datastore) = self.datastore.as_ref() else {
            tracing::debug!("updateDataStoreWithRegistrationInfo - Cannot set registration info, data store is not available.");
            return;
        };
        match hash.filter(|h| !h.trim().is_empty()) {
            Some(hash) => datastore.set_string(datastore_keys::TOKEN_HASH, hash),
            None => datastore.remove(datastore_keys::TOKEN_HASH),
        }
    }
}
