// Seams to the host platform
// The host owns event dispatch, persistence, device info, HTTP and the notification tray

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::builder::NotificationSpec;
use super::event::{Event, EventData};
use super::CampaignResult;

/// Boxed future returned by asynchronous host services
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRequest {
    pub url: String,
    pub method: HttpMethod,
    pub body: Option<Vec<u8>>,
    pub headers: HashMap<String, String>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl NetworkRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            body: None,
            headers: HashMap::new(),
            connect_timeout: timeout,
            read_timeout: timeout,
        }
    }

    pub fn post(url: impl Into<String>, body: Vec<u8>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            body: Some(body),
            headers: HashMap::new(),
            connect_timeout: timeout,
            read_timeout: timeout,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body_as_str(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkResponse {
    pub status: u16,
    pub message: Option<String>,
}

impl NetworkResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// HTTP transport provided by the host
pub trait Networking: Send + Sync {
    fn connect(&self, request: NetworkRequest) -> ServiceFuture<'_, CampaignResult<NetworkResponse>>;
}

/// String key/value collection persisted by the host
pub trait NamedCollection: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Device facts sent with a registration request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub device_unique_id: Option<String>,
    /// Device name as reported by the OS
    pub device: Option<String>,
    /// Marketing model name
    pub device_name: Option<String>,
    pub device_brand: Option<String>,
    pub device_manufacturer: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    /// Locale such as `en_US`
    pub active_locale: Option<String>,
}

pub trait DeviceInforming: Send + Sync {
    fn device_info(&self) -> DeviceInfo;
}

impl DeviceInforming for DeviceInfo {
    fn device_info(&self) -> DeviceInfo {
        self.clone()
    }
}

/// Image downloaded to local storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchedImage {
    pub url: String,
    pub path: PathBuf,
}

/// Fetches remote images for notification layouts
pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> ServiceFuture<'a, CampaignResult<FetchedImage>>;
}

/// Dispatches events onto the host event bus
pub trait EventDispatcher: Send + Sync {
    fn dispatch(&self, event: Event);
}

/// Extension-side view of the host event hub
pub trait ExtensionApi: Send + Sync {
    /// Latest shared state published by `extension_name` as of `event`
    fn shared_state(&self, extension_name: &str, event: &Event) -> Option<EventData>;
}

/// Shows and removes notifications in the platform tray
pub trait NotificationPresenter: Send + Sync {
    fn notify(&self, spec: &NotificationSpec) -> CampaignResult<()>;
    fn cancel(&self, tag: &str);
    fn cancel_all(&self);
}
