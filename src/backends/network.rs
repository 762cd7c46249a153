// HTTP transport for tracking and registration requests

use std::time::Duration;

use tokio::sync::OnceCell;

use crate::components::constants::EXTENSION_VERSION;
use crate::components::{
    CampaignError, CampaignResult, HttpMethod, NetworkRequest, NetworkResponse, Networking,
    ServiceFuture,
};

/// Shared client; per-request timeouts are applied on each call
static HTTP_CLIENT: OnceCell<reqwest::Client> = OnceCell::const_new();

async fn http_client() -> CampaignResult<&'static reqwest::Client> {
    HTTP_CLIENT
        .get_or_try_init(|| async {
            reqwest::Client::builder()
                .user_agent(format!("CampaignClassic/{}", EXTENSION_VERSION))
                .build()
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to create HTTP client");
                    CampaignError::ServiceUnavailable {
                        service: "http client".to_string(),
                    }
                })
        })
        .await
}

/// `Networking` implementation backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestNetworkService;

impl ReqwestNetworkService {
    pub fn new() -> Self {
        Self
    }

    pub async fn send(&self, request: NetworkRequest) -> CampaignResult<NetworkResponse> {
        let client = http_client().await?;
        let timeout = request_timeout(&request);

        let mut builder = match request.method {
            HttpMethod::Get => client.get(&request.url),
            HttpMethod::Post => client.post(&request.url),
        }
        .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                CampaignError::TimeoutError {
                    operation: format!("{:?} {}", request.method, request.url),
                    timeout_duration: timeout,
                }
            } else {
                CampaignError::NetworkError {
                    url: request.url.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let message = response.text().await.ok().filter(|text| !text.is_empty());
        tracing::trace!(url = %request.url, status, "Network request completed");

        Ok(NetworkResponse { status, message })
    }
}

impl Networking for ReqwestNetworkService {
    fn connect(&self, request: NetworkRequest) -> ServiceFuture<'_, CampaignResult<NetworkResponse>> {
        Box::pin(self.send(request))
    }
}

/// Combined connect and read budget of a request
pub fn request_timeout(request: &NetworkRequest) -> Duration {
    request.connect_timeout + request.read_timeout
}
