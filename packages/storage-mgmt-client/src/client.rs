//! Storage management HTTP client (reqwest-based).
//!
//! Provides a `StorageManagementClient` that talks to the management
//! service and hands out [`StorageAccountOperations`] for the account
//! routes.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use storage_mgmt_core::config::ManagementConfig;
use tracing::{debug, warn};

use crate::error::{ManagementError, ManagementResult};
use crate::operations::StorageAccountOperations;

/// Header carrying the per-call request id.
pub const REQUEST_ID_HEADER: &str = "x-ms-request-id";
/// Header carrying the API version.
pub const VERSION_HEADER: &str = "x-ms-version";

/// Success envelope returned by the service.
#[derive(Debug, Deserialize)]
struct SuccessEnvelope<T> {
    data: T,
}

/// Error envelope returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Status, request id and body of a successful call.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status_code: u16,
    pub request_id: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Decodes the `data` member of the success envelope.
    pub(crate) fn data<T: DeserializeOwned>(&self) -> ManagementResult<T> {
        let envelope: SuccessEnvelope<T> = serde_json::from_slice(&self.body)?;
        Ok(envelope.data)
    }
}

/// Client for the storage account management service.
///
/// Wraps `reqwest::Client` with the service's versioning and
/// authentication headers and error mapping.
#[derive(Debug, Clone)]
pub struct StorageManagementClient {
    /// Endpoint the service routes hang off
    base_url: Url,
    /// Subscription the accounts live under
    subscription_id: String,
    /// Underlying HTTP client
    http_client: Client,
}

impl StorageManagementClient {
    /// Create a new client from configuration.
    pub fn new(config: ManagementConfig) -> ManagementResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .default_headers(default_headers(&config)?)
            .user_agent(concat!("storage-mgmt-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ManagementError::Config(format!("Failed to build HTTP client: {e}")))?;
        Self::with_http_client(config, http_client)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller's client is used as is: no default headers or timeout are
    /// added.
    pub fn with_http_client(config: ManagementConfig, http_client: Client) -> ManagementResult<Self> {
        let base_url = parse_endpoint(&config.endpoint)?;
        if config.subscription_id.trim().is_empty() {
            return Err(ManagementError::Config(
                "subscription id must not be empty".to_string(),
            ));
        }
        Ok(Self {
            base_url,
            subscription_id: config.subscription_id,
            http_client,
        })
    }

    /// Create a client from `STORAGE_MGMT_*` environment variables.
    pub fn from_env() -> ManagementResult<Self> {
        Self::new(ManagementConfig::from_env()?)
    }

    /// Operations on storage accounts.
    pub fn storage_accounts(&self) -> StorageAccountOperations<'_> {
        StorageAccountOperations::new(self)
    }

    /// Endpoint the client targets.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Subscription the client targets.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http_client
    }

    /// Builds `{endpoint}/{subscription}/services/storageservices/{segments...}`.
    pub(crate) fn storage_services_url(&self, segments: &[&str]) -> ManagementResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| ManagementError::Uri {
                uri: self.base_url.to_string(),
                reason: "endpoint cannot be a base URI".to_string(),
            })?;
            path.pop_if_empty()
                .push(&self.subscription_id)
                .push("services")
                .push("storageservices");
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Sends a request and returns the raw response of a successful call.
    ///
    /// Non-success statuses become [`ManagementError::Service`].
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> ManagementResult<RawResponse> {
        let response = builder.send().await?;
        let status = response.status();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            debug!(status = status.as_u16(), request_id = ?request_id, "Management call succeeded");
            return Ok(RawResponse {
                status_code: status.as_u16(),
                request_id,
                body,
            });
        }

        let (code, message) = match serde_json::from_slice::<ErrorEnvelope>(&body) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => (
                status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .replace(' ', ""),
                String::from_utf8_lossy(&body).into_owned(),
            ),
        };
        warn!(status = status.as_u16(), %code, request_id = ?request_id, "Management call failed");
        Err(ManagementError::Service {
            status: status.as_u16(),
            code,
            message,
            request_id,
        })
    }
}

fn parse_endpoint(endpoint: &str) -> ManagementResult<Url> {
    let url = Url::parse(endpoint).map_err(|e| ManagementError::Uri {
        uri: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ManagementError::Uri {
            uri: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn default_headers(config: &ManagementConfig) -> ManagementResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let version = HeaderValue::from_str(&config.api_version)
        .map_err(|e| ManagementError::Config(format!("Invalid API version header: {e}")))?;
    headers.insert(VERSION_HEADER, version);

    if let Some(token) = &config.bearer_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ManagementError::Config(format!("Invalid bearer token: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
