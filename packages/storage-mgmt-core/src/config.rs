//! Client and emulator configuration.

use std::env;
use std::fmt;

/// Environment variable holding the management endpoint base URI.
pub const ENV_ENDPOINT: &str = "STORAGE_MGMT_ENDPOINT";
/// Environment variable holding the subscription id.
pub const ENV_SUBSCRIPTION_ID: &str = "STORAGE_MGMT_SUBSCRIPTION_ID";
/// Environment variable holding an optional bearer token.
pub const ENV_TOKEN: &str = "STORAGE_MGMT_TOKEN";
/// Environment variable holding the request timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "STORAGE_MGMT_TIMEOUT_MS";
/// Environment variable overriding the `x-ms-version` header value.
pub const ENV_API_VERSION: &str = "STORAGE_MGMT_API_VERSION";

/// Subscription used when none is configured.
pub const DEFAULT_SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";
/// API version sent with every request unless overridden.
pub const DEFAULT_API_VERSION: &str = "2014-06-01";

/// Configuration of the management client.
#[derive(Clone)]
pub struct ManagementConfig {
    /// Base URI of the management service
    pub endpoint: String,
    /// Subscription the accounts live under
    pub subscription_id: String,
    /// Optional bearer token sent as `Authorization`
    pub bearer_token: Option<String>,
    /// Value of the `x-ms-version` header
    pub api_version: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080".to_string(),
            subscription_id: DEFAULT_SUBSCRIPTION_ID.to_string(),
            bearer_token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout_ms: 30000, // 30 seconds default
        }
    }
}

// Keeps the token out of logs.
impl fmt::Debug for ManagementConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementConfig")
            .field("endpoint", &self.endpoint)
            .field("subscription_id", &self.subscription_id)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// Configuration could not be assembled from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("Environment variable {0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("Environment variable {name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ManagementConfig {
    /// Creates a configuration pointing at `endpoint` with default settings.
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Loads the configuration from `STORAGE_MGMT_*` environment variables.
    ///
    /// # Returns
    /// `Result<ManagementConfig, ConfigError>`; the endpoint is required, every
    /// other variable falls back to its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let endpoint = non_empty(ENV_ENDPOINT).ok_or(ConfigError::Missing(ENV_ENDPOINT))?;

        let request_timeout_ms = match non_empty(ENV_TIMEOUT_MS) {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                name: ENV_TIMEOUT_MS,
                value: raw.clone(),
                reason: format!("{}", e),
            })?,
            None => defaults.request_timeout_ms,
        };

        Ok(Self {
            endpoint,
            subscription_id: non_empty(ENV_SUBSCRIPTION_ID).unwrap_or(defaults.subscription_id),
            bearer_token: non_empty(ENV_TOKEN),
            api_version: non_empty(ENV_API_VERSION).unwrap_or(defaults.api_version),
            request_timeout_ms,
        })
    }
}

/// Emulator configuration.
#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    /// Subscription accepted by the emulator (any when unset)
    pub subscription_id: Option<String>,
    /// Bearer token required on every request (none when unset)
    pub bearer_token: Option<String>,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Base URI used when rendering account URIs
    pub public_base_uri: String,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            subscription_id: None,
            bearer_token: None,
            request_timeout_ms: 5000, // 5 seconds default
            public_base_uri: "http://127.0.0.1:8080".to_string(),
        }
    }
}
