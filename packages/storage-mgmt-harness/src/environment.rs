//! Service endpoint selection for test runs.
//!
//! A run targets the live endpoint named by `STORAGE_MGMT_ENDPOINT` when it
//! is set, and otherwise a private emulator bound to an ephemeral port.

use std::sync::Once;

use storage_mgmt_api::RunningEmulator;
use storage_mgmt_client::StorageManagementClient;
use storage_mgmt_core::config::{EmulatorConfig, ManagementConfig, ENV_ENDPOINT};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a `RUST_LOG` driven fmt subscriber writing to the test output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The client a test talks through, plus the emulator backing it if any.
pub struct TestEnvironment {
    client: StorageManagementClient,
    emulator: Option<RunningEmulator>,
}

impl TestEnvironment {
    /// Connects to the live endpoint if configured, else spawns an emulator.
    pub async fn start() -> anyhow::Result<Self> {
        init_tracing();
        if std::env::var(ENV_ENDPOINT).is_ok_and(|v| !v.trim().is_empty()) {
            Self::live()
        } else {
            Self::emulated(EmulatorConfig::default()).await
        }
    }

    /// Targets the endpoint described by `STORAGE_MGMT_*` variables.
    pub fn live() -> anyhow::Result<Self> {
        let config = ManagementConfig::from_env()?;
        tracing::info!(endpoint = %config.endpoint, "Using live management endpoint");
        Ok(Self {
            client: StorageManagementClient::new(config)?,
            emulator: None,
        })
    }

    /// Spawns a private emulator and points a client at it.
    ///
    /// The client inherits the emulator's bearer token and subscription pin.
    pub async fn emulated(config: EmulatorConfig) -> anyhow::Result<Self> {
        let subscription_id = config.subscription_id.clone();
        let bearer_token = config.bearer_token.clone();
        let emulator = storage_mgmt_api::spawn(([127, 0, 0, 1], 0).into(), config).await?;
        tracing::debug!(addr = %emulator.addr, "Spawned storage management emulator");

        let mut client_config = ManagementConfig::for_endpoint(emulator.base_uri());
        if let Some(subscription_id) = subscription_id {
            client_config.subscription_id = subscription_id;
        }
        client_config.bearer_token = bearer_token;

        Ok(Self {
            client: StorageManagementClient::new(client_config)?,
            emulator: Some(emulator),
        })
    }

    /// Client bound to the selected endpoint.
    pub fn client(&self) -> &StorageManagementClient {
        &self.client
    }

    /// The backing emulator, when running against one.
    pub fn emulator(&self) -> Option<&RunningEmulator> {
        self.emulator.as_ref()
    }

    /// Whether the environment talks to a live service.
    pub fn is_live(&self) -> bool {
        self.emulator.is_none()
    }
}
