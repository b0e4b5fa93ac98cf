//! Per-test storage account fixture.

use anyhow::ensure;
use storage_mgmt_client::{StorageAccountOperations, StorageManagementClient};
use storage_mgmt_core::models::{GeoRegionNames, StorageAccountCreateParameters};
use storage_mgmt_core::naming::random_account_name;

use crate::cleanup::{delete_accounts_with_prefix, CleanupReport};
use crate::environment::TestEnvironment;

/// Prefix shared by every account a test creates. Lowercase only.
pub const TEST_ACCOUNT_PREFIX: &str = "aztst";
/// Length of the random part of a fixture account name.
pub const RANDOM_SUFFIX_LEN: usize = 10;
/// Label of the account created by [`StorageAccountFixture::set_up`].
pub const BASELINE_LABEL: &str = "Description1";
/// Region of the account created by [`StorageAccountFixture::set_up`].
pub const BASELINE_LOCATION: &str = GeoRegionNames::SOUTHCENTRALUS;

/// Returns `TEST_ACCOUNT_PREFIX` followed by `suffix`.
pub fn test_account_name(suffix: &str) -> String {
    format!("{}{}", TEST_ACCOUNT_PREFIX, suffix)
}

/// A test environment plus one freshly created baseline account.
pub struct StorageAccountFixture {
    environment: TestEnvironment,
    account_name: String,
}

impl StorageAccountFixture {
    /// Selects the environment and creates the baseline account.
    ///
    /// Fails unless the create answers 200 with a request id.
    pub async fn set_up() -> anyhow::Result<Self> {
        let environment = TestEnvironment::start().await?;
        Self::set_up_in(environment).await
    }

    /// Creates the baseline account inside an existing environment.
    pub async fn set_up_in(environment: TestEnvironment) -> anyhow::Result<Self> {
        let account_name = random_account_name(TEST_ACCOUNT_PREFIX, RANDOM_SUFFIX_LEN);

        let parameters =
            StorageAccountCreateParameters::new(&account_name, BASELINE_LABEL, BASELINE_LOCATION)
                .with_geo_replication(false);
        let response = environment
            .client()
            .storage_accounts()
            .create(&parameters)
            .await?;

        ensure!(
            response.status_code == 200,
            "baseline create of {} returned {}",
            account_name,
            response.status_code
        );
        ensure!(
            response.request_id.as_deref().is_some_and(|id| !id.is_empty()),
            "baseline create of {} returned no request id",
            account_name
        );
        tracing::debug!(account = %account_name, "Fixture set up");

        Ok(Self {
            environment,
            account_name,
        })
    }

    /// Name of the baseline account.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn client(&self) -> &StorageManagementClient {
        self.environment.client()
    }

    pub fn accounts(&self) -> StorageAccountOperations<'_> {
        self.environment.client().storage_accounts()
    }

    pub fn environment(&self) -> &TestEnvironment {
        &self.environment
    }

    /// Deletes every account carrying the test prefix.
    ///
    /// Never fails; whatever could not be removed is listed in the report.
    pub async fn tear_down(self) -> CleanupReport {
        let report = delete_accounts_with_prefix(self.environment.client(), TEST_ACCOUNT_PREFIX).await;
        if !report.is_clean() {
            tracing::warn!(%report, "Fixture teardown left accounts behind");
        }
        report
    }
}
