//! Storage account operations.

use storage_mgmt_core::models::{
    CheckNameAvailabilityResponse, NameAvailability, OperationResponse, StorageAccount,
    StorageAccountCreateParameters, StorageAccountGetKeysResponse, StorageAccountGetResponse,
    StorageAccountKeys, StorageAccountList, StorageAccountListResponse,
    StorageAccountRegenerateKeysParameters, StorageAccountRegenerateKeysResponse,
    StorageAccountUpdateParameters,
};
use tracing::debug;

use crate::client::{RawResponse, StorageManagementClient};
use crate::error::ManagementResult;

/// Operations on the storage accounts of one subscription.
#[derive(Debug, Clone, Copy)]
pub struct StorageAccountOperations<'a> {
    client: &'a StorageManagementClient,
}

impl<'a> StorageAccountOperations<'a> {
    pub(crate) fn new(client: &'a StorageManagementClient) -> Self {
        Self { client }
    }

    /// Creates a storage account.
    pub async fn create(
        &self,
        parameters: &StorageAccountCreateParameters,
    ) -> ManagementResult<OperationResponse> {
        debug!(account = %parameters.name, "Creating storage account");
        let url = self.client.storage_services_url(&[])?;
        let raw = self
            .client
            .execute(self.client.http().post(url).json(parameters))
            .await?;
        Ok(operation_response(&raw))
    }

    /// Fetches a storage account by name.
    pub async fn get(&self, name: &str) -> ManagementResult<StorageAccountGetResponse> {
        debug!(account = %name, "Getting storage account");
        let url = self.client.storage_services_url(&[name])?;
        let raw = self.client.execute(self.client.http().get(url)).await?;
        let storage_account: StorageAccount = raw.data()?;
        Ok(StorageAccountGetResponse {
            status_code: raw.status_code,
            request_id: raw.request_id,
            storage_account,
        })
    }

    /// Updates label, description, geo-replication or extended properties.
    pub async fn update(
        &self,
        name: &str,
        parameters: &StorageAccountUpdateParameters,
    ) -> ManagementResult<OperationResponse> {
        debug!(account = %name, "Updating storage account");
        let url = self.client.storage_services_url(&[name])?;
        let raw = self
            .client
            .execute(self.client.http().put(url).json(parameters))
            .await?;
        Ok(operation_response(&raw))
    }

    /// Deletes a storage account.
    pub async fn delete(&self, name: &str) -> ManagementResult<OperationResponse> {
        debug!(account = %name, "Deleting storage account");
        let url = self.client.storage_services_url(&[name])?;
        let raw = self.client.execute(self.client.http().delete(url)).await?;
        Ok(operation_response(&raw))
    }

    /// Lists every storage account in the subscription.
    pub async fn list(&self) -> ManagementResult<StorageAccountListResponse> {
        debug!("Listing storage accounts");
        let url = self.client.storage_services_url(&[])?;
        let raw = self.client.execute(self.client.http().get(url)).await?;
        let list: StorageAccountList = raw.data()?;
        Ok(StorageAccountListResponse {
            status_code: raw.status_code,
            request_id: raw.request_id,
            storage_accounts: list.storage_accounts,
        })
    }

    /// Fetches the primary and secondary access keys.
    pub async fn get_keys(&self, name: &str) -> ManagementResult<StorageAccountGetKeysResponse> {
        debug!(account = %name, "Getting storage account keys");
        let url = self.client.storage_services_url(&[name, "keys"])?;
        let raw = self.client.execute(self.client.http().get(url)).await?;
        let keys: StorageAccountKeys = raw.data()?;
        Ok(StorageAccountGetKeysResponse {
            status_code: raw.status_code,
            request_id: raw.request_id,
            uri: keys.uri,
            primary_key: keys.primary_key,
            secondary_key: keys.secondary_key,
        })
    }

    /// Regenerates one access key and returns both keys afterwards.
    pub async fn regenerate_keys(
        &self,
        parameters: &StorageAccountRegenerateKeysParameters,
    ) -> ManagementResult<StorageAccountRegenerateKeysResponse> {
        debug!(account = %parameters.name, key = %parameters.key_type, "Regenerating storage account key");
        let mut url = self
            .client
            .storage_services_url(&[parameters.name.as_str(), "keys"])?;
        url.query_pairs_mut().append_pair("action", "regenerate");
        let raw = self
            .client
            .execute(self.client.http().post(url).json(parameters))
            .await?;
        let keys: StorageAccountKeys = raw.data()?;
        Ok(StorageAccountRegenerateKeysResponse {
            status_code: raw.status_code,
            request_id: raw.request_id,
            uri: keys.uri,
            primary_key: keys.primary_key,
            secondary_key: keys.secondary_key,
        })
    }

    /// Reports whether `name` can be used for a new account.
    pub async fn check_name_availability(
        &self,
        name: &str,
    ) -> ManagementResult<CheckNameAvailabilityResponse> {
        debug!(account = %name, "Checking storage account name availability");
        let url = self
            .client
            .storage_services_url(&["operations", "isavailable", name])?;
        let raw = self.client.execute(self.client.http().get(url)).await?;
        let availability: NameAvailability = raw.data()?;
        Ok(CheckNameAvailabilityResponse {
            status_code: raw.status_code,
            request_id: raw.request_id,
            is_available: availability.available,
            reason: availability.reason,
        })
    }
}

fn operation_response(raw: &RawResponse) -> OperationResponse {
    OperationResponse {
        status_code: raw.status_code,
        request_id: raw.request_id.clone(),
    }
}
