//! In-memory account registry backing the emulator.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use parking_lot::RwLock;
use rand::RngCore;

use crate::error::AccountError;
use crate::models::{
    GeoRegionNames, NameAvailability, StorageAccount, StorageAccountCreateParameters,
    StorageAccountKeys, StorageAccountProperties, StorageAccountStatus,
    StorageAccountUpdateParameters, StorageKeyType,
};
use crate::naming::validate_account_name;

/// Length in bytes of a generated access key before encoding.
pub const KEY_BYTES: usize = 64;

/// Account plus its access keys.
#[derive(Debug, Clone)]
struct AccountRecord {
    account: StorageAccount,
    primary_key: String,
    secondary_key: String,
}

impl AccountRecord {
    fn keys(&self) -> StorageAccountKeys {
        StorageAccountKeys {
            uri: self.account.uri.clone(),
            primary_key: self.primary_key.clone(),
            secondary_key: self.secondary_key.clone(),
        }
    }
}

/// Registry of storage accounts keyed by name.
#[derive(Debug)]
pub struct AccountRegistry {
    /// Map of account name to record
    accounts: RwLock<HashMap<String, AccountRecord>>,
    /// Base URI account URIs are rendered under
    base_uri: String,
}

impl AccountRegistry {
    /// Creates an empty registry rendering account URIs under `base_uri`.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            base_uri: base_uri.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a new account.
    ///
    /// # Arguments
    /// * `subscription_id` - Subscription the account URI is rendered under
    /// * `params` - Create parameters
    ///
    /// # Returns
    /// `Result<StorageAccount, AccountError>` with the created account.
    pub fn create(
        &self,
        subscription_id: &str,
        params: StorageAccountCreateParameters,
    ) -> Result<StorageAccount, AccountError> {
        validate_account_name(&params.name)?;
        if params.label.trim().is_empty() {
            return Err(AccountError::InvalidParameter {
                parameter: "label",
                reason: "must not be empty".to_string(),
            });
        }
        match (&params.location, &params.affinity_group) {
            (Some(location), None) => {
                if !GeoRegionNames::ALL.contains(&location.as_str()) {
                    return Err(AccountError::InvalidParameter {
                        parameter: "location",
                        reason: format!("unknown region '{}'", location),
                    });
                }
            }
            (None, Some(group)) if !group.trim().is_empty() => {}
            _ => return Err(AccountError::PlacementConflict),
        }

        let mut accounts = self.accounts.write();
        if accounts.contains_key(&params.name) {
            return Err(AccountError::AccountAlreadyExists { name: params.name });
        }

        let name = params.name;
        let geo_primary_region = params.location.clone();
        let geo_secondary_region = secondary_region(&params.location, params.geo_replication_enabled);
        let account = StorageAccount {
            uri: format!(
                "{}/{}/services/storageservices/{}",
                self.base_uri, subscription_id, name
            ),
            properties: StorageAccountProperties {
                label: params.label,
                description: params.description,
                location: params.location,
                affinity_group: params.affinity_group,
                geo_replication_enabled: params.geo_replication_enabled,
                status: StorageAccountStatus::Created,
                endpoints: ["blob", "queue", "table"]
                    .iter()
                    .map(|service| format!("https://{}.{}.core.windows.net/", name, service))
                    .collect(),
                geo_primary_region,
                geo_secondary_region,
            },
            extended_properties: params.extended_properties,
            name: name.clone(),
        };

        accounts.insert(
            name.clone(),
            AccountRecord {
                account: account.clone(),
                primary_key: generate_key(),
                secondary_key: generate_key(),
            },
        );
        tracing::debug!(account = %name, "Created storage account");
        Ok(account)
    }

    /// Returns the account named `name`.
    pub fn get(&self, name: &str) -> Result<StorageAccount, AccountError> {
        let accounts = self.accounts.read();
        accounts
            .get(name)
            .map(|record| record.account.clone())
            .ok_or_else(|| not_found(name))
    }

    /// Applies an update and returns the resulting account.
    pub fn update(
        &self,
        name: &str,
        params: StorageAccountUpdateParameters,
    ) -> Result<StorageAccount, AccountError> {
        if let Some(label) = &params.label {
            if label.trim().is_empty() {
                return Err(AccountError::InvalidParameter {
                    parameter: "label",
                    reason: "must not be empty".to_string(),
                });
            }
        }

        let mut accounts = self.accounts.write();
        let record = accounts.get_mut(name).ok_or_else(|| not_found(name))?;
        let properties = &mut record.account.properties;

        if let Some(label) = params.label {
            properties.label = label;
        }
        if let Some(description) = params.description {
            properties.description = Some(description);
        }
        if let Some(enabled) = params.geo_replication_enabled {
            properties.geo_replication_enabled = enabled;
            properties.geo_secondary_region = secondary_region(&properties.location, enabled);
        }
        record
            .account
            .extended_properties
            .extend(params.extended_properties);

        tracing::debug!(account = %name, "Updated storage account");
        Ok(record.account.clone())
    }

    /// Removes the account named `name`.
    pub fn delete(&self, name: &str) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write();
        accounts.remove(name).ok_or_else(|| not_found(name))?;
        tracing::debug!(account = %name, "Deleted storage account");
        Ok(())
    }

    /// Returns every account ordered by name.
    pub fn list(&self) -> Vec<StorageAccount> {
        let accounts = self.accounts.read();
        let mut list: Vec<StorageAccount> =
            accounts.values().map(|record| record.account.clone()).collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Returns the access keys of `name`.
    pub fn keys(&self, name: &str) -> Result<StorageAccountKeys, AccountError> {
        let accounts = self.accounts.read();
        accounts
            .get(name)
            .map(AccountRecord::keys)
            .ok_or_else(|| not_found(name))
    }

    /// Replaces one access key and returns both keys afterwards.
    pub fn regenerate_key(
        &self,
        name: &str,
        key_type: StorageKeyType,
    ) -> Result<StorageAccountKeys, AccountError> {
        let mut accounts = self.accounts.write();
        let record = accounts.get_mut(name).ok_or_else(|| not_found(name))?;
        match key_type {
            StorageKeyType::Primary => record.primary_key = generate_key(),
            StorageKeyType::Secondary => record.secondary_key = generate_key(),
        }
        tracing::debug!(account = %name, key = %key_type, "Regenerated access key");
        Ok(record.keys())
    }

    /// Reports whether `name` could be used for a new account.
    pub fn check_name_availability(&self, name: &str) -> NameAvailability {
        let reason = match validate_account_name(name) {
            Err(e) => Some(e.to_string()),
            Ok(()) if self.accounts.read().contains_key(name) => {
                Some(format!("The storage account named {} is already taken.", name))
            }
            Ok(()) => None,
        };
        NameAvailability {
            name: name.to_string(),
            available: reason.is_none(),
            reason,
        }
    }

    /// Number of accounts held.
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    /// Whether the registry holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

fn not_found(name: &str) -> AccountError {
    AccountError::AccountNotFound {
        name: name.to_string(),
    }
}

fn secondary_region(location: &Option<String>, geo_replication_enabled: bool) -> Option<String> {
    if !geo_replication_enabled {
        return None;
    }
    location
        .as_deref()
        .and_then(GeoRegionNames::paired_region)
        .map(str::to_string)
}

/// Generates a fresh base64 access key.
pub fn generate_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}
