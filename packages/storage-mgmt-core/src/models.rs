//! Request and response models shared by the client and the emulator.
//!
//! Field names are serialized in camelCase.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Display names of the regions a storage account can be placed in.
pub struct GeoRegionNames;

impl GeoRegionNames {
    pub const EASTASIA: &'static str = "East Asia";
    pub const SOUTHEASTASIA: &'static str = "Southeast Asia";
    pub const NORTHEUROPE: &'static str = "North Europe";
    pub const WESTEUROPE: &'static str = "West Europe";
    pub const EASTUS: &'static str = "East US";
    pub const WESTUS: &'static str = "West US";
    pub const NORTHCENTRALUS: &'static str = "North Central US";
    pub const SOUTHCENTRALUS: &'static str = "South Central US";

    /// Every known region.
    pub const ALL: [&'static str; 8] = [
        Self::EASTASIA,
        Self::SOUTHEASTASIA,
        Self::NORTHEUROPE,
        Self::WESTEUROPE,
        Self::EASTUS,
        Self::WESTUS,
        Self::NORTHCENTRALUS,
        Self::SOUTHCENTRALUS,
    ];

    /// Returns the region that geo-replicated data is copied to.
    pub fn paired_region(region: &str) -> Option<&'static str> {
        match region {
            Self::EASTASIA => Some(Self::SOUTHEASTASIA),
            Self::SOUTHEASTASIA => Some(Self::EASTASIA),
            Self::NORTHEUROPE => Some(Self::WESTEUROPE),
            Self::WESTEUROPE => Some(Self::NORTHEUROPE),
            Self::EASTUS => Some(Self::WESTUS),
            Self::WESTUS => Some(Self::EASTUS),
            Self::NORTHCENTRALUS => Some(Self::SOUTHCENTRALUS),
            Self::SOUTHCENTRALUS => Some(Self::NORTHCENTRALUS),
            _ => None,
        }
    }
}

/// Which of the two account access keys an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKeyType {
    Primary,
    Secondary,
}

impl fmt::Display for StorageKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKeyType::Primary => write!(f, "Primary"),
            StorageKeyType::Secondary => write!(f, "Secondary"),
        }
    }
}

/// Provisioning state of a storage account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageAccountStatus {
    Creating,
    Created,
    Deleting,
    Deleted,
    Changing,
    ResolvingDns,
}

/// Mutable and service-assigned properties of a storage account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountProperties {
    /// Human readable label
    pub label: String,
    /// Free form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Region the account lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Affinity group the account belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity_group: Option<String>,
    /// Whether data is replicated to the paired region
    pub geo_replication_enabled: bool,
    /// Provisioning state
    pub status: StorageAccountStatus,
    /// Blob, queue and table endpoints
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Region holding the primary copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_primary_region: Option<String>,
    /// Region holding the replicated copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_secondary_region: Option<String>,
}

/// A storage account as reported by the management service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    /// Account name, unique within the service
    pub name: String,
    /// Management URI of the account
    pub uri: String,
    /// Account properties
    pub properties: StorageAccountProperties,
    /// Caller supplied name/value pairs
    #[serde(default)]
    pub extended_properties: HashMap<String, String>,
}

/// Parameters of a create call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountCreateParameters {
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity_group: Option<String>,
    #[serde(default)]
    pub geo_replication_enabled: bool,
    #[serde(default)]
    pub extended_properties: HashMap<String, String>,
}

impl StorageAccountCreateParameters {
    /// Parameters for an account placed in `location`.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            location: Some(location.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_geo_replication(mut self, enabled: bool) -> Self {
        self.geo_replication_enabled = enabled;
        self
    }

    pub fn with_extended_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.extended_properties.insert(key.into(), value.into());
        self
    }
}

/// Parameters of an update call. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountUpdateParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_replication_enabled: Option<bool>,
    /// Merged into the existing extended properties
    #[serde(default)]
    pub extended_properties: HashMap<String, String>,
}

/// Parameters of a key regeneration call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountRegenerateKeysParameters {
    pub name: String,
    pub key_type: StorageKeyType,
}

/// Access keys of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountKeys {
    pub uri: String,
    pub primary_key: String,
    pub secondary_key: String,
}

/// Result of a name availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameAvailability {
    pub name: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of a list call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountList {
    #[serde(default)]
    pub storage_accounts: Vec<StorageAccount>,
}

/// Status and request id common to every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResponse {
    pub status_code: u16,
    pub request_id: Option<String>,
}

/// Response of a get call.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageAccountGetResponse {
    pub status_code: u16,
    pub request_id: Option<String>,
    pub storage_account: StorageAccount,
}

/// Response of a list call.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageAccountListResponse {
    pub status_code: u16,
    pub request_id: Option<String>,
    pub storage_accounts: Vec<StorageAccount>,
}

/// Response of a get-keys call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccountGetKeysResponse {
    pub status_code: u16,
    pub request_id: Option<String>,
    pub uri: String,
    pub primary_key: String,
    pub secondary_key: String,
}

/// Response of a regenerate-keys call, carrying the keys after regeneration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccountRegenerateKeysResponse {
    pub status_code: u16,
    pub request_id: Option<String>,
    pub uri: String,
    pub primary_key: String,
    pub secondary_key: String,
}

/// Response of a name availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckNameAvailabilityResponse {
    pub status_code: u16,
    pub request_id: Option<String>,
    pub is_available: bool,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paired_regions_are_symmetric() {
        for region in GeoRegionNames::ALL {
            let pair = GeoRegionNames::paired_region(region).unwrap();
            assert_eq!(GeoRegionNames::paired_region(pair), Some(region));
        }
        assert_eq!(GeoRegionNames::paired_region("Mars Central"), None);
    }

    #[test]
    fn test_create_parameters_wire_names() {
        let params = StorageAccountCreateParameters::new("acct", "label", GeoRegionNames::WESTUS)
            .with_geo_replication(true);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["geoReplicationEnabled"], true);
        assert_eq!(json["location"], "West US");
        assert!(json.get("affinityGroup").is_none());
    }

    #[test]
    fn test_update_parameters_accept_sparse_body() {
        let params: StorageAccountUpdateParameters =
            serde_json::from_str(r#"{"label":"new"}"#).unwrap();
        assert_eq!(params.label.as_deref(), Some("new"));
        assert!(params.description.is_none());
        assert!(params.geo_replication_enabled.is_none());
        assert!(params.extended_properties.is_empty());
    }

    #[test]
    fn test_key_type_serializes_as_name() {
        let json = serde_json::to_string(&StorageKeyType::Primary).unwrap();
        assert_eq!(json, "\"Primary\"");
        assert_eq!(StorageKeyType::Secondary.to_string(), "Secondary");
    }
}
