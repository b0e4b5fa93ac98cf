//! Client for the storage account management API.
//!
//! ```no_run
//! use storage_mgmt_client::StorageManagementClient;
//! use storage_mgmt_core::models::{GeoRegionNames, StorageAccountCreateParameters};
//!
//! # async fn run() -> storage_mgmt_client::ManagementResult<()> {
//! let client = StorageManagementClient::from_env()?;
//! let params = StorageAccountCreateParameters::new(
//!     "myaccount",
//!     "my label",
//!     GeoRegionNames::SOUTHCENTRALUS,
//! );
//! let response = client.storage_accounts().create(&params).await?;
//! assert_eq!(response.status_code, 200);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod operations;

pub use client::StorageManagementClient;
pub use error::{ErrorKind, ManagementError, ManagementResult};
pub use operations::StorageAccountOperations;
