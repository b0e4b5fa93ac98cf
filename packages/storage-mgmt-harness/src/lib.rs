//! Test fixtures for storage account management.
//!
//! A [`StorageAccountFixture`] owns the environment a test talks to and one
//! baseline account; tearing it down deletes every account carrying the
//! test prefix and reports what could not be removed.

pub mod cleanup;
pub mod environment;
pub mod fixture;

pub use cleanup::{delete_accounts_with_prefix, CleanupFailure, CleanupReport};
pub use environment::{init_tracing, TestEnvironment};
pub use fixture::{test_account_name, StorageAccountFixture, TEST_ACCOUNT_PREFIX};
