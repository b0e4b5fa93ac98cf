//! Integration test suite for storage account management.
//!
//! Runs against the endpoint in `STORAGE_MGMT_ENDPOINT` when set, otherwise
//! against a private emulator per test:
//! 1. Storage account operations
//! 2. Teardown and cleanup reporting

mod cleanup_tests;
mod storage_account_operations;
