//! Core types for storage account management.
//!
//! Provides the request/response models shared by the client and the
//! emulator, configuration, account naming rules and the in-memory
//! account registry the emulator serves from.

pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod registry;

pub use error::AccountError;
pub use registry::AccountRegistry;
