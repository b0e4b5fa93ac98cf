//! Account registry error types.

use thiserror::Error;

/// Errors raised by the account registry when it rejects an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Account not found
    #[error("Storage account '{name}' not found")]
    AccountNotFound { name: String },

    /// Account name already taken
    #[error("Storage account '{name}' already exists")]
    AccountAlreadyExists { name: String },

    /// Name violates the account naming rules
    #[error("Invalid storage account name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A required parameter is missing or malformed
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    /// Location and affinity group are mutually exclusive
    #[error("Exactly one of location or affinity group must be specified")]
    PlacementConflict,
}

impl AccountError {
    /// Short machine-readable code reported in error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::AccountNotFound { .. } => "ResourceNotFound",
            AccountError::AccountAlreadyExists { .. } => "ConflictError",
            AccountError::InvalidName { .. } => "BadRequest",
            AccountError::InvalidParameter { .. } => "MissingOrIncorrectParameter",
            AccountError::PlacementConflict => "BadRequest",
        }
    }
}
