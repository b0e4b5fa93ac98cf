//! HTTP endpoint implementations for storage accounts and their keys.

mod account_handlers;
mod key_handlers;
pub mod request_utils;
pub mod response;

pub use account_handlers::{
    check_name_availability, create_account, delete_account, get_account, list_accounts,
    update_account,
};
pub use key_handlers::{get_keys, regenerate_keys};
pub use response::{error_response, success_response, ApiError, ApiResponse, ErrorResponse};
