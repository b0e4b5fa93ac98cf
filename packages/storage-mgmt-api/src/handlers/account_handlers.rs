//! Storage account lifecycle handlers.

use hyper::{body::Bytes, Request, Response};
use storage_mgmt_core::models::{
    StorageAccountCreateParameters, StorageAccountList, StorageAccountUpdateParameters,
};

use crate::router::{AppState, RouterError};

use super::request_utils::{build_empty_response, ok_json, path_param, read_json_body, MatchitParams};

/// Creates a storage account.
///
/// # Endpoint
/// `POST /{subscription_id}/services/storageservices`
///
/// # Request Body
/// ```json
/// {
///   "name": "aztstcsas",
///   "label": "create storage account success",
///   "location": "South Central US",
///   "geoReplicationEnabled": false
/// }
/// ```
///
/// # Response
/// - **200 OK**: Returns the created account
///
/// # Errors
/// - **400 Bad Request**: Invalid name, empty label, unknown region or placement conflict
/// - **409 Conflict**: Name already taken
pub async fn create_account(
    req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let subscription_id = path_param(&params, "subscription_id")?;
    let request: StorageAccountCreateParameters =
        read_json_body(req, state.config.request_timeout_ms).await?;

    let account = state.registry.create(&subscription_id, request)?;
    ok_json(account)
}

/// Lists every storage account.
///
/// # Endpoint
/// `GET /{subscription_id}/services/storageservices`
pub async fn list_accounts(
    _req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    ok_json(StorageAccountList {
        storage_accounts: state.registry.list(),
    })
}

/// Reads a storage account.
///
/// # Endpoint
/// `GET /{subscription_id}/services/storageservices/{name}`
///
/// # Errors
/// - **404 Not Found**: Unknown account
pub async fn get_account(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let name = path_param(&params, "name")?;
    ok_json(state.registry.get(&name)?)
}

/// Updates label, description, geo-replication or extended properties.
///
/// # Endpoint
/// `PUT /{subscription_id}/services/storageservices/{name}`
///
/// # Request Body
/// ```json
/// {
///   "label": "testStorageAccountUpdatedLabel3",
///   "description": "updatedStorageAccountsuccess3",
///   "geoReplicationEnabled": false
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: Empty label or malformed body
/// - **404 Not Found**: Unknown account
pub async fn update_account(
    req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let name = path_param(&params, "name")?;
    let request: StorageAccountUpdateParameters =
        read_json_body(req, state.config.request_timeout_ms).await?;

    ok_json(state.registry.update(&name, request)?)
}

/// Deletes a storage account.
///
/// # Endpoint
/// `DELETE /{subscription_id}/services/storageservices/{name}`
///
/// # Response
/// - **200 OK**: Empty body
///
/// # Errors
/// - **404 Not Found**: Unknown account
pub async fn delete_account(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let name = path_param(&params, "name")?;
    state.registry.delete(&name)?;
    build_empty_response(200)
}

/// Reports whether a name can be used for a new account.
///
/// # Endpoint
/// `GET /{subscription_id}/services/storageservices/operations/isavailable/{name}`
///
/// # Response
/// ```json
/// { "name": "aztstcas", "available": true }
/// ```
pub async fn check_name_availability(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let name = path_param(&params, "name")?;
    ok_json(state.registry.check_name_availability(&name))
}
