//! Access key handlers.

use hyper::{body::Bytes, Request, Response};
use storage_mgmt_core::models::StorageAccountRegenerateKeysParameters;

use crate::router::{AppState, RouterError};

use super::request_utils::{ok_json, path_param, query_param, read_json_body, MatchitParams};

/// Returns both access keys of an account.
///
/// # Endpoint
/// `GET /{subscription_id}/services/storageservices/{name}/keys`
///
/// # Errors
/// - **404 Not Found**: Unknown account
pub async fn get_keys(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let name = path_param(&params, "name")?;
    ok_json(state.registry.keys(&name)?)
}

/// Regenerates one access key and returns both keys afterwards.
///
/// # Endpoint
/// `POST /{subscription_id}/services/storageservices/{name}/keys?action=regenerate`
///
/// # Request Body
/// ```json
/// { "name": "aztstabc", "keyType": "Primary" }
/// ```
///
/// # Errors
/// - **400 Bad Request**: Missing `action=regenerate`, malformed body or name mismatch
/// - **404 Not Found**: Unknown account
pub async fn regenerate_keys(
    req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let name = path_param(&params, "name")?;
    match query_param(req.uri().query(), "action").as_deref() {
        Some("regenerate") => {}
        other => {
            return Err(RouterError::BadRequest(format!(
                "Unsupported key action {:?}",
                other.unwrap_or("")
            )))
        }
    }

    let request: StorageAccountRegenerateKeysParameters =
        read_json_body(req, state.config.request_timeout_ms).await?;
    if !request.name.is_empty() && request.name != name {
        return Err(RouterError::BadRequest(format!(
            "Body names account '{}' but path names '{}'",
            request.name, name
        )));
    }

    ok_json(state.registry.regenerate_key(&name, request.key_type)?)
}
