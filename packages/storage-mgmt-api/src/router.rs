//! Matchit routing configuration.

use std::sync::Arc;

use hyper::header::{HeaderValue, AUTHORIZATION};
use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;
use storage_mgmt_core::config::EmulatorConfig;
use storage_mgmt_core::{AccountError, AccountRegistry};
use uuid::Uuid;

use crate::handlers;

/// Response header carrying the per-call request id.
pub const REQUEST_ID_HEADER: &str = "x-ms-request-id";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Account registry
    pub registry: Arc<AccountRegistry>,
    /// Emulator configuration
    pub config: Arc<EmulatorConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the storage service routes.
    pub fn new(registry: Arc<AccountRegistry>, config: Arc<EmulatorConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert(
                "/{subscription_id}/services/storageservices",
                RouteHandler::Accounts,
            )
            .expect("Failed to insert storageservices route");
        router
            .insert(
                "/{subscription_id}/services/storageservices/{name}",
                RouteHandler::Account,
            )
            .expect("Failed to insert storageservices/{name} route");
        router
            .insert(
                "/{subscription_id}/services/storageservices/{name}/keys",
                RouteHandler::Keys,
            )
            .expect("Failed to insert storageservices/{name}/keys route");
        router
            .insert(
                "/{subscription_id}/services/storageservices/operations/isavailable/{name}",
                RouteHandler::Availability,
            )
            .expect("Failed to insert isavailable route");

        Self {
            inner: router,
            state: AppState { registry, config },
        }
    }

    /// Routes an incoming request and stamps it with a fresh request id.
    ///
    /// Handler errors are rendered as JSON error envelopes, so this always
    /// yields a response.
    pub async fn route(&self, req: Request<hyper::body::Incoming>) -> Response<Bytes> {
        let request_id = Uuid::new_v4().to_string();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let mut response = match self.dispatch(req, &path).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(%method, %path, error = %err, "Request rejected");
                err.into()
            }
        };

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        tracing::info!(
            %method,
            %path,
            status = response.status().as_u16(),
            %request_id,
            "Handled request"
        );
        response
    }

    async fn dispatch(
        &self,
        req: Request<hyper::body::Incoming>,
        path: &str,
    ) -> Result<Response<Bytes>, RouterError> {
        self.authorize(&req)?;

        let matched = self
            .inner
            .at(path)
            .map_err(|_| RouterError::NotFound(format!("No route found for {}", path)))?;

        if let Some(expected) = &self.state.config.subscription_id {
            let subscription = matched.params.get("subscription_id").unwrap_or_default();
            if subscription != expected.as_str() {
                return Err(RouterError::Forbidden(format!(
                    "Subscription '{}' is not served here",
                    subscription
                )));
            }
        }

        matched
            .value
            .handle(req, matched.params, self.state.clone())
            .await
    }

    fn authorize(&self, req: &Request<hyper::body::Incoming>) -> Result<(), RouterError> {
        let Some(token) = &self.state.config.bearer_token else {
            return Ok(());
        };
        let presented = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        match presented {
            Some(presented) if presented == token.as_str() => Ok(()),
            Some(_) => Err(RouterError::Unauthorized("Invalid bearer token".to_string())),
            None => Err(RouterError::Unauthorized(
                "Missing bearer token".to_string(),
            )),
        }
    }
}

/// Route handler function.
enum RouteHandler {
    Accounts,
    Account,
    Keys,
    Availability,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle(
        &self,
        req: Request<hyper::body::Incoming>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        match (self, req.method()) {
            (RouteHandler::Accounts, &Method::POST) => {
                handlers::create_account(req, params, state).await
            }
            (RouteHandler::Accounts, &Method::GET) => {
                handlers::list_accounts(req, params, state).await
            }
            (RouteHandler::Account, &Method::GET) => handlers::get_account(req, params, state).await,
            (RouteHandler::Account, &Method::PUT) => {
                handlers::update_account(req, params, state).await
            }
            (RouteHandler::Account, &Method::DELETE) => {
                handlers::delete_account(req, params, state).await
            }
            (RouteHandler::Keys, &Method::GET) => handlers::get_keys(req, params, state).await,
            (RouteHandler::Keys, &Method::POST) => {
                handlers::regenerate_keys(req, params, state).await
            }
            (RouteHandler::Availability, &Method::GET) => {
                handlers::check_name_availability(req, params, state).await
            }
            _ => Err(RouterError::MethodNotAllowed),
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    /// Registry rejected the operation
    Account(AccountError),
}

impl RouterError {
    /// HTTP status and service error code for this error.
    fn status_and_code(&self) -> (u16, &'static str) {
        match self {
            RouterError::MethodNotAllowed => (405, "MethodNotAllowed"),
            RouterError::InternalError(_) => (500, "InternalError"),
            RouterError::Timeout => (408, "RequestTimeout"),
            RouterError::BadRequest(_) => (400, "BadRequest"),
            RouterError::NotFound(_) => (404, "ResourceNotFound"),
            RouterError::Unauthorized(_) => (401, "AuthenticationFailed"),
            RouterError::Forbidden(_) => (403, "ForbiddenError"),
            RouterError::Account(e) => {
                let status = match e {
                    AccountError::AccountNotFound { .. } => 404,
                    AccountError::AccountAlreadyExists { .. } => 409,
                    _ => 400,
                };
                (status, e.code())
            }
        }
    }
}

impl RouterError {
    /// Account name or parameter the error concerns, if any.
    fn details(&self) -> Option<String> {
        match self {
            RouterError::Account(
                AccountError::AccountNotFound { name }
                | AccountError::AccountAlreadyExists { name }
                | AccountError::InvalidName { name, .. },
            ) => Some(name.clone()),
            RouterError::Account(AccountError::InvalidParameter { parameter, .. }) => {
                Some(parameter.to_string())
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            RouterError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            RouterError::Account(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<AccountError> for RouterError {
    fn from(err: AccountError) -> Self {
        RouterError::Account(err)
    }
}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let (status, code) = err.status_and_code();
        let message = match &err {
            RouterError::MethodNotAllowed => "Method Not Allowed".to_string(),
            RouterError::Timeout => "Request Timeout".to_string(),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg)
            | RouterError::Unauthorized(msg)
            | RouterError::Forbidden(msg) => msg.clone(),
            RouterError::Account(e) => e.to_string(),
        };

        let error_response = handlers::error_response(code, message, err.details());
        let body = serde_json::to_vec(&error_response)
            .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":{{\"code\":\"InternalError\",\"message\":\"Failed to serialize error: {}\"}}}}", e).into_bytes());

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                let mut fallback = Response::new(Bytes::from("Internal Server Error"));
                *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}
