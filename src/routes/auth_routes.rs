//! HTTP routes for authentication
//!
//! - POST /auth/token - Authenticate credentials and issue a bearer token
//! - POST /auth/users - Create a new account (admin only)
//! - GET  /auth/me    - Resolve the caller's token to their identity

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{self, AuthError, Role};
use crate::routes::admin_users;
use crate::server::AppState;
use crate::store::User;
use crate::types::GatewayError;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Maximum accepted request body size
const MAX_BODY_BYTES: usize = 10240;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

// =============================================================================
// Response Helpers
// =============================================================================

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

pub fn error_response(status: StatusCode, error: &str, code: &str) -> Response<BoxBody> {
    json_response(
        status,
        &ErrorResponse {
            error: error.into(),
            code: Some(code.into()),
        },
    )
}

/// 401 carrying the `WWW-Authenticate: Bearer` challenge the token
/// endpoint contract requires.
pub fn unauthorized_response(error: &str, code: &str) -> Response<BoxBody> {
    let json = serde_json::to_string(&ErrorResponse {
        error: error.into(),
        code: Some(code.into()),
    })
    .unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("Content-Type", "application/json")
        .header("WWW-Authenticate", "Bearer")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

async fn read_body(req: Request<hyper::body::Incoming>) -> Result<Bytes, GatewayError> {
    let body = req
        .collect()
        .await
        .map_err(|e| GatewayError::Http(format!("Failed to read body: {}", e)))?;

    let bytes = body.to_bytes();
    if bytes.len() > MAX_BODY_BYTES {
        return Err(GatewayError::Http("Request body too large".into()));
    }

    Ok(bytes)
}

pub async fn parse_json_body<T: for<'de> Deserialize<'de>>(
    req: Request<hyper::body::Incoming>,
) -> Result<T, GatewayError> {
    let bytes = read_body(req).await?;
    serde_json::from_slice(&bytes).map_err(|e| GatewayError::Http(format!("Invalid JSON: {}", e)))
}

async fn parse_form_body<T: for<'de> Deserialize<'de>>(
    req: Request<hyper::body::Incoming>,
) -> Result<T, GatewayError> {
    let bytes = read_body(req).await?;
    serde_urlencoded::from_bytes(&bytes)
        .map_err(|e| GatewayError::Http(format!("Invalid form body: {}", e)))
}

pub fn get_auth_header(req: &Request<hyper::body::Incoming>) -> Option<String> {
    req.headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

// =============================================================================
// Route Handlers
// =============================================================================

/// POST /auth/token
///
/// Authenticate with form-encoded username/password and receive a bearer
/// token. Failure is a uniform 401 with a `WWW-Authenticate: Bearer`
/// challenge, never distinguishing unknown user from wrong password.
async fn handle_token(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let body: LoginRequest = match parse_form_body(req).await {
        Ok(b) => b,
        Err(e) => {
            return error_response(e.status_code(), &e.to_string(), "BAD_REQUEST");
        }
    };

    match auth::login(state.store.as_ref(), &state.tokens, &body.username, &body.password).await {
        Ok(token) => json_response(
            StatusCode::OK,
            &TokenResponse {
                access_token: token,
                token_type: "bearer".into(),
            },
        ),
        Err(AuthError::InvalidCredentials) => {
            unauthorized_response("Incorrect username or password", "INVALID_CREDENTIALS")
        }
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
            "AUTH_BACKEND_ERROR",
        ),
    }
}

/// GET /auth/me
///
/// Resolve the caller's bearer token to their account.
async fn handle_me(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let header = get_auth_header(&req);
    let token = match auth::extract_bearer(header.as_deref()) {
        Some(t) => t.to_string(),
        None => {
            return unauthorized_response("Could not validate credentials", "UNAUTHENTICATED");
        }
    };

    match auth::resolve(state.store.as_ref(), &state.tokens, &token).await {
        Ok(user) => json_response(StatusCode::OK, &UserResponse::from(&user)),
        Err(AuthError::Unauthenticated) => {
            unauthorized_response("Could not validate credentials", "UNAUTHENTICATED")
        }
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
            "AUTH_BACKEND_ERROR",
        ),
    }
}

// =============================================================================
// Router
// =============================================================================

/// Route an /auth/* request. Returns None for paths outside /auth.
pub async fn handle_auth_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    if !path.starts_with("/auth") {
        return None;
    }

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    // Strip any query string before matching
    let path = path.split('?').next().unwrap_or(&path).to_string();

    let response = match (&method, path.as_str()) {
        (&Method::POST, "/auth/token") => handle_token(req, state).await,
        (&Method::POST, "/auth/users") => admin_users::handle_create_user(req, state).await,
        (&Method::GET, "/auth/me") => handle_me(req, state).await,
        _ => error_response(StatusCode::NOT_FOUND, "Not found", "NOT_FOUND"),
    };

    Some(response)
}
