//! Admin API endpoint for user provisioning
//!
//! `POST /auth/users` requires a bearer token resolving to an admin
//! account. The response carries the created user's public fields only,
//! never the password hash.

use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::warn;

use crate::auth::{self, NewUserSpec, ProvisionError};
use crate::routes::auth_routes::{
    error_response, get_auth_header, json_response, parse_json_body, unauthorized_response,
    BoxBody, UserResponse,
};
use crate::server::AppState;

/// POST /auth/users
///
/// Flow:
/// 1. Resolve the bearer token to a live identity
/// 2. Parse the new-user body
/// 3. Delegate to provisioning (admin gate, role validation, uniqueness
///    checks, hash, insert - in that order)
pub async fn handle_create_user(
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

    let requester = match auth::resolve(state.store.as_ref(), &state.tokens, &token).await {
        Ok(user) => user,
        Err(auth::AuthError::Unauthenticated) => {
            return unauthorized_response("Could not validate credentials", "UNAUTHENTICATED");
        }
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                "AUTH_BACKEND_ERROR",
            );
        }
    };

    let spec: NewUserSpec = match parse_json_body(req).await {
        Ok(s) => s,
        Err(e) => {
            return error_response(e.status_code(), &e.to_string(), "BAD_REQUEST");
        }
    };

    match auth::create_user(state.store.as_ref(), &requester, &spec).await {
        Ok(user) => json_response(StatusCode::OK, &UserResponse::from(&user)),
        Err(err) => {
            warn!("User provisioning failed for '{}': {}", spec.username, err);
            let (status, code) = match &err {
                ProvisionError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                ProvisionError::InvalidRole => (StatusCode::BAD_REQUEST, "INVALID_ROLE"),
                ProvisionError::DuplicateUsername => (StatusCode::BAD_REQUEST, "DUPLICATE_USERNAME"),
                ProvisionError::DuplicateEmail => (StatusCode::BAD_REQUEST, "DUPLICATE_EMAIL"),
                ProvisionError::PersistenceFailure(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILURE")
                }
            };
            error_response(status, &err.to_string(), code)
        }
    }
}
