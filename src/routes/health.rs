//! Health check endpoint

use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::routes::auth_routes::{json_response, BoxBody};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health - liveness probe
pub fn health_check() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}
