//! Liveness endpoint.
//!
//! Answers as long as the process is serving requests; it does not check
//! that Discord is reachable.

use axum::http::StatusCode;

/// `GET /health` → `200 OK` with body `OK`.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
