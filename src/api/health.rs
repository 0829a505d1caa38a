//! Liveness endpoint

use axum::http::StatusCode;

/// `GET|HEAD /` answers `204 No Content` while the process is up.
pub async fn liveness() -> StatusCode {
    StatusCode::NO_CONTENT
}
