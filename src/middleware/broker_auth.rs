//! Broker resolution and HTTP Basic-Auth for the broker-protocol surface
//!
//! Provides the `AuthorizedBroker` extractor: it resolves the `{guid}` path
//! segment to a stored broker configuration and checks the request's Basic
//! credentials against it. Unknown guids are rejected before credentials are
//! looked at.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};
use std::collections::HashMap;

use crate::domain::BrokerConfiguration;
use crate::error::AppError;
use crate::server::AppState;

/// A broker whose guid resolved and whose credentials matched.
#[derive(Debug, Clone)]
pub struct AuthorizedBroker {
    pub guid: String,
    pub config: BrokerConfiguration,
}

impl FromRequestParts<AppState> for AuthorizedBroker {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let guid = params
            .get("guid")
            .cloned()
            .ok_or_else(|| AppError::BadRequest("missing broker guid".to_string()))?;

        let config = state
            .brokers
            .retrieve_broker(&guid)
            .ok_or_else(|| AppError::NotFound(format!("broker not found: {guid}")))?;

        let Some(Authorization(basic)) = parts.headers.typed_get::<Authorization<Basic>>() else {
            return Err(AppError::Unauthorized(
                "missing basic auth credentials".to_string(),
            ));
        };

        if !credentials_match(&config, basic.username(), basic.password()) {
            tracing::debug!(broker_guid = %guid, "basic auth mismatch");
            return Err(AppError::Unauthorized("invalid credentials".to_string()));
        }

        Ok(Self { guid, config })
    }
}

/// Both fields are always compared, so timing does not reveal which one was
/// wrong.
fn credentials_match(config: &BrokerConfiguration, username: &str, password: &str) -> bool {
    let user_ok = constant_time_eq(config.username.as_bytes(), username.as_bytes());
    let pass_ok = constant_time_eq(config.password.as_bytes(), password.as_bytes());
    user_ok & pass_ok
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
