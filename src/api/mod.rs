//! REST API shared utilities: body decoding, configured status overrides
//! and asynchronous operation responses

pub mod broker;
pub mod config;
pub mod health;

use crate::domain::{BrokerConfiguration, JsonObject};
use crate::error::{AppError, Result};
use crate::middleware::ConfiguredStatus;
use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Decode a JSON request body.
///
/// Bodies are decoded by hand rather than through `Json<T>` so that clients
/// which omit `Content-Type` are still served, and so that decode failures
/// surface as `AppError::BadRequest`.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("invalid JSON: {e}")))
}

/// Reply with a status the broker configuration asked for, if any.
///
/// `0` means the endpoint behaves normally and yields `None`. Any other code
/// produces a response with that status and an empty body.
pub(crate) fn configured_status(code: u16) -> Option<Result<Response>> {
    if code == 0 {
        return None;
    }

    Some(
        StatusCode::from_u16(code)
            .map(|status| {
                let mut response = status.into_response();
                response.extensions_mut().insert(ConfiguredStatus);
                response
            })
            .map_err(|_| {
                AppError::Internal(anyhow::anyhow!("configured status code {code} is not valid"))
            }),
    )
}

/// Query parameters understood by the mutating broker endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AsyncQuery {
    pub accepts_incomplete: Option<String>,
}

/// Answer `202 Accepted` with an `operation` token naming the moment the
/// operation will be reported as finished.
pub(crate) fn accepted(
    config: &BrokerConfiguration,
    query: &AsyncQuery,
    mut body: JsonObject,
) -> Result<Response> {
    let accepts_incomplete = query.accepts_incomplete.as_deref().unwrap_or_default();
    if accepts_incomplete != "true" {
        return Err(server_error(format!(
            "want to respond async, but got `accepts_incomplete` = `{accepts_incomplete}`"
        )));
    }

    let delay_ms = config.async_response_delay_ms;
    let completes_at = i64::try_from(delay_ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .and_then(|delay| Utc::now().checked_add_signed(delay))
        .ok_or_else(|| server_error(format!("async response delay {delay_ms}ms is out of range")))?;
    body.insert(
        "operation".to_string(),
        completes_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .into(),
    );

    Ok((StatusCode::ACCEPTED, Json(body)).into_response())
}

/// Query parameters of the last-operation endpoints.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LastOperationQuery {
    pub operation: Option<String>,
}

impl LastOperationQuery {
    /// Parse the operation token handed out by [`accepted`].
    pub(crate) fn completion_time(&self) -> Result<DateTime<Utc>> {
        let token = self
            .operation
            .as_deref()
            .ok_or_else(|| server_error("missing operation token".to_string()))?;

        DateTime::parse_from_rfc3339(token)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| server_error(format!("invalid operation token '{token}': {e}")))
    }
}

/// A generic server error whose message still reaches the client verbatim.
fn server_error(message: String) -> AppError {
    AppError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn async_config() -> BrokerConfiguration {
        BrokerConfiguration {
            async_response_delay_ms: 1_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_json_reports_bad_request() {
        let err = decode_json::<JsonObject>(&Bytes::from_static(b"{not json")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("invalid JSON")));
    }

    #[test]
    fn test_configured_status_zero_is_normal() {
        assert!(configured_status(0).is_none());
    }

    #[test]
    fn test_configured_status_sets_code() {
        let response = configured_status(418).unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert!(response.extensions().get::<ConfiguredStatus>().is_some());
    }

    #[test]
    fn test_configured_status_rejects_invalid_code() {
        let err = configured_status(42).unwrap().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_accepted_requires_accepts_incomplete() {
        let query = AsyncQuery {
            accepts_incomplete: Some("false".to_string()),
        };
        let err = accepted(&async_config(), &query, JsonObject::new()).unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "want to respond async, but got `accepts_incomplete` = `false`"
        );
    }

    #[tokio::test]
    async fn test_longest_delay_yields_parseable_token() {
        let config = BrokerConfiguration {
            async_response_delay_ms: 604_800_000,
            ..Default::default()
        };
        let query = AsyncQuery {
            accepts_incomplete: Some("true".to_string()),
        };
        let response = accepted(&config, &query, JsonObject::new()).unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: JsonObject = serde_json::from_slice(&body).unwrap();

        let token = LastOperationQuery {
            operation: body["operation"].as_str().map(str::to_string),
        };
        assert!(token.completion_time().unwrap() > Utc::now());
    }

    #[test]
    fn test_accepted_status() {
        let query = AsyncQuery {
            accepts_incomplete: Some("true".to_string()),
        };
        let response = accepted(&async_config(), &query, JsonObject::new()).unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_completion_time_parses_token() {
        let query = LastOperationQuery {
            operation: Some("2030-01-02T03:04:05.678Z".to_string()),
        };
        let when = query.completion_time().unwrap();
        assert_eq!(when.to_rfc3339_opts(SecondsFormat::Millis, true), "2030-01-02T03:04:05.678Z");
    }

    #[test]
    fn test_completion_time_rejects_bad_token() {
        let missing = LastOperationQuery { operation: None };
        let err = missing.completion_time().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "missing operation token");

        let garbage = LastOperationQuery {
            operation: Some("yesterday".to_string()),
        };
        let err = garbage.completion_time().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("invalid operation token 'yesterday'"));
    }
}
