//! Custom TraceLayer span maker for broker-protocol requests.
//!
//! Every request under `/broker/{guid}/...` gets the broker guid recorded on
//! its span so the log lines of concurrent simulated brokers can be told
//! apart.

use axum::http::Request;
use tower_http::trace::MakeSpan;
use tracing::Span;

const BROKER_PREFIX: &str = "/broker/";

/// A `MakeSpan` implementation that records method, path and broker guid.
#[derive(Clone, Debug)]
pub struct BrokerMakeSpan;

impl<B> MakeSpan<B> for BrokerMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let path = request.uri().path();

        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %path,
            broker_guid = broker_guid(path).unwrap_or("-"),
            version = ?request.version(),
        )
    }
}

/// Extract the broker guid from a broker-protocol path.
///
/// Example: `/broker/abc/v2/catalog` yields `abc`.
fn broker_guid(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(BROKER_PREFIX)?;
    let guid = rest.split('/').next()?;
    if guid.is_empty() {
        None
    } else {
        Some(guid)
    }
}
