//! HTTP middleware for the broker simulator
//!
//! - `AuthorizedBroker` extractor: broker lookup plus Basic-Auth
//! - JSON normalization of framework error responses
//! - TraceLayer span maker tagging requests with their broker guid

pub mod broker_auth;
pub mod error_response;
pub mod trace;

pub use broker_auth::AuthorizedBroker;
pub use error_response::{normalize_error_response, ConfiguredStatus};
pub use trace::BrokerMakeSpan;
