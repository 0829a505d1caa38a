//! Common test utilities
//!
//! - Router construction over a fresh in-memory broker store
//! - Request helpers that drive the production router with `oneshot`
//! - Broker configuration fixtures
//! - `LogCapture`, a `MakeWriter` buffering newline-delimited JSON log records

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{Method, Request, StatusCode},
    Router,
};
use axum_extra::headers::{Authorization, HeaderMapExt};
use multibroker::domain::{BrokerConfiguration, NewBrokerResponse, Plan, ServiceOffering};
use multibroker::server::{build_router, AppState};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

pub const USERNAME: &str = "broker-user";
pub const PASSWORD: &str = "broker-pass";

// ============================================================================
// Router
// ============================================================================

/// A router over an empty store, plus the state so tests can inspect it.
pub fn create_test_app() -> (Router, AppState) {
    let state = AppState::new();
    (build_router(state.clone()), state)
}

// ============================================================================
// Fixtures
// ============================================================================

/// A configuration with one offering (`svc1`) and one plan (`plan1`).
pub fn broker_configuration() -> BrokerConfiguration {
    BrokerConfiguration {
        username: USERNAME.to_string(),
        password: PASSWORD.to_string(),
        services: vec![ServiceOffering {
            name: "hydra-db".to_string(),
            id: "svc1".to_string(),
            description: "A simulated database".to_string(),
            bindable: true,
            instances_retrievable: true,
            plans: vec![Plan {
                name: "small".to_string(),
                id: "plan1".to_string(),
                description: "A small plan".to_string(),
                free: true,
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Register a broker through the admin API and return its guid.
pub async fn register_broker(app: &Router, config: &BrokerConfiguration) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/config",
        None,
        Some(serde_json::to_value(config).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "broker registration failed");
    let created: NewBrokerResponse = serde_json::from_slice(&body).unwrap();
    created.guid
}

pub fn provision_body() -> Value {
    serde_json::json!({
        "service_id": "svc1",
        "plan_id": "plan1",
        "parameters": { "size": "xl" }
    })
}

// ============================================================================
// Request helpers
// ============================================================================

/// Send a request and return the status and raw body.
pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    credentials: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Bytes) {
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value).unwrap()),
        None => Body::empty(),
    };
    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(body)
        .unwrap();

    if let Some((username, password)) = credentials {
        request
            .headers_mut()
            .typed_insert(Authorization::basic(username, password));
    }

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    (status, body_bytes)
}

/// Send a request with the default broker credentials and parse the JSON body.
pub async fn send_authed<T: DeserializeOwned>(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Option<T>) {
    let (status, bytes) = send(app, method, path, Some((USERNAME, PASSWORD)), body).await;
    if bytes.is_empty() {
        return (status, None);
    }
    (status, serde_json::from_slice(&bytes).ok())
}

pub async fn get_json<T: DeserializeOwned>(app: &Router, path: &str) -> (StatusCode, Option<T>) {
    let (status, bytes) = send(app, Method::GET, path, None, None).await;
    if bytes.is_empty() {
        return (status, None);
    }
    (status, serde_json::from_slice(&bytes).ok())
}

// ============================================================================
// Log capture
// ============================================================================

/// Buffers everything a JSON `fmt` layer writes so tests can assert on it.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

pub struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: self.buffer.clone(),
        }
    }
}

impl LogCapture {
    /// A subscriber writing flattened JSON records into this capture.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(self.clone())
            .finish()
    }

    /// Decode every buffered record, panicking on the first malformed one.
    pub fn records(&self) -> Vec<Value> {
        let buffer = self.buffer.lock().unwrap();
        serde_json::Deserializer::from_slice(&buffer)
            .into_iter::<Value>()
            .map(|record| record.expect("malformed log record"))
            .collect()
    }

    /// Records whose `message` equals `message`.
    pub fn with_message(&self, message: &str) -> Vec<Value> {
        self.records()
            .into_iter()
            .filter(|r| r["message"] == message)
            .collect()
    }
}
