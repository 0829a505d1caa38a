//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::middleware::{normalize_error_response, BrokerMakeSpan};
use crate::service::BrokerStore;
use anyhow::Result;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub brokers: Arc<BrokerStore>,
}

impl AppState {
    /// State with an empty in-memory broker store.
    pub fn new() -> Self {
        Self {
            brokers: Arc::new(BrokerStore::in_memory()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(api::health::liveness))
        // Administrative surface
        .route(
            "/config",
            get(api::config::list).post(api::config::create),
        )
        .route(
            "/config/{guid}",
            put(api::config::replace).delete(api::config::delete),
        )
        // Broker-protocol surface
        .route("/broker/{guid}/v2/catalog", get(api::broker::catalog))
        .route(
            "/broker/{guid}/v2/service_instances/{instance_id}",
            put(api::broker::provision)
                .get(api::broker::retrieve_instance)
                .patch(api::broker::update_instance)
                .delete(api::broker::deprovision),
        )
        .route(
            "/broker/{guid}/v2/service_instances/{instance_id}/last_operation",
            get(api::broker::instance_last_operation),
        )
        .route(
            "/broker/{guid}/v2/service_instances/{instance_id}/service_bindings/{binding_id}",
            put(api::broker::bind)
                .get(api::broker::get_binding)
                .delete(api::broker::unbind),
        )
        .route(
            "/broker/{guid}/v2/service_instances/{instance_id}/service_bindings/{binding_id}/last_operation",
            get(api::broker::binding_last_operation),
        )
        // Add middleware
        .layer(axum::middleware::from_fn(normalize_error_response))
        .layer(TraceLayer::new_for_http().make_span_with(BrokerMakeSpan))
        .with_state(state)
}

/// Serve the router on an already-bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the server with a fresh broker store
pub async fn run(config: Config) -> Result<()> {
    let http_addr = config.http_addr();
    let state = AppState::new();

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", listener.local_addr()?);

    serve(listener, state).await
}
