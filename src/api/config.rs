//! Administrative API handlers: broker lifecycle for test setup

use crate::api::decode_json;
use crate::domain::{BrokerConfiguration, NewBrokerResponse};
use crate::error::Result;
use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;
use validator::Validate;

/// Decode and validate a broker configuration, filling in missing catalog ids.
fn parse_configuration(body: &Bytes) -> Result<BrokerConfiguration> {
    let config: BrokerConfiguration = decode_json(body)?;
    config.validate()?;
    Ok(config.with_generated_ids())
}

/// Create broker
pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let config = parse_configuration(&body)?;
    let guid = state.brokers.create_broker(config)?;
    info!(broker_guid = %guid, "created broker");

    Ok((StatusCode::CREATED, Json(NewBrokerResponse { guid })))
}

/// List broker ids
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.brokers.list_brokers()))
}

/// Replace a broker's configuration, keeping its guid
pub async fn replace(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let config = parse_configuration(&body)?;
    state.brokers.update_broker(&guid, config)?;
    info!(broker_guid = %guid, "replaced broker configuration");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete broker
pub async fn delete(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<impl IntoResponse> {
    state.brokers.delete_broker(&guid);
    info!(broker_guid = %guid, "deleted broker");

    Ok(StatusCode::NO_CONTENT)
}
