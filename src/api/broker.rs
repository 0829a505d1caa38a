//! Broker-protocol API handlers (Open Service Broker v2 subset)
//!
//! Every handler takes an [`AuthorizedBroker`], so the broker guid has been
//! resolved and Basic-Auth checked before the handler body runs. Endpoints
//! with a configured status override answer with it before touching the
//! request body or the store.

use crate::api::{accepted, configured_status, decode_json, AsyncQuery, LastOperationQuery};
use crate::domain::{
    BindingDetails, CatalogResponse, JsonObject, LastOperationResponse, LastOperationState,
    ServiceInstanceDetails,
};
use crate::error::{AppError, Result};
use crate::middleware::AuthorizedBroker;
use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::info;

const DASHBOARD_URL: &str = "http://example.com";
const LAST_OPERATION_DESCRIPTION: &str = "very happy service";

type InstancePath = Path<(String, String)>;
type BindingPath = Path<(String, String, String)>;

/// `GET /broker/{guid}/v2/catalog`
pub async fn catalog(broker: AuthorizedBroker) -> Result<Response> {
    if let Some(response) = configured_status(broker.config.catalog_response) {
        return response;
    }
    info!(broker_guid = %broker.guid, "presenting catalog");

    Ok(Json(CatalogResponse::from(&broker.config)).into_response())
}

/// `PUT /broker/{guid}/v2/service_instances/{instance_id}`
pub async fn provision(
    broker: AuthorizedBroker,
    State(state): State<AppState>,
    Path((_, instance_id)): InstancePath,
    Query(query): Query<AsyncQuery>,
    body: Bytes,
) -> Result<Response> {
    info!(broker_guid = %broker.guid, %instance_id, "provisioning service instance");
    if let Some(response) = configured_status(broker.config.provision_response) {
        return response;
    }

    let details: ServiceInstanceDetails = decode_json(&body)?;
    state
        .brokers
        .create_instance(&broker.guid, &instance_id, details)?;

    let mut response = JsonObject::new();
    response.insert("dashboard_url".to_string(), DASHBOARD_URL.into());

    if broker.config.async_response_delay_ms == 0 {
        return Ok((StatusCode::CREATED, Json(response)).into_response());
    }
    accepted(&broker.config, &query, response)
}

/// `GET /broker/{guid}/v2/service_instances/{instance_id}`
pub async fn retrieve_instance(
    broker: AuthorizedBroker,
    State(state): State<AppState>,
    Path((_, instance_id)): InstancePath,
) -> Result<Response> {
    info!(broker_guid = %broker.guid, %instance_id, "retrieving service instance");

    let details = state
        .brokers
        .retrieve_instance(&broker.guid, &instance_id)
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!({ "parameters": details.parameters })).into_response())
}

/// `PATCH /broker/{guid}/v2/service_instances/{instance_id}`
pub async fn update_instance(
    broker: AuthorizedBroker,
    State(state): State<AppState>,
    Path((_, instance_id)): InstancePath,
    Query(query): Query<AsyncQuery>,
    body: Bytes,
) -> Result<Response> {
    info!(broker_guid = %broker.guid, %instance_id, "updating service instance");
    if let Some(response) = configured_status(broker.config.update_response) {
        return response;
    }

    state
        .brokers
        .retrieve_instance(&broker.guid, &instance_id)
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let details: ServiceInstanceDetails = decode_json(&body)?;
    state
        .brokers
        .update_instance(&broker.guid, &instance_id, details)?;

    if broker.config.async_response_delay_ms == 0 {
        return Ok(Json(JsonObject::new()).into_response());
    }
    accepted(&broker.config, &query, JsonObject::new())
}

/// `DELETE /broker/{guid}/v2/service_instances/{instance_id}`
pub async fn deprovision(
    broker: AuthorizedBroker,
    State(state): State<AppState>,
    Path((_, instance_id)): InstancePath,
    Query(query): Query<AsyncQuery>,
) -> Result<Response> {
    info!(broker_guid = %broker.guid, %instance_id, "deprovisioning service instance");
    if let Some(response) = configured_status(broker.config.deprovision_response) {
        return response;
    }

    state.brokers.delete_instance(&broker.guid, &instance_id)?;

    if broker.config.async_response_delay_ms == 0 {
        return Ok(Json(JsonObject::new()).into_response());
    }
    accepted(&broker.config, &query, JsonObject::new())
}

/// `GET /broker/{guid}/v2/service_instances/{instance_id}/last_operation`
pub async fn instance_last_operation(
    broker: AuthorizedBroker,
    Path((_, instance_id)): InstancePath,
    Query(query): Query<LastOperationQuery>,
) -> Result<Response> {
    let completes_at = query.completion_time()?;
    info!(
        broker_guid = %broker.guid,
        %instance_id,
        %completes_at,
        "providing last operation status"
    );

    last_operation(completes_at)
}

/// `PUT /broker/{guid}/v2/service_instances/{instance_id}/service_bindings/{binding_id}`
pub async fn bind(
    broker: AuthorizedBroker,
    State(state): State<AppState>,
    Path((_, instance_id, binding_id)): BindingPath,
    Query(query): Query<AsyncQuery>,
    body: Bytes,
) -> Result<Response> {
    info!(broker_guid = %broker.guid, %instance_id, %binding_id, "creating binding");
    if let Some(response) = configured_status(broker.config.bind_response) {
        return response;
    }

    state
        .brokers
        .retrieve_instance(&broker.guid, &instance_id)
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let details: BindingDetails = decode_json(&body)?;
    state
        .brokers
        .create_binding(&broker.guid, &instance_id, &binding_id, details)?;

    if broker.config.async_response_delay_ms == 0 {
        let response = json!({ "credentials": broker_credentials(&broker) });
        return Ok((StatusCode::CREATED, Json(response)).into_response());
    }
    accepted(&broker.config, &query, JsonObject::new())
}

/// `GET /broker/{guid}/v2/service_instances/{instance_id}/service_bindings/{binding_id}`
pub async fn get_binding(
    broker: AuthorizedBroker,
    State(state): State<AppState>,
    Path((_, instance_id, binding_id)): BindingPath,
) -> Result<Response> {
    info!(broker_guid = %broker.guid, %instance_id, %binding_id, "retrieving binding");
    if let Some(response) = configured_status(broker.config.get_binding_response) {
        return response;
    }

    let mut details = state
        .brokers
        .retrieve_binding(&broker.guid, &instance_id, &binding_id)?;
    details.credentials = Some(broker_credentials(&broker));

    Ok(Json(details).into_response())
}

/// `DELETE /broker/{guid}/v2/service_instances/{instance_id}/service_bindings/{binding_id}`
pub async fn unbind(
    broker: AuthorizedBroker,
    State(state): State<AppState>,
    Path((_, instance_id, binding_id)): BindingPath,
    Query(query): Query<AsyncQuery>,
) -> Result<Response> {
    info!(broker_guid = %broker.guid, %instance_id, %binding_id, "deleting binding");
    if let Some(response) = configured_status(broker.config.unbind_response) {
        return response;
    }

    state
        .brokers
        .delete_binding(&broker.guid, &instance_id, &binding_id)?;

    if broker.config.async_response_delay_ms == 0 {
        return Ok(Json(JsonObject::new()).into_response());
    }
    accepted(&broker.config, &query, JsonObject::new())
}

/// `GET /broker/{guid}/v2/service_instances/{instance_id}/service_bindings/{binding_id}/last_operation`
pub async fn binding_last_operation(
    broker: AuthorizedBroker,
    Path((_, instance_id, binding_id)): BindingPath,
    Query(query): Query<LastOperationQuery>,
) -> Result<Response> {
    let completes_at = query.completion_time()?;
    info!(
        broker_guid = %broker.guid,
        %instance_id,
        %binding_id,
        %completes_at,
        "providing binding last operation status"
    );

    last_operation(completes_at)
}

fn last_operation(completes_at: chrono::DateTime<Utc>) -> Result<Response> {
    let state = if Utc::now() > completes_at {
        LastOperationState::Succeeded
    } else {
        LastOperationState::InProgress
    };

    Ok(Json(LastOperationResponse {
        state,
        description: LAST_OPERATION_DESCRIPTION.to_string(),
    })
    .into_response())
}

fn broker_credentials(broker: &AuthorizedBroker) -> JsonObject {
    let mut credentials = JsonObject::new();
    credentials.insert("username".to_string(), broker.config.username.clone().into());
    credentials.insert("password".to_string(), broker.config.password.clone().into());
    credentials
}
