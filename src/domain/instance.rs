//! Service instance and binding domain models

use super::common::JsonObject;
use serde::{Deserialize, Serialize};

/// Request body of provision and update calls.
///
/// The offering and plan are referenced by identifier only and are checked
/// against the owning broker's catalog whenever the instance is written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceInstanceDetails {
    pub service_id: String,
    pub plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonObject>,
}

/// A provisioned instance as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInstance {
    pub broker_id: String,
    pub details: ServiceInstanceDetails,
}

/// Request body of bind calls, and response body of get-binding calls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<JsonObject>,
}

/// A binding as held by the store, scoped to its parent instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceBinding {
    pub instance_id: String,
    pub details: BindingDetails,
}
