//! Broker configuration domain model
//!
//! A broker configuration is authored by test code through the admin API and
//! describes everything one simulated broker advertises and how it misbehaves.

use super::common::{new_guid, validate_printable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Full configuration of one simulated broker.
///
/// Each `*_response` field is a status-code override in `[0, 600]`: `0` means
/// the endpoint behaves normally, anything else makes it reply with that
/// status and an empty body. Credentials are at least five printable ASCII
/// characters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BrokerConfiguration {
    #[validate(length(min = 5), custom(function = "validate_printable"))]
    pub username: String,
    #[validate(length(min = 5), custom(function = "validate_printable"))]
    pub password: String,
    #[validate(length(min = 1), nested)]
    pub services: Vec<ServiceOffering>,
    #[validate(range(max = 600))]
    pub catalog_response: u16,
    #[validate(range(max = 600))]
    pub provision_response: u16,
    #[validate(range(max = 600))]
    pub update_response: u16,
    #[validate(range(max = 600))]
    pub deprovision_response: u16,
    #[validate(range(max = 600))]
    pub bind_response: u16,
    #[validate(range(max = 600))]
    pub unbind_response: u16,
    #[validate(range(max = 600))]
    pub get_binding_response: u16,
    /// When non-zero, mutating endpoints answer asynchronously and the
    /// operation completes this many milliseconds later. At most one week.
    #[validate(range(max = 604_800_000))]
    pub async_response_delay_ms: u64,
}

impl BrokerConfiguration {
    /// Fill in any missing offering/plan identifiers and descriptions so every
    /// catalog node is addressable, even from minimal input.
    pub fn with_generated_ids(mut self) -> Self {
        for service in &mut self.services {
            if service.id.is_empty() {
                service.id = new_guid();
            }
            if service.description.is_empty() {
                service.description = format!("{} service offering", service.name);
            }
            for plan in &mut service.plans {
                if plan.id.is_empty() {
                    plan.id = new_guid();
                }
                if plan.description.is_empty() {
                    plan.description = format!("{} plan", plan.name);
                }
            }
        }
        self
    }

    /// Look up a service offering by identifier.
    pub fn find_service(&self, service_id: &str) -> Option<&ServiceOffering> {
        self.services.iter().find(|s| s.id == service_id)
    }
}

/// A service offering advertised in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServiceOffering {
    #[validate(length(min = 1), custom(function = "validate_printable"))]
    pub name: String,
    pub id: String,
    pub description: String,
    pub bindable: bool,
    pub instances_retrievable: bool,
    pub plan_updatable: bool,
    pub shareable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    pub tags: Vec<String>,
    pub requires: Vec<String>,
    #[validate(length(min = 1), nested)]
    pub plans: Vec<Plan>,
}

impl ServiceOffering {
    /// Look up a plan of this offering by identifier.
    pub fn find_plan(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }
}

/// A plan of a service offering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Plan {
    #[validate(length(min = 1), custom(function = "validate_printable"))]
    pub name: String,
    pub id: String,
    pub description: String,
    pub free: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_info: Option<MaintenanceInfo>,
    pub costs: Vec<PlanCost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceInfo {
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Price of a plan: amounts keyed by currency, per `unit`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanCost {
    pub amount: BTreeMap<String, f64>,
    pub unit: String,
}

/// Response body of a successful broker creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBrokerResponse {
    pub guid: String,
}
