//! Open Service Broker v2 wire shapes served by the broker-protocol endpoints

use super::broker::{BrokerConfiguration, MaintenanceInfo, PlanCost, ServiceOffering};
use serde::{Deserialize, Serialize};

/// Body of `GET /v2/catalog`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub services: Vec<CatalogService>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogService {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bindable: bool,
    pub instances_retrievable: bool,
    pub bindings_retrievable: bool,
    pub plan_updateable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    pub metadata: CatalogServiceMetadata,
    pub plans: Vec<CatalogPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogServiceMetadata {
    pub shareable: bool,
    #[serde(
        rename = "documentationUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub documentation_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPlan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub free: bool,
    pub bindable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_info: Option<MaintenanceInfo>,
    pub metadata: CatalogPlanMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPlanMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub costs: Vec<PlanCost>,
}

impl From<&BrokerConfiguration> for CatalogResponse {
    fn from(config: &BrokerConfiguration) -> Self {
        Self {
            services: config.services.iter().map(CatalogService::from).collect(),
        }
    }
}

impl From<&ServiceOffering> for CatalogService {
    fn from(service: &ServiceOffering) -> Self {
        // Plans inherit bindability from their offering.
        let plans = service
            .plans
            .iter()
            .map(|plan| CatalogPlan {
                id: plan.id.clone(),
                name: plan.name.clone(),
                description: plan.description.clone(),
                free: plan.free,
                bindable: service.bindable,
                maintenance_info: plan.maintenance_info.clone(),
                metadata: CatalogPlanMetadata {
                    costs: plan.costs.clone(),
                },
            })
            .collect();

        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            bindable: service.bindable,
            instances_retrievable: service.instances_retrievable,
            bindings_retrievable: service.bindable,
            plan_updateable: service.plan_updatable,
            tags: service.tags.clone(),
            requires: service.requires.clone(),
            metadata: CatalogServiceMetadata {
                shareable: service.shareable,
                documentation_url: service.documentation_url.clone(),
            },
            plans,
        }
    }
}

/// State reported by the last-operation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LastOperationState {
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "succeeded")]
    Succeeded,
}

/// Body of `GET …/last_operation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperationResponse {
    pub state: LastOperationState,
    pub description: String,
}
