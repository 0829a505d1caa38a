//! Broker, instance and binding CRUD with referential-integrity checks
//!
//! All three record kinds share one namespace in the underlying repository.
//! Validation and the final write are separate repository calls, each taking
//! the store lock on its own: two callers racing on the same identifier can
//! interleave between the check and the write.

use crate::domain::{
    new_guid, BindingDetails, BrokerConfiguration, ServiceBinding, ServiceInstance,
    ServiceInstanceDetails,
};
use crate::repository::{MemoryStore, RecordRepository, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// A value held in the shared namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Broker(BrokerConfiguration),
    Instance(ServiceInstance),
    Binding(ServiceBinding),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Broker,
    Instance,
    Binding,
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Broker(_) => RecordKind::Broker,
            Record::Instance(_) => RecordKind::Instance,
            Record::Binding(_) => RecordKind::Binding,
        }
    }
}

/// Domain store errors. The message text is relied on by consuming tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerStoreError {
    #[error("broker not found: {0}")]
    BrokerNotFound(String),

    #[error("service offering ID not found in catalog: {0}")]
    ServiceOfferingNotFound(String),

    #[error("service plan ID '{plan_id}' not found for service offering '{offering_id}'")]
    PlanNotFound {
        plan_id: String,
        offering_id: String,
    },

    #[error("service instance not found: {0}")]
    InstanceNotFound(String),

    #[error("service binding not found: {0}")]
    BindingNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type BrokerStoreResult<T> = std::result::Result<T, BrokerStoreError>;

pub struct BrokerStore<R: RecordRepository<Record> = MemoryStore<Record>> {
    repo: Arc<R>,
}

impl BrokerStore<MemoryStore<Record>> {
    /// A store backed by a fresh in-memory namespace.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

impl<R: RecordRepository<Record>> BrokerStore<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    // ------------------------------------------------------------------
    // Brokers
    // ------------------------------------------------------------------

    /// Store a broker configuration under a freshly generated identifier.
    pub fn create_broker(&self, config: BrokerConfiguration) -> BrokerStoreResult<String> {
        let id = new_guid();
        self.repo.create(&id, Record::Broker(config))?;
        debug!(broker_id = %id, "created broker");
        Ok(id)
    }

    pub fn retrieve_broker(&self, id: &str) -> Option<BrokerConfiguration> {
        match self.repo.retrieve(id) {
            Some(Record::Broker(config)) => Some(config),
            _ => None,
        }
    }

    /// Replace the configuration of an existing broker.
    pub fn update_broker(&self, id: &str, config: BrokerConfiguration) -> BrokerStoreResult<()> {
        if self.retrieve_broker(id).is_none() {
            return Err(BrokerStoreError::BrokerNotFound(id.to_string()));
        }
        self.repo.update(id, Record::Broker(config))?;
        debug!(broker_id = %id, "updated broker");
        Ok(())
    }

    /// Remove a broker. Its instances and bindings stay in the namespace but
    /// can no longer be resolved.
    pub fn delete_broker(&self, id: &str) {
        self.delete_kind(id, RecordKind::Broker);
    }

    /// Identifiers of every broker, in no particular order.
    pub fn list_brokers(&self) -> Vec<String> {
        self.repo
            .list()
            .into_iter()
            .filter(|id| {
                matches!(
                    self.repo.retrieve(id).map(|r| r.kind()),
                    Some(RecordKind::Broker)
                )
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Service instances
    // ------------------------------------------------------------------

    /// Create an instance after checking that its broker exists and that the
    /// requested offering and plan are in that broker's catalog.
    pub fn create_instance(
        &self,
        broker_id: &str,
        instance_id: &str,
        details: ServiceInstanceDetails,
    ) -> BrokerStoreResult<()> {
        self.validate_catalog_reference(broker_id, &details)?;

        let instance = ServiceInstance {
            broker_id: broker_id.to_string(),
            details,
        };
        self.repo.create(instance_id, Record::Instance(instance))?;
        debug!(broker_id, instance_id, "created service instance");
        Ok(())
    }

    /// Look up an instance owned by `broker_id`. Only the broker is
    /// re-validated; the instance survives a catalog replacement.
    pub fn retrieve_instance(
        &self,
        broker_id: &str,
        instance_id: &str,
    ) -> BrokerStoreResult<ServiceInstanceDetails> {
        self.require_broker(broker_id)?;

        match self.repo.retrieve(instance_id) {
            Some(Record::Instance(instance)) if instance.broker_id == broker_id => {
                Ok(instance.details)
            }
            _ => Err(BrokerStoreError::InstanceNotFound(instance_id.to_string())),
        }
    }

    /// Replace an existing instance's details, repeating the full
    /// broker/offering/plan validation.
    pub fn update_instance(
        &self,
        broker_id: &str,
        instance_id: &str,
        details: ServiceInstanceDetails,
    ) -> BrokerStoreResult<()> {
        self.validate_catalog_reference(broker_id, &details)?;
        self.retrieve_instance(broker_id, instance_id)?;

        let instance = ServiceInstance {
            broker_id: broker_id.to_string(),
            details,
        };
        self.repo.update(instance_id, Record::Instance(instance))?;
        debug!(broker_id, instance_id, "updated service instance");
        Ok(())
    }

    /// Delete an instance. The broker must exist; a missing instance is not
    /// an error.
    pub fn delete_instance(&self, broker_id: &str, instance_id: &str) -> BrokerStoreResult<()> {
        self.require_broker(broker_id)?;

        if let Some(Record::Instance(instance)) = self.repo.retrieve(instance_id) {
            if instance.broker_id == broker_id {
                self.repo.delete(instance_id);
                debug!(broker_id, instance_id, "deleted service instance");
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Service bindings
    // ------------------------------------------------------------------

    pub fn create_binding(
        &self,
        broker_id: &str,
        instance_id: &str,
        binding_id: &str,
        details: BindingDetails,
    ) -> BrokerStoreResult<()> {
        self.retrieve_instance(broker_id, instance_id)?;

        let binding = ServiceBinding {
            instance_id: instance_id.to_string(),
            details,
        };
        self.repo.create(binding_id, Record::Binding(binding))?;
        debug!(broker_id, instance_id, binding_id, "created service binding");
        Ok(())
    }

    pub fn retrieve_binding(
        &self,
        broker_id: &str,
        instance_id: &str,
        binding_id: &str,
    ) -> BrokerStoreResult<BindingDetails> {
        self.retrieve_instance(broker_id, instance_id)?;

        match self.repo.retrieve(binding_id) {
            Some(Record::Binding(binding)) if binding.instance_id == instance_id => {
                Ok(binding.details)
            }
            _ => Err(BrokerStoreError::BindingNotFound(binding_id.to_string())),
        }
    }

    /// Delete a binding. The parent instance must resolve; a missing binding
    /// is not an error.
    pub fn delete_binding(
        &self,
        broker_id: &str,
        instance_id: &str,
        binding_id: &str,
    ) -> BrokerStoreResult<()> {
        self.retrieve_instance(broker_id, instance_id)?;

        if let Some(Record::Binding(binding)) = self.repo.retrieve(binding_id) {
            if binding.instance_id == instance_id {
                self.repo.delete(binding_id);
                debug!(broker_id, instance_id, binding_id, "deleted service binding");
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn require_broker(&self, broker_id: &str) -> BrokerStoreResult<BrokerConfiguration> {
        self.retrieve_broker(broker_id)
            .ok_or_else(|| BrokerStoreError::BrokerNotFound(broker_id.to_string()))
    }

    fn validate_catalog_reference(
        &self,
        broker_id: &str,
        details: &ServiceInstanceDetails,
    ) -> BrokerStoreResult<()> {
        let config = self.require_broker(broker_id)?;

        let offering = config.find_service(&details.service_id).ok_or_else(|| {
            BrokerStoreError::ServiceOfferingNotFound(details.service_id.clone())
        })?;

        if offering.find_plan(&details.plan_id).is_none() {
            return Err(BrokerStoreError::PlanNotFound {
                plan_id: details.plan_id.clone(),
                offering_id: offering.id.clone(),
            });
        }
        Ok(())
    }

    fn delete_kind(&self, id: &str, kind: RecordKind) {
        if self.repo.retrieve(id).map(|r| r.kind()) == Some(kind) {
            self.repo.delete(id);
        }
    }
}
