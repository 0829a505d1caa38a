//! Business logic layer

pub mod broker_store;

pub use broker_store::{BrokerStore, BrokerStoreError, BrokerStoreResult, Record, RecordKind};
