//! Multibroker - configurable Open Service Broker simulator
//!
//! Test suites register any number of simulated brokers through an
//! administrative HTTP API and then drive them through a subset of the Open
//! Service Broker v2 protocol. Each broker's catalog, credentials, failure
//! status codes and asynchronous behaviour come from its configuration.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod server;
pub mod service;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
