//! Domain models for the broker simulator

pub mod broker;
pub mod catalog;
pub mod common;
pub mod instance;

pub use broker::*;
pub use catalog::*;
pub use common::*;
pub use instance::*;
