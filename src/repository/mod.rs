//! Record storage layer (Repository pattern)
//!
//! A flat, identity-keyed namespace of typed records. Identifiers are chosen
//! by the caller; this layer never generates them.

pub mod memory;

pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by the record store.
///
/// Both variants indicate a caller bug in fixture code (a duplicate create or
/// an update of a record that was never written). They are returned rather
/// than raised so the caller decides whether to treat them as fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    #[error("record not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// CRUD over a single namespace of records of type `V`.
///
/// `list` is unordered: callers must not rely on the order of identifiers,
/// and two calls may disagree on order even with no write in between.
#[cfg_attr(test, mockall::automock)]
pub trait RecordRepository<V: Send + Sync + 'static>: Send + Sync {
    /// Write a new record. Fails if `id` is already taken.
    fn create(&self, id: &str, value: V) -> StoreResult<()>;
    /// Read a record. Absence is reported as `None`, never as an error.
    fn retrieve(&self, id: &str) -> Option<V>;
    /// Replace an existing record. Fails if `id` was never written.
    fn update(&self, id: &str, value: V) -> StoreResult<()>;
    /// Remove a record. Idempotent.
    fn delete(&self, id: &str);
    /// All identifiers currently held.
    fn list(&self) -> Vec<String>;
}
