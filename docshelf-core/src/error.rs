//! Error and result types for store operations.
//!
//! The error surface here is deliberately small. "Not found" is never an
//! error: absent collections, documents and sub-collection keys come back as
//! `Option`/`bool` results, and schema failures as
//! [`Validation::Invalid`](crate::validate::Validation). [`StoreError`] is
//! reserved for failures of the underlying key-value engine and for
//! (de)serialization of persisted records, both of which are surfaced to the
//! caller without retries.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents the fatal failure modes of the store core.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A persisted record could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A storage backend could not be opened or constructed.
    #[error("initialization error: {0}")]
    Initialization(String),
    /// The underlying key-value engine failed. Multi-step operations are
    /// best-effort and may leave visible partial state behind this error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// A specialized `Result` type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<SerdeJsonError> for StoreError {
    fn from(err: SerdeJsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
