//! Store error types.

use thiserror::Error;

use crate::record::RecordId;

/// Store operation errors.
#[derive(Error, Debug, Clone)]
pub enum DbError {
    /// Model is not declared in the schema
    #[error("Model '{model}' not found")]
    ModelNotFound { model: String },

    /// Record not found in a collection
    #[error("Record {id} not found in '{model}'")]
    RecordNotFound { model: String, id: RecordId },

    /// Record id already taken in a collection
    #[error("Record {id} already exists in '{model}'")]
    DuplicateId { model: String, id: RecordId },

    /// Id value is neither a number nor a numeric string
    #[error("Invalid record id: {0}")]
    InvalidRecordId(String),

    /// Association not declared on a model
    #[error("Association '{association}' not found on model '{model}'")]
    AssociationNotFound { model: String, association: String },

    /// Fixture content could not be parsed
    #[error("Invalid fixture '{source_name}': {message}")]
    InvalidFixture {
        source_name: String,
        message: String,
    },

    /// Fixture file could not be read
    #[error("Failed to read fixture '{path}': {message}")]
    FixtureIo { path: String, message: String },

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,
}
