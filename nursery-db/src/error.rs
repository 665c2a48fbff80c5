//! Nursery database error types

use nursery_core::CatalogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NurseryDbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid field name: {0}")]
    InvalidField(String),

    #[error("Malformed document in {collection}: {reason}")]
    MalformedDocument {
        collection: &'static str,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, NurseryDbError>;

impl From<NurseryDbError> for CatalogError {
    fn from(e: NurseryDbError) -> Self {
        CatalogError::storage(e.to_string())
    }
}
