//! Catalog error taxonomy
//!
//! Every failure a catalog operation can report to its caller. The HTTP layer
//! maps each variant onto a distinct status; nothing here is retried.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single failing field in a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path of the field, e.g. `images[0].url`. Empty for the payload itself.
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Every field failure found in one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` when nothing failed
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join("; "))
    }
}

/// Catalog operation errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Malformed identifier or schema violation
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        fields: ValidationErrors,
    },

    /// Well-formed identifier with no matching record
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// Duplicate of an existing record
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backing store unreachable or the operation failed inside it
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl CatalogError {
    pub fn invalid_id(raw: &str) -> Self {
        let mut fields = ValidationErrors::new();
        fields.push("id", "must be a valid record identifier");
        CatalogError::InvalidInput {
            message: format!("Invalid id '{}'", raw),
            fields,
        }
    }

    pub fn validation(fields: ValidationErrors) -> Self {
        CatalogError::InvalidInput {
            message: fields.to_string(),
            fields,
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CatalogError::Conflict(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        CatalogError::StorageUnavailable(message.into())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::InvalidInput { .. } => "INVALID_INPUT",
            CatalogError::NotFound { .. } => "NOT_FOUND",
            CatalogError::Conflict(_) => "CONFLICT",
            CatalogError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
        }
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(fields: ValidationErrors) -> Self {
        CatalogError::validation(fields)
    }
}

/// Catalog result type
pub type CatalogResult<T> = Result<T, CatalogError>;
