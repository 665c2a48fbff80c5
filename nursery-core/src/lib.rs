//! Nursery Core
//!
//! Domain model for the plant nursery catalog.
//!
//! - `types` - Plant, Category and identifier types shared by every layer
//! - `validation` - the schema validator applied to incoming plant and category payloads
//! - `error` - the catalog error taxonomy surfaced to API callers
//!
//! Nothing in this crate performs I/O.

pub mod error;
pub mod timestamp;
pub mod types;
pub mod validation;

pub use error::{CatalogError, CatalogResult, FieldError, ValidationErrors};
pub use types::*;
pub use validation::{PlantValidator, ValidationPolicy};

/// Default category tags offered by the admin form.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Indoor",
    "Outdoor",
    "Flowering",
    "Succulents",
    "Tropical",
    "Cacti",
    "Herbs",
    "Vegetables",
    "Fruit",
    "Trees",
    "Shrubs",
];
