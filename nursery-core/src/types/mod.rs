//! Catalog domain types

mod category;
mod ids;
mod plant;

pub use category::*;
pub use ids::*;
pub use plant::*;
