//! Recipe data module
//!
//! This module contains the recipe model handed to a step runner and the
//! catalog that resolves recipes for the host.

pub mod catalog;
pub mod model;

// Re-export main types
pub use catalog::{Catalog, CatalogEntry, CatalogError, ALL_CATEGORIES};
pub use model::{Recipe, Step};
