//! Catalog resolution
//!
//! Price and quantity-cap metadata for items and their modifiers,
//! normalized across the heterogeneous catalog tables.

pub mod resolver;

pub use resolver::CatalogResolver;
