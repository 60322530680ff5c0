//! Catalog module
//!
//! This module contains the table definitions, the in-memory catalog and the
//! persisted catalog log.

pub mod catalog;
pub mod schema;
pub mod store;

pub use catalog::Catalog;
pub use schema::TableDef;
pub use store::CatalogStore;
