//! Catalog
//!
//! Detailing services, add-ons and the per-tenant pricing configuration.
//! Reads degrade to permissive defaults; writes are validated strictly.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
