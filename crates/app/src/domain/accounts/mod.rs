//! Accounts
//!
//! Staff profiles, customers, vehicles and addresses, plus the actor
//! resolution step that turns "who is calling" into a tenant scope.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::AccountsServiceError;
pub use service::*;
