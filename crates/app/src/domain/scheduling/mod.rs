//! Scheduling
//!
//! Weekly work patterns and the bookable slots they generate. Patterns are
//! stored one row per weekday; slots are computed on demand and never
//! stored.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::SchedulingServiceError;
pub use service::*;
