//! Lustre Domain Concerns

pub mod accounts;
pub mod bookings;
pub mod catalog;
pub mod scheduling;
pub mod tenants;
