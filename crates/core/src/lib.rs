//! Lustre
//!
//! Lustre is the availability and pricing engine behind a multi-tenant
//! detailing-business platform: deterministic price breakdowns, bookable-slot
//! generation from weekly work patterns, capacity-aware conflict checks and
//! plan-quota policy. Everything in this crate is pure; persistence and
//! notification live in `lustre-app`.

pub mod booking;
pub mod coerce;
pub mod fixtures;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod quota;
pub mod schedule;
