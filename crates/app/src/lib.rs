//! Lustre application services.
//!
//! Persistence, tenant isolation and notification dispatch around the pure
//! engine in the `lustre` crate. Every domain service runs its queries inside
//! a tenant-scoped transaction so PostgreSQL row-level security does the
//! isolation work.

pub mod context;
pub mod database;
pub mod domain;
pub mod notify;

#[cfg(test)]
mod test;

mod uuids;
