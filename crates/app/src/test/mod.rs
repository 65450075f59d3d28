//! Shared infrastructure for Docker-backed service tests.

pub mod db;
pub mod helpers;

pub use context::TestContext;
