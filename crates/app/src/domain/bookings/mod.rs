//! Bookings
//!
//! Booking intake and everything it orchestrates: validation, quota,
//! conflict guarding, catalogue pricing and the post-commit notification.
//! The stored breakdown is a snapshot; nothing here ever reprices an
//! existing booking.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::BookingsServiceError;
pub use service::*;
