//! Bookings service errors.
//!
//! Booking intake has a wider failure vocabulary than the other services:
//! besides storage faults it distinguishes shape violations, actor
//! resolution failures, quota exhaustion and scheduling conflicts, because
//! callers route each of those differently.

use lustre::pricing::InvalidPricingInputs;
use smallvec::SmallVec;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    accounts::errors::AccountsServiceError, catalog::errors::CatalogServiceError,
    tenants::errors::TenantsServiceError,
};

/// A rule an intake payload broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookingRule {
    /// References under four characters are too easy to collide.
    #[error("reference must be at least 4 characters after trimming, got {0}")]
    ReferenceTooShort(usize),

    /// The occupied window must be non-empty.
    #[error("booking must start before it ends")]
    StartNotBeforeEnd,
}

#[derive(Debug, Error)]
pub enum BookingsServiceError {
    #[error("booking request rejected: {}", describe(.0))]
    Validation(SmallVec<[BookingRule; 2]>),

    #[error(transparent)]
    InvalidInputs(#[from] InvalidPricingInputs),

    #[error("could not resolve a tenant for the requesting actor")]
    TenantResolution(#[source] AccountsServiceError),

    #[error("monthly booking limit reached ({current} of {limit} used this month)")]
    QuotaExceeded { limit: u32, current: u32 },

    #[error("requested window conflicts with existing bookings")]
    SchedulingConflict { conflicting: SmallVec<[Uuid; 4]> },

    #[error("a booking with this reference already exists")]
    AlreadyExists,

    #[error("booking not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("could not project the booking window onto the tenant calendar")]
    Time(#[source] jiff::Error),

    #[error(transparent)]
    Tenants(#[from] TenantsServiceError),

    #[error(transparent)]
    Accounts(#[from] AccountsServiceError),

    #[error(transparent)]
    Catalog(#[from] CatalogServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

fn describe(violations: &[BookingRule]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Error> for BookingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
