//! Booking Data

use jiff::Timestamp;
use lustre::pricing::PricingInputs;
use smallvec::SmallVec;

use crate::domain::{
    accounts::records::{AddressUuid, CustomerUuid, VehicleUuid},
    bookings::{errors::BookingRule, records::BookingUuid},
    catalog::records::{AddonUuid, ServiceUuid},
};

/// Shortest reference the intake shape check accepts, after trimming.
pub const MIN_REFERENCE_LENGTH: usize = 4;

/// Intake payload for a new booking.
///
/// The price is deliberately absent: a booking is always priced from the
/// tenant's stored catalogue and configuration, never from caller-supplied
/// numbers.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub uuid: BookingUuid,
    pub customer_uuid: CustomerUuid,
    pub vehicle_uuid: VehicleUuid,
    pub address_uuid: AddressUuid,
    pub service_uuid: ServiceUuid,
    pub addon_uuids: Vec<AddonUuid>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,

    /// Client-chosen reference, also the idempotency key.
    pub reference: String,

    /// Travel distance override. When absent the address's stored distance
    /// is used; when both are absent no surcharge applies.
    pub distance_miles: Option<f64>,
}

impl BookingRequest {
    /// Cheap shape check, run before any I/O. Violations accumulate so a
    /// caller sees everything wrong with the payload at once.
    pub fn validate(&self) -> Result<(), SmallVec<[BookingRule; 2]>> {
        let mut violations = SmallVec::new();

        let reference = self.reference.trim();

        if reference.chars().count() < MIN_REFERENCE_LENGTH {
            violations.push(BookingRule::ReferenceTooShort(reference.chars().count()));
        }

        if self.start_at >= self.end_at {
            violations.push(BookingRule::StartNotBeforeEnd);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Quote payload: everything optional, nothing persisted.
///
/// Stored records referenced by UUID provide the pricing ingredients;
/// `overrides` lets a caller pin any of the raw inputs directly, which is
/// how ad-hoc quotes without a catalogue entry are produced.
#[derive(Debug, Clone, Default)]
pub struct QuoteRequest {
    pub service_uuid: Option<ServiceUuid>,
    pub vehicle_uuid: Option<VehicleUuid>,
    pub addon_uuids: Vec<AddonUuid>,
    pub distance_miles: Option<f64>,

    /// Raw pricing inputs taking precedence over resolved records.
    pub overrides: PricingInputs,
}
