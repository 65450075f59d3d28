//! Booking Records

use jiff::Timestamp;
use lustre::{
    booking::{BookingStatus, PaymentStatus},
    pricing::PriceBreakdown,
};
use serde::Serialize;

use crate::{
    domain::{
        accounts::records::{AddressUuid, CustomerUuid, VehicleUuid},
        catalog::records::{AddonUuid, ServiceUuid},
    },
    uuids::TypedUuid,
};

/// Booking UUID
pub type BookingUuid = TypedUuid<BookingRecord>;

/// Booking Record
///
/// Serialises with camelCase keys because it is also the webhook payload
/// for booking notifications.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub uuid: BookingUuid,
    pub customer_uuid: CustomerUuid,
    pub vehicle_uuid: VehicleUuid,
    pub address_uuid: AddressUuid,
    pub service_uuid: ServiceUuid,
    pub addon_uuids: Vec<AddonUuid>,

    /// Inclusive start of the occupied window.
    pub start_at: Timestamp,

    /// Exclusive end of the occupied window.
    pub end_at: Timestamp,

    /// Client-chosen idempotency reference, unique per tenant.
    pub reference: String,

    pub status: BookingStatus,
    pub payment_status: PaymentStatus,

    /// Monetary snapshot taken at creation time, stored verbatim and never
    /// recomputed, so later price changes cannot drift a past booking.
    pub breakdown: PriceBreakdown,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
