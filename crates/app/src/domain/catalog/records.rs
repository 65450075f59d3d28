//! Catalog Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// Service UUID
pub type ServiceUuid = TypedUuid<ServiceRecord>;

/// Addon UUID
pub type AddonUuid = TypedUuid<AddonRecord>;

/// Service Record
#[derive(Debug, Clone)]
pub struct ServiceRecord {
    pub uuid: ServiceUuid,
    pub name: String,

    /// Base price before multipliers, add-ons and surcharges.
    pub base_price: Decimal,

    /// How long a booking for this service occupies a bay.
    pub duration_minutes: i32,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Addon Record
#[derive(Debug, Clone)]
pub struct AddonRecord {
    pub uuid: AddonUuid,
    pub name: String,

    /// Amount added on top of the service subtotal.
    pub price_delta: Decimal,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
