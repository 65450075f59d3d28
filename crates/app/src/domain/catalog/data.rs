//! Catalog Data

use rust_decimal::Decimal;

use crate::domain::catalog::records::{AddonUuid, ServiceUuid};

/// New Service Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub uuid: ServiceUuid,
    pub name: String,
    pub base_price: Decimal,
    pub duration_minutes: i32,
}

/// New Addon Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddon {
    pub uuid: AddonUuid,
    pub name: String,
    pub price_delta: Decimal,
}
