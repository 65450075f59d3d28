//! Tenant Records

use jiff::{Timestamp, tz::TimeZone};
use lustre::quota::QuotaPolicy;

use crate::{domain::tenants::errors::TenantsServiceError, uuids::TypedUuid};

/// Tenant UUID
pub type TenantUuid = TypedUuid<TenantRecord>;

/// Tenant Record
#[derive(Debug, Clone)]
pub struct TenantRecord {
    /// Unique tenant identifier.
    pub uuid: TenantUuid,

    /// Human-readable business name.
    pub name: String,

    /// Plan name, display-only; the enforced limit is the column below.
    pub plan: String,

    /// IANA timezone name the tenant schedules in.
    pub timezone: String,

    /// Soft monthly booking limit, `None` for unlimited plans.
    pub monthly_booking_limit: Option<i64>,

    /// Tenant creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}

impl TenantRecord {
    /// The quota policy this tenant's plan implies.
    #[must_use]
    pub fn quota_policy(&self) -> QuotaPolicy {
        let limit = self
            .monthly_booking_limit
            .map(|limit| u32::try_from(limit).unwrap_or(u32::MAX));

        QuotaPolicy::new(limit)
    }

    /// Resolve the stored timezone name.
    ///
    /// # Errors
    ///
    /// Returns [`TenantsServiceError::UnknownTimezone`] when the name is not
    /// in the system tzdb.
    pub fn time_zone(&self) -> Result<TimeZone, TenantsServiceError> {
        if self.timezone == "UTC" {
            return Ok(TimeZone::UTC);
        }

        TimeZone::get(&self.timezone)
            .map_err(|_err| TenantsServiceError::UnknownTimezone(self.timezone.clone()))
    }
}
