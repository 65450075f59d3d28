//! Tenant Data

use crate::domain::tenants::records::TenantUuid;

/// New Tenant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    /// UUID to assign to the tenant row.
    pub uuid: TenantUuid,

    /// Business name to persist.
    pub name: String,

    /// Plan name, display-only.
    pub plan: String,

    /// IANA timezone name the tenant schedules in.
    pub timezone: String,

    /// Soft monthly booking limit, `None` for unlimited.
    pub monthly_booking_limit: Option<i64>,
}
