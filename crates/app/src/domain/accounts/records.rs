//! Account Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use lustre::quota::ActorKind;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Staff UUID
pub type StaffUuid = TypedUuid<StaffRecord>;

/// Customer UUID
pub type CustomerUuid = TypedUuid<CustomerRecord>;

/// Vehicle UUID
pub type VehicleUuid = TypedUuid<VehicleRecord>;

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

/// A role string the schema does not accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown staff role {0:?}")]
pub struct UnknownRole(pub String);

/// Staff role within a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffRole {
    Admin,
    Staff,
}

impl StaffRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }

    /// The quota actor kind this role acts as.
    #[must_use]
    pub const fn actor_kind(self) -> ActorKind {
        match self {
            Self::Admin => ActorKind::Admin,
            Self::Staff => ActorKind::Staff,
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Staff Record
#[derive(Debug, Clone)]
pub struct StaffRecord {
    pub uuid: StaffUuid,
    pub name: String,
    pub role: StaffRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Customer Record
#[derive(Debug, Clone)]
pub struct CustomerRecord {
    pub uuid: CustomerUuid,
    pub name: String,
    pub email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Vehicle Record
#[derive(Debug, Clone)]
pub struct VehicleRecord {
    pub uuid: VehicleUuid,
    pub customer_uuid: CustomerUuid,

    /// Vehicle-size tier key looked up in the tenant's multiplier map.
    pub tier: String,

    pub label: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Address Record
#[derive(Debug, Clone)]
pub struct AddressRecord {
    pub uuid: AddressUuid,
    pub customer_uuid: CustomerUuid,
    pub line_one: String,

    /// Pre-measured travel distance from the tenant's base, when known.
    pub distance_miles: Option<f64>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn roles_round_trip_through_strings() -> TestResult {
        assert_eq!(StaffRole::from_str("admin")?, StaffRole::Admin);
        assert_eq!(StaffRole::from_str("staff")?, StaffRole::Staff);
        assert_eq!(StaffRole::Admin.as_str(), "admin");

        Ok(())
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_eq!(
            StaffRole::from_str("owner"),
            Err(UnknownRole("owner".to_string()))
        );
    }

    #[test]
    fn admin_role_acts_as_admin() {
        assert_eq!(StaffRole::Admin.actor_kind(), ActorKind::Admin);
        assert_eq!(StaffRole::Staff.actor_kind(), ActorKind::Staff);
    }
}
