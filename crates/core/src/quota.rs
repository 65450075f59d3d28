//! Plan-level monthly booking quotas.
//!
//! A subscription plan may cap how many bookings a tenant can take per
//! calendar month. The cap is soft for tenant-side actors: admins and
//! staff creating bookings on a customer's behalf may run past it by a
//! small grace buffer, while customer and guest intake stops dead at the
//! limit. Counting happens in the persistence layer; this module only
//! decides.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who is asking to create a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// Tenant owner or administrator.
    Admin,

    /// Tenant staff member.
    Staff,

    /// Authenticated customer of the tenant.
    Customer,

    /// Unauthenticated guest going through public intake.
    Guest,
}

/// An actor kind label that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown actor kind {0:?}")]
pub struct UnknownActorKind(pub String);

impl ActorKind {
    /// Stable lowercase label, also the storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Customer => "customer",
            Self::Guest => "guest",
        }
    }

    /// Whether this actor may run past a soft limit by the grace buffer.
    pub fn has_overage_grace(self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = UnknownActorKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            "guest" => Ok(Self::Guest),
            other => Err(UnknownActorKind(other.to_string())),
        }
    }
}

/// Extra bookings tenant-side actors may create past the plan limit.
pub const DEFAULT_STAFF_GRACE: u32 = 5;

/// A plan's monthly booking allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    monthly_limit: Option<u32>,
    staff_grace: u32,
}

impl QuotaPolicy {
    /// Policy with the default grace buffer. `None` means unlimited.
    pub fn new(monthly_limit: Option<u32>) -> Self {
        Self {
            monthly_limit,
            staff_grace: DEFAULT_STAFF_GRACE,
        }
    }

    /// Policy with an explicit grace buffer.
    pub fn with_grace(monthly_limit: Option<u32>, staff_grace: u32) -> Self {
        Self {
            monthly_limit,
            staff_grace,
        }
    }

    /// Decide whether one more booking fits under the plan this month.
    ///
    /// `current` is the number of bookings already created in the current
    /// calendar month. An exhausted decision always reports the plain plan
    /// limit, not the grace-extended one, since that is the number the
    /// tenant recognises from their plan.
    pub fn evaluate(&self, actor: ActorKind, current: u32) -> QuotaDecision {
        let Some(limit) = self.monthly_limit else {
            return QuotaDecision::Allowed;
        };

        let grace = if actor.has_overage_grace() {
            self.staff_grace
        } else {
            0
        };

        if current >= limit.saturating_add(grace) {
            QuotaDecision::Exhausted { limit, current }
        } else {
            QuotaDecision::Allowed
        }
    }
}

/// Outcome of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The booking fits under the plan.
    Allowed,

    /// The plan is used up for this month.
    Exhausted {
        /// The plan's monthly limit.
        limit: u32,
        /// Bookings already created this month.
        current: u32,
    },
}

impl QuotaDecision {
    /// Whether the booking may proceed.
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}
