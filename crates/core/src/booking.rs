//! Booking lifecycle vocabulary.
//!
//! Status transitions themselves are driven by the application layer; the
//! engine only cares which statuses still occupy calendar capacity.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A status label that is not part of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status {0:?}")]
pub struct UnknownStatus(pub String);

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Accepted by intake, awaiting confirmation.
    Pending,

    /// Confirmed by the tenant.
    Confirmed,

    /// Work has started.
    InProgress,

    /// Work finished.
    Completed,

    /// Called off before it started.
    Cancelled,

    /// Customer never showed up.
    NoShow,
}

impl BookingStatus {
    /// Statuses that occupy slot capacity, in lifecycle order.
    pub const BLOCKING: [Self; 3] = [Self::Pending, Self::Confirmed, Self::InProgress];

    /// Stable lowercase label, also the storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Whether a booking in this status counts against capacity.
    pub fn blocks_capacity(self) -> bool {
        Self::BLOCKING.contains(&self)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Payment state attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No payment taken yet.
    Unpaid,

    /// Payment initiated but not settled.
    Pending,

    /// Paid in full.
    Paid,

    /// Payment returned to the customer.
    Refunded,
}

impl PaymentStatus {
    /// Stable lowercase label, also the storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
