//! Scenario fixtures.
//!
//! Conformance tests describe a tenant's configuration and existing
//! bookings in YAML sets under `fixtures/` and replay them against the
//! engine. The sets double as worked examples of the input shapes.

use std::{fs, path::PathBuf};

use jiff::{Timestamp, tz::TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    booking::BookingStatus,
    pricing::{DistancePolicy, PricingInputs},
    schedule::{BookedInterval, PatternError, SlotCalendar, WeekPlan, WorkPattern},
};

/// What can go wrong loading a fixture set.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("could not read fixture {path}")]
    Io {
        /// Path the loader tried.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The fixture file is not valid YAML for the requested shape.
    #[error("could not parse fixture {path}")]
    Parse {
        /// Path the loader tried.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_norway::Error,
    },

    /// The fixture's work patterns do not form a valid week.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The fixture names a timezone the platform does not know.
    #[error("unknown timezone {0:?}")]
    Timezone(String),
}

fn load<T>(set: &str) -> Result<T, FixtureError>
where
    T: DeserializeOwned,
{
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(format!("{set}.yaml"));

    let raw = fs::read_to_string(&path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_norway::from_str(&raw).map_err(|source| FixtureError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// A scheduling scenario: a tenant's timezone, weekly patterns and the
/// bookings already on the books.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// IANA timezone the patterns run in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Weekly working patterns.
    pub patterns: Vec<WorkPattern>,

    /// Bookings already on the books.
    #[serde(default)]
    pub bookings: Vec<ScenarioBooking>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// One existing booking in a scenario.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScenarioBooking {
    /// Inclusive start of the booked interval.
    pub start: Timestamp,

    /// Exclusive end of the booked interval.
    pub end: Timestamp,

    /// Lifecycle status, confirmed unless the scenario says otherwise.
    #[serde(default = "default_status")]
    pub status: BookingStatus,
}

fn default_status() -> BookingStatus {
    BookingStatus::Confirmed
}

impl Scenario {
    /// Load `fixtures/<set>.yaml` relative to the crate root.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or does not parse as a scenario.
    pub fn from_set(set: &str) -> Result<Self, FixtureError> {
        load(set)
    }

    /// Build the slot calendar this scenario describes.
    ///
    /// # Errors
    ///
    /// Fails if the patterns do not form a valid week or the timezone is
    /// not recognised.
    pub fn calendar(&self) -> Result<SlotCalendar, FixtureError> {
        let plan = WeekPlan::from_patterns(self.patterns.iter().copied())?;

        let tz = if self.timezone == "UTC" {
            TimeZone::UTC
        } else {
            TimeZone::get(&self.timezone)
                .map_err(|_err| FixtureError::Timezone(self.timezone.clone()))?
        };

        Ok(SlotCalendar::new(plan, tz))
    }

    /// The capacity-consuming intervals, the shape the conflict guard and
    /// slot generator take. Bookings in non-blocking statuses are dropped.
    pub fn blocking(&self) -> Vec<BookedInterval> {
        self.bookings
            .iter()
            .filter(|booking| booking.status.blocks_capacity())
            .map(|booking| BookedInterval {
                uuid: Uuid::now_v7(),
                start: booking.start,
                end: booking.end,
            })
            .collect()
    }
}

/// Pricing conformance set: breakdown cases plus a distance policy table.
#[derive(Debug, Deserialize)]
pub struct PricingCases {
    /// Breakdown cases.
    pub cases: Vec<PricingCase>,

    /// Distance surcharge table.
    pub distance: DistanceCases,
}

/// One pricing input with its expected totals.
#[derive(Debug, Deserialize)]
pub struct PricingCase {
    /// Human label used in assertion messages.
    pub name: String,

    /// Loosely-typed inputs exactly as a caller would send them.
    pub inputs: PricingInputs,

    /// Expected rounded figures.
    pub expect: ExpectedTotals,
}

/// Expected tax and total for a pricing case.
#[derive(Debug, Deserialize)]
pub struct ExpectedTotals {
    /// Expected tax after rounding.
    pub tax: Decimal,

    /// Expected grand total after rounding.
    pub total: Decimal,
}

/// A distance policy with a table of distances and expected surcharges.
#[derive(Debug, Deserialize)]
pub struct DistanceCases {
    /// Policy under test.
    pub policy: DistancePolicy,

    /// Distance rows.
    pub cases: Vec<DistanceCase>,
}

/// One distance row.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DistanceCase {
    /// Distance travelled to the customer.
    pub distance: f64,

    /// Expected surcharge.
    pub surcharge: Decimal,
}

impl PricingCases {
    /// Load `fixtures/<set>.yaml` relative to the crate root.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or does not parse as a pricing set.
    pub fn from_set(set: &str) -> Result<Self, FixtureError> {
        load(set)
    }
}
