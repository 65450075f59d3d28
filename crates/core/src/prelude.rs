//! Lustre prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    booking::{BookingStatus, PaymentStatus, UnknownStatus},
    fixtures::{FixtureError, PricingCases, Scenario},
    money::round2,
    pricing::{
        AddonPrice, InputRule, InvalidPricingConfig, InvalidPricingInputs, PriceBreakdown,
        PricingConfig, PricingInputs, PricingRule, addons_total, compute_price_breakdown,
        distance::DistancePolicy, validate_pricing_inputs, vehicle_multiplier,
    },
    quota::{ActorKind, DEFAULT_STAFF_GRACE, QuotaDecision, QuotaPolicy},
    schedule::{
        conflict::{BookedInterval, ConflictOutcome, check_capacity},
        pattern::{PatternError, WeekPlan, WorkPattern},
        slots::{ScheduleError, Slot, SlotCalendar},
    },
};
