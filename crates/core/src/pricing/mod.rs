//! Price breakdowns.
//!
//! Deterministic pricing for quotes and bookings: a service base price
//! scaled by a vehicle-size multiplier, plus add-on deltas and a travel
//! surcharge, taxed and rounded once at the point of computation. Quote
//! previews, booking intake and the admin tooling all call
//! [`compute_price_breakdown`], so every call site produces an identical
//! monetary snapshot for identical input.

pub mod distance;
pub mod validate;

pub use distance::DistancePolicy;
pub use validate::{
    InputRule, InvalidPricingConfig, InvalidPricingInputs, PricingConfig, PricingRule,
    validate_pricing_inputs,
};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    coerce::{self, lenient},
    money::round2,
};

/// Loosely-typed pricing inputs as supplied by callers.
///
/// Each field tolerates a JSON number, a numeric string, `null` or
/// omission; unusable values degrade to the coercion defaults documented on
/// [`compute_price_breakdown`] rather than erroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingInputs {
    /// Service base price before any adjustment.
    #[serde(deserialize_with = "lenient::number_opt")]
    pub base_price: Option<f64>,

    /// Vehicle-size multiplier applied to the base price.
    #[serde(deserialize_with = "lenient::number_opt")]
    pub vehicle_multiplier: Option<f64>,

    /// Sum of selected add-on price deltas.
    #[serde(deserialize_with = "lenient::number_opt")]
    pub addons_total: Option<f64>,

    /// Travel surcharge already computed from the distance policy.
    #[serde(deserialize_with = "lenient::number_opt")]
    pub distance_surcharge: Option<f64>,

    /// Tax rate as a fraction in `[0, 1]`.
    #[serde(deserialize_with = "lenient::number_opt")]
    pub tax_rate: Option<f64>,
}

/// The itemised, immutable monetary snapshot attached to a booking at
/// creation time. Stored verbatim and never recomputed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Service base price after coercion.
    pub base: Decimal,

    /// Vehicle-size multiplier after coercion (defaults to one).
    pub vehicle_multiplier: Decimal,

    /// Add-on total after coercion.
    pub addons: Decimal,

    /// Distance surcharge after coercion.
    pub distance_surcharge: Decimal,

    /// Tax rate after coercion.
    pub tax_rate: Decimal,

    /// Tax on the subtotal, rounded to two decimal places.
    pub tax: Decimal,

    /// Grand total, rounded to two decimal places.
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Pre-tax sum this breakdown was computed from.
    pub fn subtotal(&self) -> Decimal {
        self.base * self.vehicle_multiplier + self.addons + self.distance_surcharge
    }
}

/// Compute a full price breakdown from loosely-typed inputs.
///
/// Coercion contract (relied upon by callers passing loosely-typed data):
/// money fields and the tax rate clamp missing, malformed or negative
/// values to zero; the multiplier clamps them to one. The function never
/// fails and never produces a negative field.
pub fn compute_price_breakdown(inputs: PricingInputs) -> PriceBreakdown {
    let base = coerce::money_or_zero(inputs.base_price);
    let vehicle_multiplier = coerce::multiplier_or_identity(inputs.vehicle_multiplier);
    let addons = coerce::money_or_zero(inputs.addons_total);
    let distance_surcharge = coerce::money_or_zero(inputs.distance_surcharge);
    let tax_rate = coerce::rate_or_zero(inputs.tax_rate);

    let subtotal = base * vehicle_multiplier + addons + distance_surcharge;
    let tax = round2(Percentage::from(tax_rate) * subtotal);
    let total = round2(subtotal + tax);

    PriceBreakdown {
        base,
        vehicle_multiplier,
        addons,
        distance_surcharge,
        tax_rate,
        tax,
        total,
    }
}

/// Resolve a vehicle-size multiplier from a tenant's tier map.
///
/// Exact, case-sensitive lookup with no key normalisation; an empty or
/// unknown tier resolves to `1` so an unconfigured vehicle never distorts a
/// price.
pub fn vehicle_multiplier(tier: &str, tiers: &FxHashMap<String, f64>) -> f64 {
    if tier.is_empty() {
        return 1.0;
    }

    tiers.get(tier).copied().unwrap_or(1.0)
}

/// Per-add-on price delta as read from a tenant's catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct AddonPrice {
    /// Amount this add-on adds to the service price.
    #[serde(default, deserialize_with = "lenient::number_opt")]
    pub price_delta: Option<f64>,
}

/// Sum add-on price deltas, counting malformed entries as zero.
///
/// Partial data degrades gracefully: an empty list, or entries whose delta
/// is missing or unusable, contribute nothing rather than erroring.
pub fn addons_total(addons: &[AddonPrice]) -> Decimal {
    addons
        .iter()
        .map(|addon| coerce::money_or_zero(addon.price_delta))
        .sum()
}
