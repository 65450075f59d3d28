//! Strict validation at the pricing boundary.
//!
//! Reads tolerate anything (see [`crate::coerce`]); writes and untrusted
//! callers do not. A configuration an administrator saves must satisfy every
//! rule in [`PricingConfig::validate`], and inputs arriving from outside go
//! through [`validate_pricing_inputs`] first. Both report the complete list
//! of violations rather than the first one found.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::{PricingInputs, distance::DistancePolicy};

/// A tenant's full pricing configuration as submitted for storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingConfig {
    /// Service base price before any adjustment.
    pub base_price: f64,

    /// Vehicle-size multipliers keyed by tier name.
    pub vehicle_multipliers: FxHashMap<String, f64>,

    /// Tax rate as a fraction in `[0, 1]`.
    pub tax_rate: f64,

    /// Travel surcharge policy, stored flat alongside the other fields.
    #[serde(flatten)]
    pub distance: DistancePolicy,
}

/// A rule a pricing configuration broke.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingRule {
    /// Base prices cannot be negative, infinite or not-a-number.
    #[error("base price must be a non-negative number, got {0}")]
    NonNegativeBasePrice(f64),

    /// Every configured multiplier must scale a price by a real, positive
    /// factor.
    #[error("vehicle multiplier {tier:?} must be a positive number, got {value}")]
    PositiveVehicleMultiplier {
        /// Tier the offending multiplier was configured for.
        tier: String,
        /// The offending multiplier.
        value: f64,
    },

    /// Tax is a fraction of the subtotal, never a markup beyond it.
    #[error("tax rate must be between 0 and 1 inclusive, got {0}")]
    TaxRateWithinBounds(f64),

    /// A free radius, when configured, cannot be negative.
    #[error("free radius must be a non-negative number, got {0}")]
    NonNegativeFreeRadius(f64),

    /// A per-distance surcharge, when configured, cannot be negative.
    #[error("distance surcharge must be a non-negative number, got {0}")]
    NonNegativeSurcharge(f64),
}

/// Rejection carrying every rule the configuration broke.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("pricing configuration rejected: {}", describe(.violations))]
pub struct InvalidPricingConfig {
    /// Broken rules in field order, multipliers sorted by tier name.
    pub violations: SmallVec<[PricingRule; 2]>,
}

/// A rule a caller-supplied pricing input broke.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputRule {
    /// Base prices cannot be negative, infinite or not-a-number.
    #[error("basePrice must be a non-negative number, got {0}")]
    NonNegativeBasePrice(f64),

    /// A multiplier must scale a price by a real, positive factor.
    #[error("vehicleMultiplier must be a positive number, got {0}")]
    PositiveVehicleMultiplier(f64),

    /// Add-on totals are sums of prices and cannot be negative.
    #[error("addonsTotal must be a non-negative number, got {0}")]
    NonNegativeAddonsTotal(f64),

    /// A travel surcharge never credits the customer.
    #[error("distanceSurcharge must be a non-negative number, got {0}")]
    NonNegativeDistanceSurcharge(f64),

    /// Tax is a fraction of the subtotal, never a markup beyond it.
    #[error("taxRate must be between 0 and 1 inclusive, got {0}")]
    TaxRateWithinBounds(f64),
}

/// Rejection carrying every rule the supplied inputs broke.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("pricing inputs rejected: {}", describe(.violations))]
pub struct InvalidPricingInputs {
    /// Broken rules in field order.
    pub violations: SmallVec<[InputRule; 2]>,
}

fn describe<T: ToString>(violations: &[T]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

impl PricingConfig {
    /// Check every rule and accumulate the violations.
    ///
    /// Absent distance fields are legal, a tenant without mobile service
    /// simply has no surcharge policy. An empty multiplier map is legal
    /// too; lookups against it resolve to the identity multiplier.
    ///
    /// # Errors
    ///
    /// Fails with the complete list of broken rules, never just the first.
    pub fn validate(&self) -> Result<(), InvalidPricingConfig> {
        let mut violations = SmallVec::new();

        if !non_negative(self.base_price) {
            violations.push(PricingRule::NonNegativeBasePrice(self.base_price));
        }

        let mut tiers: Vec<_> = self.vehicle_multipliers.iter().collect();
        tiers.sort_unstable_by(|a, b| a.0.cmp(b.0));

        for (tier, &value) in tiers {
            if !positive(value) {
                violations.push(PricingRule::PositiveVehicleMultiplier {
                    tier: tier.clone(),
                    value,
                });
            }
        }

        if !unit_interval(self.tax_rate) {
            violations.push(PricingRule::TaxRateWithinBounds(self.tax_rate));
        }

        if let Some(radius) = self.distance.free_radius {
            if !non_negative(radius) {
                violations.push(PricingRule::NonNegativeFreeRadius(radius));
            }
        }

        if let Some(rate) = self.distance.surcharge_per_mile {
            if !non_negative(rate) {
                violations.push(PricingRule::NonNegativeSurcharge(rate));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(InvalidPricingConfig { violations })
        }
    }
}

/// Boundary validation for loose inputs from untrusted callers.
///
/// Distinct from the calculator's coercion: the calculator silently degrades
/// whatever it is handed, while this names what was wrong so the caller can
/// fix all of it at once. A partial input is legal, absent fields are not
/// checked.
///
/// # Errors
///
/// Fails with the complete list of broken rules, never just the first.
pub fn validate_pricing_inputs(inputs: &PricingInputs) -> Result<(), InvalidPricingInputs> {
    let mut violations = SmallVec::new();

    if let Some(base) = inputs.base_price {
        if !non_negative(base) {
            violations.push(InputRule::NonNegativeBasePrice(base));
        }
    }

    if let Some(multiplier) = inputs.vehicle_multiplier {
        if !positive(multiplier) {
            violations.push(InputRule::PositiveVehicleMultiplier(multiplier));
        }
    }

    if let Some(addons) = inputs.addons_total {
        if !non_negative(addons) {
            violations.push(InputRule::NonNegativeAddonsTotal(addons));
        }
    }

    if let Some(surcharge) = inputs.distance_surcharge {
        if !non_negative(surcharge) {
            violations.push(InputRule::NonNegativeDistanceSurcharge(surcharge));
        }
    }

    if let Some(rate) = inputs.tax_rate {
        if !unit_interval(rate) {
            violations.push(InputRule::TaxRateWithinBounds(rate));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(InvalidPricingInputs { violations })
    }
}
