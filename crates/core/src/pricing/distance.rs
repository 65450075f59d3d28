//! Distance surcharge policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{coerce, money::round2};

/// A tenant's travel surcharge policy.
///
/// Distance beyond `free_radius` is billed at `surcharge_per_mile`; travel
/// inside the radius is free. Units are whatever the tenant measures
/// distances in, as long as both fields agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DistancePolicy {
    /// Distance covered at no charge.
    pub free_radius: Option<f64>,

    /// Price per unit of distance beyond the free radius.
    pub surcharge_per_mile: Option<f64>,
}

impl DistancePolicy {
    /// Build a policy from already-validated numbers.
    pub fn new(free_radius: f64, surcharge_per_mile: f64) -> Self {
        Self {
            free_radius: Some(free_radius),
            surcharge_per_mile: Some(surcharge_per_mile),
        }
    }

    /// Surcharge for travelling `distance`, rounded to two decimal places.
    ///
    /// Missing or malformed policy fields degrade to zero, so a tenant with
    /// no policy configured charges nothing. The result is never negative:
    /// a distance inside the free radius, or a nonsense distance, prices at
    /// zero.
    pub fn surcharge(&self, distance: f64) -> Decimal {
        let distance = coerce::money_or_zero(Some(distance));
        let free_radius = coerce::money_or_zero(self.free_radius);
        let per_mile = coerce::money_or_zero(self.surcharge_per_mile);

        let billable = (distance - free_radius).max(Decimal::ZERO);

        round2(billable * per_mile)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn inside_free_radius_is_free() {
        let policy = DistancePolicy::new(10.0, 2.0);

        assert_eq!(policy.surcharge(0.0), Decimal::ZERO);
        assert_eq!(policy.surcharge(9.99), Decimal::ZERO);
        assert_eq!(policy.surcharge(10.0), Decimal::ZERO);
    }

    #[test]
    fn beyond_free_radius_bills_the_excess_only() {
        let policy = DistancePolicy::new(10.0, 2.0);

        assert_eq!(policy.surcharge(10.5), Decimal::new(1_00, 2));
        assert_eq!(policy.surcharge(14.0), Decimal::new(8_00, 2));
    }

    #[test]
    fn surcharge_grows_with_distance() {
        let policy = DistancePolicy::new(5.0, 1.5);

        let near = policy.surcharge(8.0);
        let far = policy.surcharge(12.0);

        assert!(far > near, "expected {far} > {near}");
    }

    #[test]
    fn fractional_excess_rounds_to_cents() {
        let policy = DistancePolicy::new(0.0, 0.333);

        // 7 * 0.333 = 2.331
        assert_eq!(policy.surcharge(7.0), Decimal::new(2_33, 2));
    }

    #[test]
    fn unconfigured_policy_charges_nothing() {
        let policy = DistancePolicy::default();

        assert_eq!(policy.surcharge(250.0), Decimal::ZERO);
    }

    #[test]
    fn malformed_fields_degrade_to_zero() {
        let policy = DistancePolicy {
            free_radius: Some(f64::NAN),
            surcharge_per_mile: Some(2.0),
        };

        // NaN radius coerces to zero, so the whole distance is billable.
        assert_eq!(policy.surcharge(3.0), Decimal::new(6_00, 2));
        assert_eq!(policy.surcharge(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn negative_distance_never_produces_a_credit() {
        let policy = DistancePolicy::new(10.0, 2.0);

        assert_eq!(policy.surcharge(-5.0), Decimal::ZERO);
    }

    #[test]
    fn policy_deserialises_from_camel_case_json() -> TestResult {
        let policy: DistancePolicy =
            serde_json::from_str(r#"{"freeRadius": 10, "surchargePerMile": 2.5}"#)?;

        assert_eq!(policy.surcharge(12.0), Decimal::new(5_00, 2));

        Ok(())
    }
}
