//! Lenient numeric coercion.
//!
//! Pricing inputs arrive from payloads that historically carried numbers,
//! numeric strings, nulls or nothing at all. Every coercion rule lives here
//! so the permissive contract stays auditable in one place instead of being
//! scattered across call sites.

use rust_decimal::{Decimal, prelude::FromPrimitive};

/// Coerce a loose money-like value; missing, malformed, out-of-range or
/// negative input becomes zero.
pub fn money_or_zero(value: Option<f64>) -> Decimal {
    finite_decimal(value)
        .filter(|amount| !amount.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

/// Coerce a loose multiplier; missing, malformed, zero or negative input
/// becomes one. A zero multiplier would zero out the base price, which is
/// never what a misconfigured tier means.
pub fn multiplier_or_identity(value: Option<f64>) -> Decimal {
    finite_decimal(value)
        .filter(|multiplier| multiplier.is_sign_positive() && !multiplier.is_zero())
        .unwrap_or(Decimal::ONE)
}

/// Coerce a loose tax-rate value; missing, malformed or negative input
/// becomes zero. Values above one pass through unchanged, since the upper
/// bound belongs to [`crate::pricing::validate_pricing_inputs`].
pub fn rate_or_zero(value: Option<f64>) -> Decimal {
    money_or_zero(value)
}

fn finite_decimal(value: Option<f64>) -> Option<Decimal> {
    let value = value?;
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Serde deserialisers tolerating "number | numeric string | null".
pub mod lenient {
    use serde::{Deserialize, Deserializer, de::IgnoredAny};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LooseNumber {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    impl LooseNumber {
        fn into_f64(self) -> Option<f64> {
            match self {
                Self::Number(value) => Some(value),
                Self::Text(text) => text.trim().parse().ok(),
                Self::Other(IgnoredAny) => None,
            }
        }
    }

    /// Deserialise a field that may be a number, a numeric string, `null`
    /// or anything else; unusable input surfaces as `None` and downstream
    /// coercion picks the default.
    ///
    /// # Errors
    ///
    /// Never fails on malformed values, only on transport-level errors
    /// from the underlying deserialiser.
    pub fn number_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let loose = Option::<LooseNumber>::deserialize(deserializer)?;
        Ok(loose.and_then(LooseNumber::into_f64))
    }
}
