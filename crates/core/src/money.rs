//! Money rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to two decimal places, half away from zero.
///
/// This matches `round(x * 100) / 100` under standard floating-point
/// `round` semantics (not banker's rounding). Every money figure in a
/// breakdown is rounded with this at the point it is computed and never
/// re-derived from `total` downward.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
