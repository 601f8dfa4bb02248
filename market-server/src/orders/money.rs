//! Money helpers
//!
//! Monetary values travel as f64 minor units on the wire and in storage.
//! Every arithmetic step runs through `rust_decimal` and results round to
//! 2 decimal places, midpoint away from zero, so float artifacts never
//! reach a stored or displayed amount.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept by every rounding step
pub const DECIMAL_PLACES: u32 = 2;

/// Convert a wire amount into Decimal; non-finite input counts as zero
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Round to the canonical 2 dp, midpoint away from zero
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Round and convert back to the wire representation
pub fn to_f64(value: Decimal) -> f64 {
    round2(value).to_f64().unwrap_or(0.0)
}

/// price × quantity with Decimal arithmetic
pub fn line_total(unit_price: f64, quantity: i64) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}
