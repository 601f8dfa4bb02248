//! Pricing Engine
//!
//! Computes order totals from resolved snapshot prices: the subtotal over
//! all lines and their modifiers, a flat delivery fee, a flat tax rate on
//! the subtotal, and the grand total as their sum.

use super::money::{round2, to_decimal, to_f64};
use rust_decimal::Decimal;

/// One resolved cart line feeding the total computation
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub unit_price: f64,
    pub quantity: i64,
    pub modifiers: Vec<PricedModifier>,
}

/// One resolved modifier on a line
#[derive(Debug, Clone)]
pub struct PricedModifier {
    pub unit_price: f64,
    pub quantity: i64,
}

/// Order totals in minor units, each rounded to 2 dp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
}

/// Compute subtotal, delivery fee, tax and total for a resolved cart.
///
/// subtotal = Σ lines (price × qty + Σ modifiers price × qty);
/// tax = tax_rate × subtotal. The total is summed from the already
/// rounded parts, so `total == subtotal + delivery_fee + tax` holds on
/// the wire.
pub fn compute_totals(lines: &[PricedLine], delivery_fee: f64, tax_rate: f64) -> Totals {
    let mut subtotal = Decimal::ZERO;
    for line in lines {
        let mut line_sum = to_decimal(line.unit_price) * Decimal::from(line.quantity);
        for modifier in &line.modifiers {
            line_sum += to_decimal(modifier.unit_price) * Decimal::from(modifier.quantity);
        }
        subtotal += line_sum;
    }
    let subtotal = round2(subtotal);
    let fee = round2(to_decimal(delivery_fee));
    let tax = round2(subtotal * to_decimal(tax_rate));
    let total = subtotal + fee + tax;

    Totals {
        subtotal: to_f64(subtotal),
        delivery_fee: to_f64(fee),
        tax: to_f64(tax),
        total: to_f64(total),
    }
}
