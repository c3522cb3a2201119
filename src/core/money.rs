//! Fixed-point money helpers
//!
//! Monetary values are always parsed from their textual form. A float coming
//! from a client is first formatted with its shortest round-trip
//! representation, so `29.99_f64` becomes exactly `29.99` and never
//! `29.989999999999998436805981327779591083526611328125`.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Digits kept after the decimal point for every stored amount
pub const MONEY_SCALE: u32 = 2;

/// Largest amount that fits a `NUMERIC(10, 2)` column
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_99, MONEY_SCALE)
}

/// Parse a decimal amount from text
pub fn parse_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim()).ok()
}

/// Convert a client-supplied float into an exact decimal via its string form
///
/// Returns `None` for NaN, infinities, and values outside the decimal range.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    let text = value.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Round to the stored money scale, halves away from zero
///
/// The result always carries exactly two decimal places (`30` becomes `30.00`).
pub fn to_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Exact sum of a set of prices, starting from `0.00`
pub fn sum_prices<'a>(prices: impl IntoIterator<Item = &'a Decimal>) -> Decimal {
    prices
        .into_iter()
        .fold(Decimal::new(0, MONEY_SCALE), |acc, price| acc + *price)
}
