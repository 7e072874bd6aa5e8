//! Conversion between decimal rupee amounts and integer paise.
//!
//! Amounts are stored as whole paise so that summing and comparing never
//! accumulates floating point drift.

/// Convert a decimal amount in rupees to whole paise.
///
/// Rounds to the nearest paisa so that floating point artifacts from client
/// arithmetic (e.g. `0.1 + 0.2`) do not leak into storage.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Convert an amount in whole paise back to decimal rupees.
pub fn to_major_units(amount_cents: i64) -> f64 {
    amount_cents as f64 / 100.0
}

// ==============
// TESTS
// ==============
