//! Money rounding.
//!
//! Monetary figures are reported to the cent. Rounding works on the exact
//! decimal value of the binary float, so `round2(2.675)` is `2.67`: the
//! stored value is just below the tie.

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Float formatting rounds from the exact binary value.
    format!("{value:.2}").parse().unwrap_or(value)
}
