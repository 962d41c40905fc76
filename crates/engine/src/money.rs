//! Amount helpers shared by the split engine and the exporters.
//!
//! Amounts are plain `f64` major units (EUR, or USD once converted). The split
//! must let degenerate input surface as NaN/∞ instead of panicking, so no
//! fixed-point type is used here; exactness is restored by the reconciliation
//! pass within [`RECONCILIATION_EPSILON`].

use crate::Currency;

/// Residual below which the reconciliation pass leaves amounts untouched.
pub const RECONCILIATION_EPSILON: f64 = 0.001;

/// Rounds to the nearest integer unit, halves going up (`2.5 -> 3`,
/// `-2.5 -> -2`).
#[must_use]
pub fn round_unit(amount: f64) -> f64 {
    // `f64::round` sends halves away from zero; pull negative halves back up.
    let rounded = amount.round();
    if rounded - amount == -0.5 { rounded + 1.0 } else { rounded }
}

/// Formats `amount` with the currency symbol and a fixed number of decimals.
///
/// ```rust
/// use engine::{Currency, money::format_money};
///
/// assert_eq!(format_money(12.5, Currency::Eur, 2), "€12.50");
/// assert_eq!(format_money(1391.0, Currency::Usd, 0), "$1391");
/// ```
#[must_use]
pub fn format_money(amount: f64, currency: Currency, decimals: usize) -> String {
    format!("{}{amount:.decimals$}", currency.symbol())
}

/// Formats a EUR amount with two decimals.
#[must_use]
pub fn eur(amount: f64) -> String {
    format_money(amount, Currency::Eur, usize::from(Currency::Eur.minor_units()))
}

/// Returns `true` when both amounts agree within [`RECONCILIATION_EPSILON`].
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= RECONCILIATION_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_unit_rounds_halves_up() {
        assert_eq!(round_unit(2.5), 3.0);
        assert_eq!(round_unit(2.49), 2.0);
        assert_eq!(round_unit(-2.5), -2.0);
        assert_eq!(round_unit(-2.51), -3.0);
    }

    #[test]
    fn round_unit_has_no_addition_error_below_a_half() {
        assert_eq!(round_unit(0.499_999_999_999_999_94), 0.0);
        assert_eq!(round_unit(-0.5), 0.0);
        assert_eq!(round_unit(4_503_599_627_370_497.0), 4_503_599_627_370_497.0);
    }

    #[test]
    fn eur_uses_two_decimals() {
        assert_eq!(eur(0.0), "€0.00");
        assert_eq!(eur(433.333_333), "€433.33");
        assert_eq!(eur(-5.0), "€-5.00");
    }

    #[test]
    fn non_finite_amounts_do_not_panic() {
        assert_eq!(eur(f64::NAN), "€NaN");
        assert!(!approx_eq(f64::NAN, 0.0));
    }
}
