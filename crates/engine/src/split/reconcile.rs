//! Reconciliation and USD rounding.
//!
//! Order matters: the residual is pushed onto the last participant, then that
//! participant's final amounts are recomputed, then USD figures are rounded.
use crate::{
    BookingSettings,
    money::{RECONCILIATION_EPSILON, eur},
    split::ParticipantResult,
};

/// Forces `Σ amountEUR == totalCost` and applies USD rounding. Returns the
/// residual found before correction, even when it was too small to apply.
pub(crate) fn reconcile(results: &mut [ParticipantResult], settings: &BookingSettings) -> f64 {
    let allocated: f64 = results.iter().map(|r| r.amount_eur).sum();
    let adjustment = settings.total_cost - allocated;

    if adjustment.abs() > RECONCILIATION_EPSILON
        && let Some(last) = results.last_mut()
    {
        last.amount_eur += adjustment;
        last.refresh_amounts(settings);
        last.calculation = format!(
            "{} × {} = {}",
            last.nights,
            eur(last.effective_per_night_eur),
            eur(last.amount_eur)
        );
    }

    if settings.round_usd {
        for result in results.iter_mut() {
            result.round_usd();
        }
    }

    adjustment
}
