//! Base cost allocation: distributes `totalCost` according to the configured
//! [`CalculationMethod`].
//!
//! Preconditions (non-empty participant list, positive night totals) are the
//! validator's job. Here a zero denominator yields NaN/∞ shares.
use crate::{
    BookingSettings, CalculationMethod, Participant,
    money::eur,
    split::occupancy::{NightRecord, occupied_nights},
};

/// What a base share was computed from. Drives the human-readable string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ShareBasis {
    EvenSplit,
    Nights { nights: i64 },
    Weeks { weeks: i64 },
    /// Sum of per-night shares over the nights present (mixed, flagged).
    Occupancy { nights: usize },
    /// Fraction of all occupied night slots (mixed, everybody flagged).
    OccupancyShare { nights: usize, total: usize },
    /// Even split of what flagged participants left over (mixed, unflagged).
    Remainder,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BaseShare {
    pub amount_eur: f64,
    pub basis: ShareBasis,
}

impl BaseShare {
    fn new(amount_eur: f64, basis: ShareBasis) -> Self {
        Self { amount_eur, basis }
    }

    /// Calculation string shown next to the amount.
    pub fn describe(&self) -> String {
        let amount = self.amount_eur;
        match self.basis {
            ShareBasis::EvenSplit => format!("Even split: {}", eur(amount)),
            ShareBasis::Nights { nights } => format!(
                "{nights} nights × {} = {}",
                eur(per_unit(amount, nights)),
                eur(amount)
            ),
            ShareBasis::Weeks { weeks } => format!(
                "{weeks} week{} × {} = {}",
                if weeks == 1 { "" } else { "s" },
                eur(per_unit(amount, weeks)),
                eur(amount)
            ),
            ShareBasis::Occupancy { nights } => {
                format!("{nights} nights at occupancy rate = {}", eur(amount))
            }
            ShareBasis::OccupancyShare { nights, total } => {
                format!("{nights} of {total} occupied nights = {}", eur(amount))
            }
            ShareBasis::Remainder => format!("Even split of remainder: {}", eur(amount)),
        }
    }
}

/// `amount / units`, or 0 when there are no units.
pub(crate) fn per_unit(amount: f64, units: i64) -> f64 {
    if units > 0 { amount / units as f64 } else { 0.0 }
}

/// Whole weeks billed for a stay, rounded up (8 nights -> 2 weeks).
pub(crate) fn weeks_for(nights: i64) -> i64 {
    (nights as f64 / 7.0).ceil() as i64
}

/// One base share per participant, in input order.
pub(crate) fn allocate(
    participants: &[Participant],
    settings: &BookingSettings,
    nights: &[NightRecord],
) -> Vec<BaseShare> {
    let total_cost = settings.total_cost;

    match settings.calculation_method {
        CalculationMethod::Equal => {
            let share = total_cost / participants.len() as f64;
            participants
                .iter()
                .map(|_| BaseShare::new(share, ShareBasis::EvenSplit))
                .collect()
        }
        CalculationMethod::Nightly => {
            let total_nights: i64 = participants.iter().map(Participant::nights).sum();
            participants
                .iter()
                .map(|p| {
                    let nights = p.nights();
                    let amount = (nights as f64 / total_nights as f64) * total_cost;
                    BaseShare::new(amount, ShareBasis::Nights { nights })
                })
                .collect()
        }
        CalculationMethod::Weekly => {
            let total_weeks: i64 = participants.iter().map(|p| weeks_for(p.nights())).sum();
            participants
                .iter()
                .map(|p| {
                    let weeks = weeks_for(p.nights());
                    let amount = (weeks as f64 / total_weeks as f64) * total_cost;
                    BaseShare::new(amount, ShareBasis::Weeks { weeks })
                })
                .collect()
        }
        CalculationMethod::Mixed => allocate_mixed(participants, total_cost, nights),
    }
}

fn allocate_mixed(participants: &[Participant], total_cost: f64, nights: &[NightRecord]) -> Vec<BaseShare> {
    let flagged = participants.iter().filter(|p| p.use_nightly_rate).count();

    // Everybody flagged: summing per-night shares would favour early joiners,
    // so bill by share of all occupied night slots instead.
    if !participants.is_empty() && flagged == participants.len() {
        let occupied: Vec<usize> = participants
            .iter()
            .map(|p| occupied_nights(p, nights))
            .collect();
        let total: usize = occupied.iter().sum();
        return occupied
            .into_iter()
            .map(|n| {
                let amount = (n as f64 / total as f64) * total_cost;
                BaseShare::new(amount, ShareBasis::OccupancyShare { nights: n, total })
            })
            .collect();
    }

    let shares: Vec<Option<BaseShare>> = participants
        .iter()
        .map(|p| {
            p.use_nightly_rate.then(|| {
                let (amount, count) = nights
                    .iter()
                    .filter(|night| p.is_present_on(night.date))
                    .fold((0.0, 0), |(amount, count), night| {
                        (amount + night.per_person_cost, count + 1)
                    });
                BaseShare::new(amount, ShareBasis::Occupancy { nights: count })
            })
        })
        .collect();

    let billed: f64 = shares.iter().flatten().map(|s| s.amount_eur).sum();
    let remainder = (total_cost - billed) / (participants.len() - flagged) as f64;

    shares
        .into_iter()
        .map(|share| share.unwrap_or_else(|| BaseShare::new(remainder, ShareBasis::Remainder)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::split::occupancy::night_breakdown;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn amounts(shares: &[BaseShare]) -> Vec<f64> {
        shares.iter().map(|s| s.amount_eur).collect()
    }

    fn assert_amounts(shares: &[BaseShare], expected: &[f64]) {
        assert_eq!(shares.len(), expected.len());
        for (share, want) in shares.iter().zip(expected) {
            assert!((share.amount_eur - want).abs() < 1e-9, "{} != {want}", share.amount_eur);
        }
    }

    fn run(participants: &[Participant], settings: &BookingSettings) -> Vec<BaseShare> {
        let nights = night_breakdown(participants, settings);
        allocate(participants, settings, &nights)
    }

    fn two_guests() -> Vec<Participant> {
        vec![
            Participant::new("A", date("2025-10-16"), date("2025-10-20")),
            Participant::new("B", date("2025-10-18"), date("2025-10-20")),
        ]
    }

    #[test]
    fn equal_ignores_stay_length() {
        let settings = BookingSettings::new(400.0, date("2025-10-16"), date("2025-10-19"));
        assert_eq!(amounts(&run(&two_guests(), &settings)), vec![200.0, 200.0]);
    }

    #[test]
    fn nightly_is_proportional_to_nights() {
        let settings = BookingSettings::new(600.0, date("2025-10-16"), date("2025-10-19"))
            .with_method(CalculationMethod::Nightly);
        let shares = run(&two_guests(), &settings);
        assert_amounts(&shares, &[400.0, 200.0]);
        assert_eq!(shares[0].describe(), "4 nights × €100.00 = €400.00");
    }

    #[test]
    fn weekly_rounds_up_to_whole_weeks() {
        assert_eq!(weeks_for(8), 2);
        assert_eq!(weeks_for(7), 1);
        assert_eq!(weeks_for(1), 1);

        let participants = vec![
            Participant::new("A", date("2025-10-01"), date("2025-10-09")),
            Participant::new("B", date("2025-10-01"), date("2025-10-03")),
        ];
        let settings = BookingSettings::new(300.0, date("2025-10-01"), date("2025-10-08"))
            .with_method(CalculationMethod::Weekly);
        let shares = run(&participants, &settings);
        assert_amounts(&shares, &[200.0, 100.0]);
        assert_eq!(shares[0].describe(), "2 weeks × €100.00 = €200.00");
        assert_eq!(shares[1].describe(), "1 week × €100.00 = €100.00");
    }

    #[test]
    fn mixed_bills_flagged_by_occupancy_and_splits_the_rest() {
        let participants = vec![
            Participant::new("A", date("2025-10-16"), date("2025-10-20")),
            Participant::new("B", date("2025-10-18"), date("2025-10-20")).with_nightly_rate(true),
        ];
        let settings = BookingSettings::new(400.0, date("2025-10-16"), date("2025-10-19"))
            .with_method(CalculationMethod::Mixed);
        let shares = run(&participants, &settings);

        assert_eq!(amounts(&shares), vec![300.0, 100.0]);
        assert_eq!(shares[0].basis, ShareBasis::Remainder);
        assert_eq!(shares[1].basis, ShareBasis::Occupancy { nights: 2 });
    }

    #[test]
    fn mixed_with_everybody_flagged_uses_occupied_slots() {
        let participants: Vec<Participant> = two_guests()
            .into_iter()
            .map(|p| p.with_nightly_rate(true))
            .collect();
        let settings = BookingSettings::new(400.0, date("2025-10-16"), date("2025-10-19"))
            .with_method(CalculationMethod::Mixed);
        let shares = run(&participants, &settings);

        // Per-night sums would give 300 / 100; slot shares give 4/6 and 2/6.
        assert!((shares[0].amount_eur - 266.666_666).abs() < 1e-4);
        assert!((shares[1].amount_eur - 133.333_333).abs() < 1e-4);
        assert_eq!(shares[1].describe(), "2 of 6 occupied nights = €133.33");
    }

    #[test]
    fn mixed_without_flags_is_an_even_split() {
        let settings = BookingSettings::new(400.0, date("2025-10-16"), date("2025-10-19"))
            .with_method(CalculationMethod::Mixed);
        assert_eq!(amounts(&run(&two_guests(), &settings)), vec![200.0, 200.0]);
    }

    #[test]
    fn zero_denominators_propagate_as_non_finite() {
        let settings = BookingSettings::new(400.0, date("2025-10-16"), date("2025-10-19"))
            .with_method(CalculationMethod::Nightly);
        let frozen = vec![Participant::new("A", date("2025-10-16"), date("2025-10-16"))];
        assert!(run(&frozen, &settings)[0].amount_eur.is_nan());
    }
}
