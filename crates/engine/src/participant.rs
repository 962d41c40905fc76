//! The module contains the `Participant` type: one person sharing the booking.
//!
//! Dates follow the check-in/check-out convention: a participant arriving on
//! Oct 23 and departing on Oct 25 stays the nights of Oct 23 and Oct 24.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    /// Bill this participant by occupancy under the `mixed` method.
    #[serde(default)]
    pub use_nightly_rate: bool,
}

impl Participant {
    /// Creates a participant with a fresh random id.
    pub fn new(name: &str, arrival_date: NaiveDate, departure_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            arrival_date,
            departure_date,
            use_nightly_rate: false,
        }
    }

    /// Builder-style toggle for the per-participant nightly rate.
    #[must_use]
    pub fn with_nightly_rate(mut self, enabled: bool) -> Self {
        self.use_nightly_rate = enabled;
        self
    }

    /// Number of nights stayed: `departure - arrival` in days.
    ///
    /// Negative or zero for invalid stays; callers validate before relying on it.
    pub fn nights(&self) -> i64 {
        (self.departure_date - self.arrival_date).num_days()
    }

    /// Whether the participant sleeps there on the night starting at `night`.
    pub fn is_present_on(&self, night: NaiveDate) -> bool {
        self.arrival_date <= night && night < self.departure_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn departure_day_is_not_a_night() {
        let p = Participant::new("Sho", date("2025-10-23"), date("2025-10-25"));
        assert_eq!(p.nights(), 2);
        assert!(!p.is_present_on(date("2025-10-22")));
        assert!(p.is_present_on(date("2025-10-23")));
        assert!(p.is_present_on(date("2025-10-24")));
        assert!(!p.is_present_on(date("2025-10-25")));
    }

    #[test]
    fn nightly_rate_flag_defaults_to_false_in_json() {
        let json = r#"{"id":"1","name":"Anna","arrivalDate":"2025-10-16","departureDate":"2025-10-26"}"#;
        let p: Participant = serde_json::from_str(json).unwrap();
        assert!(!p.use_nightly_rate);
        assert_eq!(p.nights(), 10);
    }
}
