//! Input validation run before the split.
//!
//! Errors block the computation entirely; warnings are informational. The
//! split itself never checks its preconditions, so anything that would make it
//! divide by zero must be reported here as an error.
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Activity, BookingSettings, Participant, split::night_breakdown};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night: Option<NaiveDate>,
}

impl ValidationIssue {
    pub fn error(message: &str) -> Self {
        Self {
            severity: Severity::Error,
            message: message.to_string(),
            participant_id: None,
            activity_id: None,
            night: None,
        }
    }

    pub fn warning(message: &str) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(message)
        }
    }

    #[must_use]
    pub fn for_participant(mut self, id: &str) -> Self {
        self.participant_id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn for_activity(mut self, id: &str) -> Self {
        self.activity_id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn for_night(mut self, night: NaiveDate) -> Self {
        self.night = Some(night);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_error)
}

/// Checks the booking settings and the participant list.
///
/// A window whose end is not after its start is reported alone: nothing else
/// can be judged against it.
pub fn validate_inputs(participants: &[Participant], settings: &BookingSettings) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if settings.start_date >= settings.end_date {
        issues.push(ValidationIssue::error("Booking end date must be after start date"));
        return issues;
    }

    if !(settings.total_cost > 0.0) {
        issues.push(ValidationIssue::error("Total cost must be greater than 0"));
    }

    if !(settings.exchange_rate > 0.0) {
        issues.push(ValidationIssue::error("Exchange rate must be greater than 0"));
    }

    let window_end = settings.end_date.checked_add_days(Days::new(1));

    for participant in participants {
        if participant.name.trim().is_empty() {
            issues.push(
                ValidationIssue::error("Participant name cannot be empty")
                    .for_participant(&participant.id),
            );
        }

        if participant.arrival_date >= participant.departure_date {
            issues.push(
                ValidationIssue::error("Departure date must be after arrival date")
                    .for_participant(&participant.id),
            );
        }

        let leaves_late = window_end.is_some_and(|end| participant.departure_date > end);
        if participant.arrival_date < settings.start_date || leaves_late {
            issues.push(
                ValidationIssue::warning("Participant stay extends outside booking period")
                    .for_participant(&participant.id),
            );
        }
    }

    if !participants.is_empty() {
        for night in night_breakdown(participants, settings)
            .iter()
            .filter(|night| night.is_unoccupied())
        {
            issues.push(
                ValidationIssue::warning(&format!(
                    "Nobody is present on the night of {}; its cost is not collected",
                    night.date
                ))
                .for_night(night.date),
            );
        }
    }

    issues
}

/// Checks activities against the participant list.
///
/// Malformed activities are errors. Ids that match no participant are only
/// warned about: they are what a removed participant leaves behind.
pub fn validate_activities(participants: &[Participant], activities: &[Activity]) -> Vec<ValidationIssue> {
    let known = |id: &String| participants.iter().any(|p| &p.id == id);
    let mut issues = Vec::new();

    for activity in activities {
        for problem in activity.problems() {
            issues.push(ValidationIssue::error(&problem).for_activity(&activity.id));
        }

        let unknown = activity
            .from_participant_ids
            .iter()
            .chain(&activity.to_participant_ids)
            .any(|id| !known(id));
        if unknown {
            issues.push(
                ValidationIssue::warning("Activity references an unknown participant")
                    .for_activity(&activity.id),
            );
        }

        for tip in activity.tips.iter().filter(|tip| !known(&tip.from_participant_id)) {
            issues.push(
                ValidationIssue::warning("Tip comes from an unknown participant")
                    .for_activity(&activity.id)
                    .for_participant(&tip.from_participant_id),
            );
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityKind, Tip};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn settings() -> BookingSettings {
        BookingSettings::new(1300.0, date("2025-10-16"), date("2025-10-28"))
    }

    fn messages(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.message.as_str()).collect()
    }

    #[test]
    fn reversed_window_is_reported_alone() {
        let mut settings = settings();
        settings.end_date = settings.start_date;
        settings.total_cost = -1.0;
        let issues = validate_inputs(&[], &settings);
        assert_eq!(messages(&issues), vec!["Booking end date must be after start date"]);
    }

    #[test]
    fn non_positive_cost_is_an_error() {
        let mut settings = settings();
        settings.total_cost = 0.0;
        let issues = validate_inputs(&[], &settings);
        assert!(has_errors(&issues));
        assert_eq!(messages(&issues), vec!["Total cost must be greater than 0"]);
    }

    #[test]
    fn participant_errors_carry_the_id() {
        let mut blank = Participant::new("  ", date("2025-10-20"), date("2025-10-20"));
        blank.id = "p1".to_string();
        let issues = validate_inputs(&[blank], &settings());

        let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|i| i.participant_id.as_deref() == Some("p1")));
    }

    #[test]
    fn stay_outside_window_is_only_a_warning() {
        let early = Participant::new("Anna", date("2025-10-15"), date("2025-10-29"));
        let issues = validate_inputs(&[early], &settings());
        assert!(!has_errors(&issues));
        assert_eq!(messages(&issues), vec!["Participant stay extends outside booking period"]);
    }

    #[test]
    fn departing_the_morning_after_the_last_night_is_inside() {
        let full = Participant::new("Jane", date("2025-10-16"), date("2025-10-29"));
        assert!(validate_inputs(&[full], &settings()).is_empty());
    }

    #[test]
    fn empty_nights_are_warned_about() {
        let short = Participant::new("Hanami", date("2025-10-16"), date("2025-10-28"));
        let issues = validate_inputs(&[short], &settings());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].night, Some(date("2025-10-28")));
    }

    #[test]
    fn activities_with_unknown_people_are_warned_about() {
        let anna = Participant::new("Anna", date("2025-10-16"), date("2025-10-29"));
        let loan = Activity::new(
            ActivityKind::Loan,
            "Taxi",
            30.0,
            vec![anna.id.clone()],
            vec!["ghost".to_string()],
        )
        .unwrap()
        .with_tip(Tip::new(2.0, "nobody"))
        .unwrap();

        let issues = validate_activities(&[anna], &[loan]);
        assert!(!has_errors(&issues));
        assert_eq!(
            messages(&issues),
            vec![
                "Activity references an unknown participant",
                "Tip comes from an unknown participant"
            ]
        );
    }

    #[test]
    fn malformed_activity_reports_every_problem() {
        let mut activity = Activity::new(
            ActivityKind::Loan,
            "Taxi",
            30.0,
            vec!["a".to_string()],
            vec!["a".to_string()],
        )
        .unwrap();
        activity.from_participant_ids.clear();
        activity.amount = 0.0;
        let a = Participant {
            id: "a".to_string(),
            ..Participant::new("A", date("2025-10-16"), date("2025-10-17"))
        };

        let issues = validate_activities(&[a], &[activity]);
        assert_eq!(
            messages(&issues),
            vec!["Activity amount must be greater than 0", "Activity needs at least one provider"]
        );
    }
}
