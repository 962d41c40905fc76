//! The cost-split engine.
//!
//! [`calculate_cost_split`] is a pure function: the same participants,
//! settings and activities always give the same [`CalculationResult`]. It runs
//! four stages in a fixed order:
//!
//! 1. occupancy table ([`night_breakdown`]),
//! 2. base allocation per calculation method,
//! 3. activity charges and credits,
//! 4. reconciliation to `totalCost` and USD rounding.
//!
//! Use [`CalculationInput::evaluate`] to get the validate-then-compute
//! behaviour: when validation reports an error the engine is not run and an
//! empty result is returned.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Activity, ActivityResult, BookingSettings, Participant,
    money::round_unit,
    validation::{self, ValidationIssue},
};

pub use occupancy::{NightRecord, night_breakdown};

mod adjustments;
mod allocation;
mod occupancy;
mod reconcile;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResult {
    pub id: String,
    pub name: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub nights: i64,
    #[serde(rename = "amountEUR")]
    pub amount_eur: f64,
    #[serde(rename = "amountUSD")]
    pub amount_usd: f64,
    #[serde(rename = "effectivePerNightEUR")]
    pub effective_per_night_eur: f64,
    #[serde(rename = "effectivePerNightUSD")]
    pub effective_per_night_usd: f64,
    pub calculation: String,
    /// Owed because of loans taken and services received.
    pub additional_charges: f64,
    /// Owed back because of loans given and services provided.
    pub additional_credits: f64,
    #[serde(rename = "finalAmountEUR")]
    pub final_amount_eur: f64,
    #[serde(rename = "finalAmountUSD")]
    pub final_amount_usd: f64,
}

impl ParticipantResult {
    /// Recomputes every figure derived from `amount_eur` and the adjustments.
    pub(crate) fn refresh_amounts(&mut self, settings: &BookingSettings) {
        self.amount_usd = settings.to_usd(self.amount_eur);
        self.effective_per_night_eur = allocation::per_unit(self.amount_eur, self.nights);
        self.effective_per_night_usd = allocation::per_unit(self.amount_usd, self.nights);
        self.final_amount_eur = self.amount_eur + self.additional_charges - self.additional_credits;
        self.final_amount_usd = settings.to_usd(self.final_amount_eur);
    }

    /// Rounds the USD figures to whole units; EUR stays exact.
    pub(crate) fn round_usd(&mut self) {
        self.amount_usd = round_unit(self.amount_usd);
        self.final_amount_usd = round_unit(self.final_amount_usd);
        self.effective_per_night_usd = allocation::per_unit(self.amount_usd, self.nights);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub participants: Vec<ParticipantResult>,
    pub night_breakdown: Vec<NightRecord>,
    pub total_nights: usize,
    pub rounding_adjustment: f64,
    pub additional_activities: Vec<ActivityResult>,
}

impl CalculationResult {
    /// Zeroed result shown in place of a computation blocked by validation.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn participant(&self, id: &str) -> Option<&ParticipantResult> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Sum of base amounts; equals `totalCost` after reconciliation.
    pub fn total_amount_eur(&self) -> f64 {
        self.participants.iter().map(|p| p.amount_eur).sum()
    }

    /// Nights of the window nobody occupies; their cost is not collected.
    pub fn unoccupied_nights(&self) -> Vec<NaiveDate> {
        self.night_breakdown
            .iter()
            .filter(|night| night.is_unoccupied())
            .map(|night| night.date)
            .collect()
    }
}

/// Splits the booking cost. See the module docs for the stages.
pub fn calculate_cost_split(
    participants: &[Participant],
    settings: &BookingSettings,
    activities: &[Activity],
) -> CalculationResult {
    let nights = night_breakdown(participants, settings);
    let shares = allocation::allocate(participants, settings, &nights);
    let adjustments = adjustments::resolve(participants, activities);

    let mut results: Vec<ParticipantResult> = participants
        .iter()
        .zip(shares)
        .zip(adjustments)
        .map(|((participant, share), adjustment)| {
            let mut result = ParticipantResult {
                id: participant.id.clone(),
                name: participant.name.clone(),
                arrival_date: participant.arrival_date,
                departure_date: participant.departure_date,
                nights: participant.nights(),
                amount_eur: share.amount_eur,
                amount_usd: 0.0,
                effective_per_night_eur: 0.0,
                effective_per_night_usd: 0.0,
                calculation: share.describe(),
                additional_charges: adjustment.charges,
                additional_credits: adjustment.credits,
                final_amount_eur: 0.0,
                final_amount_usd: 0.0,
            };
            result.refresh_amounts(settings);
            result
        })
        .collect();

    let rounding_adjustment = reconcile::reconcile(&mut results, settings);

    CalculationResult {
        participants: results,
        total_nights: nights.len(),
        night_breakdown: nights,
        rounding_adjustment,
        additional_activities: adjustments::summarize(participants, activities),
    }
}

/// Everything the engine is invoked on: one snapshot of the user's state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    pub participants: Vec<Participant>,
    pub settings: BookingSettings,
    #[serde(default, alias = "additionalModules")]
    pub additional_activities: Vec<Activity>,
}

/// Validation issues together with the result they allowed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub issues: Vec<ValidationIssue>,
    pub result: CalculationResult,
}

impl Evaluation {
    pub fn has_errors(&self) -> bool {
        validation::has_errors(&self.issues)
    }
}

impl CalculationInput {
    pub fn new(
        participants: Vec<Participant>,
        settings: BookingSettings,
        additional_activities: Vec<Activity>,
    ) -> Self {
        Self {
            participants,
            settings,
            additional_activities,
        }
    }

    /// Every validation issue for this snapshot, settings and participants
    /// first, then activities.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = validation::validate_inputs(&self.participants, &self.settings);
        issues.extend(validation::validate_activities(
            &self.participants,
            &self.additional_activities,
        ));
        issues
    }

    /// Runs the engine on this snapshot.
    pub fn calculate(&self) -> CalculationResult {
        calculate_cost_split(&self.participants, &self.settings, &self.additional_activities)
    }

    /// Validates, then computes only if no error was found.
    pub fn evaluate(&self) -> Evaluation {
        let issues = self.validate();
        let result = if validation::has_errors(&issues) {
            CalculationResult::empty()
        } else {
            self.calculate()
        };
        Evaluation { issues, result }
    }
}
