//! Night-occupancy table.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{BookingSettings, Participant};

/// One night of the booking window and who sleeps there.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightRecord {
    pub date: NaiveDate,
    /// Names of the participants present, in input order.
    pub present_participants: Vec<String>,
    pub participant_count: usize,
    /// `totalCost / totalNights`, identical for every night.
    pub nightly_cost: f64,
    /// `nightlyCost / participantCount`, 0 when the night is empty.
    pub per_person_cost: f64,
}

impl NightRecord {
    /// An empty night's cost is not collected from anybody.
    pub fn is_unoccupied(&self) -> bool {
        self.participant_count == 0
    }
}

/// Builds one record per night of `[start, end]`, in date order.
pub fn night_breakdown(participants: &[Participant], settings: &BookingSettings) -> Vec<NightRecord> {
    let nightly_cost = settings.total_cost / settings.total_nights() as f64;

    settings
        .nights()
        .map(|night| {
            let present_participants: Vec<String> = participants
                .iter()
                .filter(|p| p.is_present_on(night))
                .map(|p| p.name.clone())
                .collect();
            let participant_count = present_participants.len();
            let per_person_cost = if participant_count > 0 {
                nightly_cost / participant_count as f64
            } else {
                0.0
            };

            NightRecord {
                date: night,
                present_participants,
                participant_count,
                nightly_cost,
                per_person_cost,
            }
        })
        .collect()
}

/// Nights of the table during which `participant` is present.
pub(crate) fn occupied_nights(participant: &Participant, nights: &[NightRecord]) -> usize {
    nights
        .iter()
        .filter(|night| participant.is_present_on(night.date))
        .count()
}
