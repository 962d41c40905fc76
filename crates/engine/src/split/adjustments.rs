//! Folds activities into per-participant charges and credits.
//!
//! Tips are counted twice: the tipper is charged the tip, and the tip pool is
//! also credited to the provider side (`service_provided`) or to the recipient
//! side (`service_purchased`). Stored calculations depend on these numbers, so
//! the rule is kept as is.
use crate::{Activity, ActivityKind, ActivityResult, Participant};

/// Money a participant owes (`charges`) and is owed (`credits`) from
/// activities.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Adjustment {
    pub charges: f64,
    pub credits: f64,
}

/// One adjustment per participant, in input order.
pub(crate) fn resolve(participants: &[Participant], activities: &[Activity]) -> Vec<Adjustment> {
    participants
        .iter()
        .map(|participant| {
            activities
                .iter()
                .fold(Adjustment::default(), |mut acc, activity| {
                    apply(&mut acc, &participant.id, activity);
                    acc
                })
        })
        .collect()
}

fn apply(acc: &mut Adjustment, participant_id: &str, activity: &Activity) {
    let is_provider = activity.from_participant_ids.iter().any(|id| id == participant_id);
    let is_recipient = activity.to_participant_ids.iter().any(|id| id == participant_id);
    let per_provider = activity.amount_per_provider();
    let per_recipient = activity.amount_per_recipient();

    match activity.kind {
        ActivityKind::Loan => {
            if is_recipient {
                acc.charges += per_recipient;
            }
            if is_provider {
                acc.credits += per_provider;
            }
        }
        ActivityKind::ServiceProvided => {
            if is_provider {
                acc.credits += per_provider;
                if !activity.tips.is_empty() {
                    acc.credits += activity.total_tips() / activity.from_participant_ids.len() as f64;
                }
            }
            if is_recipient {
                acc.charges += per_recipient;
            }
        }
        ActivityKind::ServicePurchased => {
            if is_provider {
                acc.credits += per_provider;
            }
            if is_recipient {
                acc.charges += per_recipient;
                if !activity.tips.is_empty() {
                    acc.credits += activity.total_tips() / activity.to_participant_ids.len() as f64;
                }
            }
        }
    }

    acc.charges += activity
        .tips
        .iter()
        .filter(|tip| tip.from_participant_id == participant_id)
        .map(|tip| tip.amount)
        .sum::<f64>();
}

/// Presentation summary of each activity, ids resolved to names. Ids that do
/// not match a participant are dropped from the name lists.
pub(crate) fn summarize(participants: &[Participant], activities: &[Activity]) -> Vec<ActivityResult> {
    let names = |ids: &[String]| -> Vec<String> {
        ids.iter()
            .filter_map(|id| participants.iter().find(|p| &p.id == id))
            .map(|p| p.name.clone())
            .collect()
    };

    activities
        .iter()
        .map(|activity| ActivityResult {
            id: activity.id.clone(),
            kind: activity.kind,
            description: activity.description.clone(),
            amount: activity.amount,
            from_participants: names(&activity.from_participant_ids),
            to_participants: names(&activity.to_participant_ids),
            amount_per_provider: activity.amount_per_provider(),
            amount_per_recipient: activity.amount_per_recipient(),
        })
        .collect()
}
