//! Ancillary transactions ("activities"): loans and services settled between
//! participants on top of the accommodation split.
//!
//! Older documents call them "modules"; the shape is identical and the JSON
//! alias is accepted by [`CalculationInput`](crate::CalculationInput).
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// "from" lends money to "to".
    Loan,
    /// "from" performed a service for "to".
    ServiceProvided,
    /// "from" paid for a service consumed by "to".
    ServicePurchased,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loan => "loan",
            Self::ServiceProvided => "service_provided",
            Self::ServicePurchased => "service_purchased",
        }
    }
}

impl TryFrom<&str> for ActivityKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "loan" => Ok(Self::Loan),
            "service_provided" => Ok(Self::ServiceProvided),
            "service_purchased" => Ok(Self::ServicePurchased),
            other => Err(EngineError::InvalidActivity(format!(
                "unknown activity type: {other}"
            ))),
        }
    }
}

/// Tip attached to an activity, paid by exactly one participant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub id: String,
    pub amount: f64,
    pub from_participant_id: String,
}

impl Tip {
    pub fn new(amount: f64, from_participant_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            from_participant_id: from_participant_id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub amount: f64,
    /// Providers / lenders.
    pub from_participant_ids: Vec<String>,
    /// Recipients / borrowers.
    pub to_participant_ids: Vec<String>,
    /// Only equal splitting exists; kept so stored documents round-trip.
    #[serde(default = "default_split_equally")]
    pub split_equally: bool,
    #[serde(default)]
    pub tips: Vec<Tip>,
}

fn default_split_equally() -> bool {
    true
}

impl Activity {
    /// Builds an activity, rejecting shapes the resolver cannot divide by.
    pub fn new(
        kind: ActivityKind,
        description: &str,
        amount: f64,
        from_participant_ids: Vec<String>,
        to_participant_ids: Vec<String>,
    ) -> ResultEngine<Self> {
        let activity = Self {
            id: Uuid::new_v4().to_string(),
            kind,
            description: description.trim().to_string(),
            amount,
            from_participant_ids,
            to_participant_ids,
            split_equally: true,
            tips: Vec::new(),
        };
        if let Some(problem) = activity.problems().into_iter().next() {
            return Err(EngineError::InvalidActivity(problem));
        }
        Ok(activity)
    }

    /// Attaches a tip; the tip must be positive.
    pub fn with_tip(mut self, tip: Tip) -> ResultEngine<Self> {
        if !(tip.amount > 0.0) {
            return Err(EngineError::InvalidActivity(
                "tip amount must be greater than 0".to_string(),
            ));
        }
        self.tips.push(tip);
        Ok(self)
    }

    /// Sum of all tips attached to the activity.
    pub fn total_tips(&self) -> f64 {
        self.tips.iter().map(|tip| tip.amount).sum()
    }

    /// Share of the amount carried by each provider.
    pub fn amount_per_provider(&self) -> f64 {
        self.amount / self.from_participant_ids.len() as f64
    }

    /// Share of the amount owed by each recipient.
    pub fn amount_per_recipient(&self) -> f64 {
        self.amount / self.to_participant_ids.len() as f64
    }

    /// Structural problems, in a stable order. Empty for a well-formed activity.
    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.description.trim().is_empty() {
            problems.push("Activity description cannot be empty".to_string());
        }
        if !(self.amount > 0.0) {
            problems.push("Activity amount must be greater than 0".to_string());
        }
        if self.from_participant_ids.is_empty() {
            problems.push("Activity needs at least one provider".to_string());
        }
        if self.to_participant_ids.is_empty() {
            problems.push("Activity needs at least one recipient".to_string());
        }
        if self.tips.iter().any(|tip| !(tip.amount > 0.0)) {
            problems.push("Tip amount must be greater than 0".to_string());
        }
        problems
    }
}

/// Activity as presented to the user: participant ids replaced by names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResult {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub amount: f64,
    pub from_participants: Vec<String>,
    pub to_participants: Vec<String>,
    pub amount_per_provider: f64,
    pub amount_per_recipient: f64,
}
