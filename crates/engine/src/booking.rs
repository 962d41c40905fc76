//! Booking window and cost-split settings.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError};

pub const DEFAULT_EXCHANGE_RATE: f64 = 1.07;

/// Policy used to split the total cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMethod {
    /// Same share for everybody, regardless of stay length.
    #[default]
    Equal,
    /// Proportional to nights stayed.
    Nightly,
    /// Proportional to nights rounded up to whole weeks.
    Weekly,
    /// Participants flagged with a nightly rate pay their per-night occupancy
    /// share, everybody else splits the remainder evenly.
    Mixed,
}

impl CalculationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Nightly => "nightly",
            Self::Weekly => "weekly",
            Self::Mixed => "mixed",
        }
    }
}

impl TryFrom<&str> for CalculationMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "nightly" => Ok(Self::Nightly),
            "weekly" => Ok(Self::Weekly),
            "mixed" => Ok(Self::Mixed),
            other => Err(EngineError::Import(format!(
                "unknown calculation method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSettings {
    /// Total accommodation cost in EUR.
    pub total_cost: f64,
    /// First night of the booking.
    pub start_date: NaiveDate,
    /// Last night of the booking (inclusive).
    pub end_date: NaiveDate,
    #[serde(default)]
    pub currency: Currency,
    /// EUR to USD.
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: f64,
    #[serde(default, rename = "showUSD")]
    pub show_usd: bool,
    #[serde(default, rename = "roundUSD")]
    pub round_usd: bool,
    #[serde(default)]
    pub calculation_method: CalculationMethod,
}

fn default_exchange_rate() -> f64 {
    DEFAULT_EXCHANGE_RATE
}

impl BookingSettings {
    /// Settings with the form defaults: EUR, rate 1.07,
    /// USD hidden and unrounded, even split.
    pub fn new(total_cost: f64, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            total_cost,
            start_date,
            end_date,
            currency: Currency::Eur,
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            show_usd: false,
            round_usd: false,
            calculation_method: CalculationMethod::Equal,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: CalculationMethod) -> Self {
        self.calculation_method = method;
        self
    }

    /// Every night of the inclusive window, in order. Empty when the window is
    /// reversed.
    pub fn nights(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |night| *night <= self.end_date)
    }

    /// Number of nights in the window (`end - start + 1`), 0 if reversed.
    pub fn total_nights(&self) -> usize {
        let days = (self.end_date - self.start_date).num_days() + 1;
        usize::try_from(days).unwrap_or(0)
    }

    pub fn to_usd(&self, amount_eur: f64) -> f64 {
        amount_eur * self.exchange_rate
    }
}
