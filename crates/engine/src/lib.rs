pub use activity::{Activity, ActivityKind, ActivityResult, Tip};
pub use booking::{BookingSettings, CalculationMethod, DEFAULT_EXCHANGE_RATE};
pub use calculations::SavedCalculation;
pub use csv_format::{CsvImport, export_csv, import_csv};
pub use currency::Currency;
pub use error::EngineError;
pub use ops::{DEFAULT_TTL_DAYS, Engine, EngineBuilder};
pub use participant::Participant;
pub use split::{
    CalculationInput, CalculationResult, Evaluation, NightRecord, ParticipantResult,
    calculate_cost_split, night_breakdown,
};
pub use summary::summary_text;
pub use validation::{Severity, ValidationIssue};

mod activity;
mod booking;
mod calculations;
mod csv_format;
mod currency;
mod error;
pub mod money;
mod ops;
mod participant;
pub mod split;
mod summary;
mod util;
pub mod validation;

type ResultEngine<T> = Result<T, EngineError>;
