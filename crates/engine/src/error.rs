//! The module contains the errors the engine can throw.
//!
//! The split itself never fails: it is a total function over validated input
//! (see [`validation`]). Errors come from the edges:
//!
//! - [`InvalidActivity`] when an activity is built from bad data.
//! - [`Import`] when a CSV document cannot be turned into engine input.
//! - [`KeyNotFound`] when a stored calculation is missing or expired.
//!
//!  [`validation`]: crate::validation
//!  [`InvalidActivity`]: EngineError::InvalidActivity
//!  [`Import`]: EngineError::Import
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid activity: {0}")]
    InvalidActivity(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Import failed: {0}")]
    Import(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidActivity(a), Self::InvalidActivity(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Import(a), Self::Import(b)) => a == b,
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
