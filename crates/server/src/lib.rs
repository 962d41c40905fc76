use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::ErrorResponse;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod calculations;
mod health;
mod server;

pub mod types {
    pub mod calculation {
        pub use api_types::calculation::{
            CalculateResponse, LoadQuery, LoadResponse, SaveRequest, SaveResponse,
        };
        pub use engine::{CalculationInput, CalculationResult, SavedCalculation};
    }

    pub mod health {
        pub use api_types::health::HealthResponse;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Import(_) | EngineError::Csv(_) | EngineError::Json(_) => {
            StatusCode::BAD_REQUEST
        }
        EngineError::InvalidDate(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidActivity(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::KeyNotFound(_) => "Calculation not found or expired".to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
