//! Calculation API endpoints

use api_types::calculation::{
    CalculateResponse, LoadQuery, LoadResponse, SaveRequest, SaveResponse,
};
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use engine::CalculationInput;

use crate::{ServerError, server::ServerState};

/// Handle requests for storing a calculation snapshot
pub async fn save(
    State(state): State<ServerState>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, ServerError> {
    let Json(payload) = payload.map_err(|err| ServerError::Generic(err.body_text()))?;

    let calculation_id = state
        .engine
        .save_calculation(&payload.input, payload.existing_id.as_deref())
        .await?;

    Ok(Json(SaveResponse {
        success: true,
        calculation_id,
        message: "Calculation saved successfully".to_string(),
    }))
}

/// Handle requests for loading a stored calculation
pub async fn load(
    State(state): State<ServerState>,
    Query(query): Query<LoadQuery>,
) -> Result<Json<LoadResponse>, ServerError> {
    let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
        return Err(ServerError::Generic("Missing calculation ID".to_string()));
    };

    let data = state.engine.load_calculation(id.trim()).await?;
    Ok(Json(LoadResponse {
        success: true,
        data,
    }))
}

/// Handle requests for running the split without storing anything
pub async fn calculate(
    payload: Result<Json<CalculationInput>, JsonRejection>,
) -> Result<Json<CalculateResponse>, ServerError> {
    let Json(input) = payload.map_err(|err| ServerError::Generic(err.body_text()))?;

    let evaluation = input.evaluate();
    Ok(Json(CalculateResponse {
        issues: evaluation.issues,
        result: evaluation.result,
    }))
}
