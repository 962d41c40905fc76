use api_types::health::HealthResponse;
use axum::Json;
use chrono::Utc;

/// Liveness probe.
pub async fn get() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Nightshare API is running".to_string(),
        timestamp: Utc::now(),
    })
}
