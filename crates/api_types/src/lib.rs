//! Request and response bodies of the HTTP API.
//!
//! Calculation payloads are the engine's own types; only the envelopes live
//! here.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod calculation {
    use super::*;

    pub use engine::{CalculationInput, CalculationResult, SavedCalculation, ValidationIssue};

    /// Body of `POST /api/save`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SaveRequest {
        #[serde(flatten)]
        pub input: CalculationInput,
        /// Overwrite this calculation instead of creating a new one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub existing_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SaveResponse {
        pub success: bool,
        pub calculation_id: String,
        pub message: String,
    }

    /// Query of `GET /api/load`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoadQuery {
        pub id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoadResponse {
        pub success: bool,
        pub data: SavedCalculation,
    }

    /// Body returned by `POST /api/calculate`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalculateResponse {
        pub issues: Vec<ValidationIssue>,
        pub result: CalculationResult,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HealthResponse {
        pub success: bool,
        pub message: String,
        pub timestamp: DateTime<Utc>,
    }
}

/// Body of every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::calculation::*;

    #[test]
    fn save_request_reads_flat_body() {
        let body = r#"{
            "participants": [],
            "settings": {"totalCost": 100, "startDate": "2025-10-16", "endDate": "2025-10-18"},
            "existingId": "calc_1"
        }"#;
        let request: SaveRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.existing_id.as_deref(), Some("calc_1"));
        assert_eq!(request.input.settings.total_cost, 100.0);
        assert!(request.input.additional_activities.is_empty());
    }

    #[test]
    fn save_response_is_camel_case() {
        let response = SaveResponse {
            success: true,
            calculation_id: "calc_1".to_string(),
            message: "Calculation saved successfully".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["calculationId"], "calc_1");
    }
}
