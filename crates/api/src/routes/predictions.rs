//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use feature_engine::RawInput;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

/// Response for the predict endpoint
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub city: f64,
    pub average: f64,
    pub highway: f64,
    pub latency_ms: f64,
}

/// Predict city, average and highway mileage for one vehicle
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let result = payload
        .map_err(|rejection| ApiError::MalformedRequest(rejection.body_text()))
        .and_then(|Json(input)| state.predictor.predict_timed(&input).map_err(ApiError::from));

    match result {
        Ok(result) => {
            metrics::counter!("mileage_predictions_total").increment(1);
            metrics::histogram!("mileage_prediction_latency_ms").record(result.latency_ms);
            debug!(
                "Predicted city={:.2} average={:.2} highway={:.2}",
                result.prediction.city, result.prediction.average, result.prediction.highway
            );

            Ok(Json(PredictionResponse {
                city: result.prediction.city,
                average: result.prediction.average,
                highway: result.prediction.highway,
                latency_ms: result.latency_ms,
            }))
        }
        Err(e) => {
            metrics::counter!("mileage_prediction_errors_total", "kind" => e.kind()).increment(1);
            warn!("Prediction request rejected: {}", e);
            Err(e)
        }
    }
}
