//! API Error Responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_engine::PredictError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors returned to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a well-formed request (missing field, non-numeric value, ...)
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// One offending request field
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub fields: Vec<FieldError>,
}

impl ApiError {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::Predict(PredictError::InvalidInput(_)) => "invalid_input",
            ApiError::Predict(PredictError::InvalidSchema { .. }) => "invalid_schema",
            ApiError::Predict(PredictError::ModelUnavailable { .. }) => "model_unavailable",
            ApiError::Predict(PredictError::Inference { .. }) => "inference",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) | ApiError::Predict(PredictError::InvalidInput(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Predict(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Prediction failed: {}", self);
        }

        let fields = match &self {
            ApiError::Predict(PredictError::InvalidInput(errors)) => errors
                .iter()
                .map(|e| FieldError {
                    field: e.field(),
                    message: e.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let body = ErrorBody {
            error: self.to_string(),
            fields,
        };

        (status, Json(body)).into_response()
    }
}
