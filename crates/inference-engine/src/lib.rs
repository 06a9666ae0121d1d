//! Mileage Inference Engine
//!
//! Loads the city, average and highway regression models with their feature
//! schemas and runs all three for each validated request.

mod config;
mod engine;
mod model;
mod onnx;

pub use config::{ModelFiles, ModelsConfig};
pub use engine::{Metric, MetricModel, MileagePrediction, MileagePredictor, PredictionResult};
pub use model::{load_model, LinearModel, MileageModel};
pub use onnx::OnnxModel;

use data_validator::ValidationError;
use feature_engine::SchemaError;
use thiserror::Error;

/// Errors raised by a single model
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
}

/// Errors from the prediction pipeline
#[derive(Debug, Error)]
pub enum PredictError {
    /// One or more request fields failed validation
    #[error("Invalid input: {}", format_fields(.0))]
    InvalidInput(Vec<ValidationError>),
    /// A feature schema is malformed or unreadable
    #[error("Invalid {metric} schema: {source}")]
    InvalidSchema {
        metric: Metric,
        #[source]
        source: SchemaError,
    },
    /// A model could not be loaded or does not fit its schema
    #[error("{metric} model unavailable: {source}")]
    ModelUnavailable {
        metric: Metric,
        #[source]
        source: InferenceError,
    },
    /// A loaded model failed while predicting
    #[error("{metric} prediction failed: {source}")]
    Inference {
        metric: Metric,
        #[source]
        source: InferenceError,
    },
}

fn format_fields(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
