//! Regression Models
//!
//! A model maps one feature vector to one scalar mileage figure.

use std::path::Path;

use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::onnx::OnnxModel;
use crate::InferenceError;

/// A pretrained regression model shared read-only across requests
pub trait MileageModel: Send + Sync {
    /// Predict a single value from a schema-aligned vector
    fn predict(&self, features: &FeatureVector<'_>) -> Result<f64, InferenceError>;

    /// Input width the model was built for, if it declares one
    fn input_width(&self) -> Option<usize>;

    /// Short model kind for health reporting
    fn kind(&self) -> &'static str;
}

/// Linear regression stored as intercept plus positional coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    /// Parse a `{"intercept": .., "coefficients": [..]}` document
    pub fn from_json_str(json: &str) -> Result<Self, InferenceError> {
        serde_json::from_str(json).map_err(|e| InferenceError::ModelLoadError(e.to_string()))
    }

    /// Load a JSON model file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))
    }
}

impl MileageModel for LinearModel {
    fn predict(&self, features: &FeatureVector<'_>) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", self.coefficients.len()),
                actual: format!("[1, {}]", features.len()),
            });
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.values())
            .map(|(w, x)| w * x)
            .sum();

        Ok(self.intercept + dot)
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// Load a model file, choosing the format by extension.
///
/// `width` is the schema length the model will be fed; ONNX graphs are
/// optimized for exactly that input shape.
pub fn load_model(
    path: impl AsRef<Path>,
    width: usize,
) -> Result<Box<dyn MileageModel>, InferenceError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let model: Box<dyn MileageModel> = match extension.as_deref() {
        Some("json") => Box::new(LinearModel::load(path)?),
        Some("onnx") => Box::new(OnnxModel::load(path, width)?),
        _ => {
            return Err(InferenceError::ModelLoadError(format!(
                "{}: unsupported model format (expected .json or .onnx)",
                path.display()
            )))
        }
    };

    info!("Loaded {} model from {}", model.kind(), path.display());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::FeatureSchema;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_linear_prediction() {
        let schema = schema(&["hp", "Car_Age"]);
        let mut vector = FeatureVector::filled(&schema, 0.0);
        vector.set("hp", 100.0);
        vector.set("Car_Age", 3.0);

        let model = LinearModel::new(30.0, vec![-0.1, -0.5]);
        let prediction = model.predict(&vector).unwrap();
        assert!((prediction - 18.5).abs() < 1e-9);
        assert_eq!(model.input_width(), Some(2));
    }

    #[test]
    fn test_width_mismatch() {
        let schema = schema(&["hp"]);
        let vector = FeatureVector::filled(&schema, 0.0);
        let model = LinearModel::new(0.0, vec![1.0, 2.0]);

        assert!(matches!(
            model.predict(&vector),
            Err(InferenceError::InvalidInputShape { .. })
        ));
    }

    #[test]
    fn test_parse_json_model() {
        let model = LinearModel::from_json_str(r#"{"intercept": 12.5, "coefficients": [0.5, 1.0]}"#)
            .unwrap();
        assert_eq!(model, LinearModel::new(12.5, vec![0.5, 1.0]));
        assert!(LinearModel::from_json_str(r#"{"coefficients": []}"#).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_model("/models/city.pkl", 3).err().unwrap();
        assert!(matches!(err, InferenceError::ModelLoadError(ref m) if m.contains("unsupported")));
    }

    #[test]
    fn test_missing_json_model() {
        let err = load_model("/nonexistent/city.json", 3).err().unwrap();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }

    #[test]
    fn test_load_json_model_file() {
        let path = std::env::temp_dir()
            .join(format!("inference-engine-model-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"intercept": 1.0, "coefficients": [2.0]}"#).unwrap();

        let model = load_model(&path, 1);
        std::fs::remove_file(&path).ok();

        let model = model.unwrap();
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.input_width(), Some(1));
    }
}
