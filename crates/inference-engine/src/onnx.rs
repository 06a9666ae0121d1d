//! ONNX Model Runner
//!
//! Runs regressors exported to ONNX (e.g. via skl2onnx) with tract.

use std::path::Path;

use feature_engine::FeatureVector;
use tract_onnx::prelude::*;
use tracing::{debug, info};

use crate::model::MileageModel;
use crate::InferenceError;

/// ONNX regressor with a `[1, width]` f32 input and a single scalar output
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    width: usize,
}

impl OnnxModel {
    /// Load and optimize the model for a fixed input width
    pub fn load(path: &Path, width: usize) -> Result<Self, InferenceError> {
        info!("Loading ONNX model {} (input width {})", path.display(), width);

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, width]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {:#}", path.display(), e)))?;

        Ok(Self { plan, width })
    }
}

impl MileageModel for OnnxModel {
    fn predict(&self, features: &FeatureVector<'_>) -> Result<f64, InferenceError> {
        if features.len() != self.width {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", self.width),
                actual: format!("[1, {}]", features.len()),
            });
        }

        let input: Tensor =
            tract_ndarray::Array2::from_shape_vec((1, self.width), features.to_f32())
                .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
                .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(format!("{:#}", e)))?;

        let output = outputs.first().ok_or_else(|| {
            InferenceError::InferenceFailed("model produced no outputs".to_string())
        })?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(format!("{:#}", e)))?;
        let value = view
            .iter()
            .next()
            .copied()
            .ok_or_else(|| InferenceError::InferenceFailed("model output is empty".to_string()))?;

        debug!("ONNX prediction: {}", value);
        Ok(f64::from(value))
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.width)
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}
