//! Model configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::Metric;

/// Files backing one metric's model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFiles {
    /// Model file (`.json` linear model or `.onnx`)
    pub model_path: PathBuf,
    /// Feature schema (JSON array of column names)
    pub schema_path: PathBuf,
}

impl ModelFiles {
    fn in_dir(dir: &str, stem: &str) -> Self {
        Self {
            model_path: PathBuf::from(format!("{dir}/{stem}.onnx")),
            schema_path: PathBuf::from(format!("{dir}/{stem}_features.json")),
        }
    }
}

/// Model configuration for all three metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub city: ModelFiles,
    pub average: ModelFiles,
    pub highway: ModelFiles,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            city: ModelFiles::in_dir("models", "city_mileage_prediction_final_model"),
            average: ModelFiles::in_dir("models", "avg_mileage_prediction_final_model"),
            highway: ModelFiles::in_dir("models", "highway_mileage_prediction_final_model"),
        }
    }
}

impl ModelsConfig {
    /// Files for one metric
    pub fn files(&self, metric: Metric) -> &ModelFiles {
        match metric {
            Metric::City => &self.city,
            Metric::Average => &self.average,
            Metric::Highway => &self.highway,
        }
    }
}
