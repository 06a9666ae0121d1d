//! Mileage Prediction Orchestrator

use data_validator::Validator;
use feature_engine::{EngineeredFeatures, FeatureSchema, RawInput, VectorBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ModelFiles, ModelsConfig};
use crate::model::{load_model, MileageModel};
use crate::{InferenceError, PredictError};

/// Mileage figure predicted by one model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    City,
    Average,
    Highway,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::City, Metric::Average, Metric::Highway];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::City => "city",
            Metric::Average => "average",
            Metric::Highway => "highway",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three predictions for one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MileagePrediction {
    pub city: f64,
    pub average: f64,
    pub highway: f64,
}

impl MileagePrediction {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::City => self.city,
            Metric::Average => self.average,
            Metric::Highway => self.highway,
        }
    }
}

/// Result of a timed prediction
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// The prediction
    pub prediction: MileagePrediction,
    /// Wall time for validation, feature building and all three model calls
    pub latency_ms: f64,
}

/// A model paired with the schema it was trained on
pub struct MetricModel {
    metric: Metric,
    schema: FeatureSchema,
    model: Box<dyn MileageModel>,
}

impl MetricModel {
    /// Pair a schema with a model, rejecting mismatched input widths
    pub fn new(
        metric: Metric,
        schema: FeatureSchema,
        model: Box<dyn MileageModel>,
    ) -> Result<Self, PredictError> {
        if let Some(width) = model.input_width() {
            if width != schema.len() {
                return Err(PredictError::ModelUnavailable {
                    metric,
                    source: InferenceError::InvalidInputShape {
                        expected: format!("[1, {}]", schema.len()),
                        actual: format!("[1, {}]", width),
                    },
                });
            }
        }

        Ok(Self {
            metric,
            schema,
            model,
        })
    }

    /// Load the schema and model files for one metric
    pub fn load(metric: Metric, files: &ModelFiles) -> Result<Self, PredictError> {
        let schema = FeatureSchema::load(&files.schema_path)
            .map_err(|source| PredictError::InvalidSchema { metric, source })?;
        let model = load_model(&files.model_path, schema.len())
            .map_err(|source| PredictError::ModelUnavailable { metric, source })?;

        info!(
            "{} model ready: {} model, {} features",
            metric,
            model.kind(),
            schema.len()
        );
        Self::new(metric, schema, model)
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model_kind(&self) -> &'static str {
        self.model.kind()
    }

    /// Build this metric's vector and run its model
    pub fn predict(
        &self,
        builder: &VectorBuilder,
        input: &RawInput,
        engineered: &EngineeredFeatures,
    ) -> Result<f64, PredictError> {
        let vector = builder.build(input, engineered, &self.schema);
        let value = self
            .model
            .predict(&vector)
            .map_err(|source| PredictError::Inference {
                metric: self.metric,
                source,
            })?;

        debug!("{} prediction: {:.3}", self.metric, value);
        Ok(value)
    }
}

/// Predicts city, average and highway mileage from one request.
///
/// Models and schemas are loaded once and only read afterwards, so a single
/// predictor can be shared across concurrent requests.
pub struct MileagePredictor {
    city: MetricModel,
    average: MetricModel,
    highway: MetricModel,
    validator: Validator,
    builder: VectorBuilder,
}

impl MileagePredictor {
    /// Create a predictor from already loaded models
    pub fn new(
        city: MetricModel,
        average: MetricModel,
        highway: MetricModel,
        validator: Validator,
    ) -> Self {
        Self {
            city,
            average,
            highway,
            validator,
            builder: VectorBuilder::new(),
        }
    }

    /// Load all three models; any failure aborts startup
    pub fn load(config: &ModelsConfig, validator: Validator) -> Result<Self, PredictError> {
        info!("Loading mileage models");
        let city = MetricModel::load(Metric::City, config.files(Metric::City))?;
        let average = MetricModel::load(Metric::Average, config.files(Metric::Average))?;
        let highway = MetricModel::load(Metric::Highway, config.files(Metric::Highway))?;
        Ok(Self::new(city, average, highway, validator))
    }

    pub fn model(&self, metric: Metric) -> &MetricModel {
        match metric {
            Metric::City => &self.city,
            Metric::Average => &self.average,
            Metric::Highway => &self.highway,
        }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate, engineer and run all three models.
    ///
    /// Either all three predictions are returned or none are.
    pub fn predict(&self, input: &RawInput) -> Result<MileagePrediction, PredictError> {
        self.validator
            .validate(input)
            .into_result()
            .map_err(PredictError::InvalidInput)?;

        let engineered = EngineeredFeatures::from_input(input);
        debug!(
            "Engineered features: car_volume={}, power_index={}",
            engineered.car_volume, engineered.power_index
        );

        let city = self.city.predict(&self.builder, input, &engineered)?;
        let average = self.average.predict(&self.builder, input, &engineered)?;
        let highway = self.highway.predict(&self.builder, input, &engineered)?;

        Ok(MileagePrediction {
            city,
            average,
            highway,
        })
    }

    /// Predict and measure latency
    pub fn predict_timed(&self, input: &RawInput) -> Result<PredictionResult, PredictError> {
        let start = std::time::Instant::now();
        let prediction = self.predict(input)?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!("Prediction completed in {:.3}ms", latency_ms);

        Ok(PredictionResult {
            prediction,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearModel;
    use data_validator::ValidationError;
    use feature_engine::FeatureVector;

    fn sedan() -> RawInput {
        RawInput {
            car_body_type: "Sedan".to_string(),
            fuel_type: "Petrol".to_string(),
            market_segment: "Economy".to_string(),
            driveline_style: "FWD".to_string(),
            transmission_type: "Manual".to_string(),
            torque: 100.0,
            hp: 90.0,
            no_of_gears: 5.0,
            displacement: 1200.0,
            cylinders: 4.0,
            car_age: 2.0,
            length: 150.0,
            width: 60.0,
            height: 55.0,
        }
    }

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn linear(
        metric: Metric,
        names: &[&str],
        intercept: f64,
        coefficients: Vec<f64>,
    ) -> MetricModel {
        MetricModel::new(
            metric,
            schema(names),
            Box::new(LinearModel::new(intercept, coefficients)),
        )
        .unwrap()
    }

    /// Model that always fails
    struct BrokenModel;

    impl MileageModel for BrokenModel {
        fn predict(&self, _features: &FeatureVector<'_>) -> Result<f64, InferenceError> {
            Err(InferenceError::InferenceFailed("broken".to_string()))
        }

        fn input_width(&self) -> Option<usize> {
            None
        }

        fn kind(&self) -> &'static str {
            "broken"
        }
    }

    fn predictor() -> MileagePredictor {
        MileagePredictor::new(
            // 40 - 0.1 * hp + 2 * fuel_type_Petrol
            linear(Metric::City, &["hp", "fuel_type_Petrol"], 40.0, vec![-0.1, 2.0]),
            // 30 - 0.5 * Car_Age
            linear(Metric::Average, &["Car_Age", "fuel_type_Diesel"], 30.0, vec![-0.5, 5.0]),
            // 20 + 0.01 * torque + car_body_type_Sedan
            linear(
                Metric::Highway,
                &["torque", "car_body_type_Sedan"],
                20.0,
                vec![0.01, 1.0],
            ),
            Validator::default(),
        )
    }

    #[test]
    fn test_three_independent_predictions() {
        let prediction = predictor().predict(&sedan()).unwrap();
        assert!((prediction.city - 33.0).abs() < 1e-9);
        assert!((prediction.average - 29.0).abs() < 1e-9);
        assert!((prediction.highway - 22.0).abs() < 1e-9);
        assert_eq!(prediction.get(Metric::Highway), prediction.highway);
    }

    #[test]
    fn test_swapping_city_model_leaves_others() {
        let baseline = predictor().predict(&sedan()).unwrap();

        let mut swapped = predictor();
        swapped.city = linear(Metric::City, &["displacement"], 0.0, vec![0.01]);
        let prediction = swapped.predict(&sedan()).unwrap();

        assert!((prediction.city - 12.0).abs() < 1e-9);
        assert_eq!(prediction.average, baseline.average);
        assert_eq!(prediction.highway, baseline.highway);
    }

    #[test]
    fn test_invalid_input_stops_before_models() {
        let mut predictor = predictor();
        predictor.city =
            MetricModel::new(Metric::City, schema(&["hp"]), Box::new(BrokenModel)).unwrap();

        let mut input = sedan();
        input.displacement = 100.0;

        match predictor.predict(&input) {
            Err(PredictError::InvalidInput(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(matches!(
                    errors[0],
                    ValidationError::BelowMinimum { field: "displacement", .. }
                ));
            }
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_one_failing_model_fails_everything() {
        let mut predictor = predictor();
        predictor.highway =
            MetricModel::new(Metric::Highway, schema(&["torque"]), Box::new(BrokenModel)).unwrap();

        let err = predictor.predict(&sedan()).unwrap_err();
        assert!(matches!(
            err,
            PredictError::Inference {
                metric: Metric::Highway,
                ..
            }
        ));
    }

    #[test]
    fn test_width_mismatch_rejected_at_construction() {
        let result = MetricModel::new(
            Metric::Average,
            schema(&["hp", "torque"]),
            Box::new(LinearModel::new(0.0, vec![1.0])),
        );
        assert!(matches!(
            result,
            Err(PredictError::ModelUnavailable {
                metric: Metric::Average,
                source: InferenceError::InvalidInputShape { .. }
            })
        ));
    }

    #[test]
    fn test_zero_volume_reaches_model() {
        let predictor = MileagePredictor::new(
            linear(Metric::City, &["hp"], 0.0, vec![1.0]),
            linear(Metric::Average, &["hp"], 0.0, vec![1.0]),
            linear(Metric::Highway, &["Power_Index"], 0.0, vec![1.0]),
            Validator::default(),
        );

        let mut input = sedan();
        input.length = 0.0;
        let prediction = predictor.predict(&input).unwrap();
        assert_eq!(prediction.highway, f64::INFINITY);
        assert_eq!(prediction.city, 90.0);
    }

    #[test]
    fn test_load_reports_missing_schema() {
        let config = ModelsConfig {
            city: ModelFiles {
                model_path: "/nonexistent/city.json".into(),
                schema_path: "/nonexistent/city_features.json".into(),
            },
            ..Default::default()
        };

        let err = MileagePredictor::load(&config, Validator::default()).err().unwrap();
        assert!(matches!(err, PredictError::InvalidSchema { metric: Metric::City, .. }));
    }

    #[test]
    fn test_load_from_files() {
        let dir = std::env::temp_dir()
            .join(format!("inference-engine-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut files = Vec::new();
        for metric in Metric::ALL {
            let schema_path = dir.join(format!("{}_features.json", metric));
            let model_path = dir.join(format!("{}.json", metric));
            std::fs::write(&schema_path, r#"["hp", "fuel_type_Petrol"]"#).unwrap();
            std::fs::write(
                &model_path,
                r#"{"intercept": 10.0, "coefficients": [0.1, 1.0]}"#,
            )
            .unwrap();
            files.push(ModelFiles {
                model_path,
                schema_path,
            });
        }

        let config = ModelsConfig {
            city: files[0].clone(),
            average: files[1].clone(),
            highway: files[2].clone(),
        };
        let predictor = MileagePredictor::load(&config, Validator::default());
        std::fs::remove_dir_all(&dir).ok();

        let result = predictor.unwrap().predict_timed(&sedan()).unwrap();
        assert!((result.prediction.city - 20.0).abs() < 1e-9);
        assert!(result.latency_ms >= 0.0);
    }
}
