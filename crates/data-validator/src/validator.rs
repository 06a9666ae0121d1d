//! Request Validator for Range and Category Checks

use crate::categories::CategoryUniverse;
use crate::error::ValidationError;
use feature_engine::{CategoricalField, NumericField, RawInput};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Torque minimum (Nm)
    pub min_torque: f64,
    /// Horsepower minimum
    pub min_hp: f64,
    /// Gear count minimum
    pub min_gears: f64,
    /// Engine displacement minimum (cc)
    pub min_displacement: f64,
    /// Cylinder count minimum
    pub min_cylinders: f64,
    /// Car age minimum (years)
    pub min_car_age: f64,
    /// Dimension minimum for length, width and height (in)
    pub min_dimension: f64,
    /// Reject requests whose car volume is zero instead of passing an
    /// infinite power index to the models
    pub reject_zero_volume: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_torque: 50.0,
            min_hp: 50.0,
            min_gears: 3.0,
            min_displacement: 500.0,
            min_cylinders: 2.0,
            min_car_age: 0.0,
            min_dimension: 0.0,
            reject_zero_volume: false,
        }
    }
}

impl ValidationConfig {
    /// Minimum allowed for a numeric field
    pub fn minimum(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Torque => self.min_torque,
            NumericField::Horsepower => self.min_hp,
            NumericField::Gears => self.min_gears,
            NumericField::Displacement => self.min_displacement,
            NumericField::Cylinders => self.min_cylinders,
            NumericField::CarAge => self.min_car_age,
            NumericField::Length | NumericField::Width | NumericField::Height => {
                self.min_dimension
            }
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// Convert into a `Result`, yielding every error on failure
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Validator for vehicle prediction requests
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
    universe: Option<CategoryUniverse>,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            universe: None,
        }
    }

    /// Also reject categorical values missing from `universe`
    pub fn with_universe(mut self, universe: CategoryUniverse) -> Self {
        self.universe = Some(universe);
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn universe(&self) -> Option<&CategoryUniverse> {
        self.universe.as_ref()
    }

    /// Validate one numeric field
    pub fn validate_numeric(&self, field: NumericField, value: f64) -> Result<(), ValidationError> {
        let name = field.as_str();

        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field: name, value });
        }

        let min = self.config.minimum(field);
        if value < min {
            return Err(ValidationError::BelowMinimum {
                field: name,
                value,
                min,
            });
        }

        if field.is_count() && value.fract() != 0.0 {
            return Err(ValidationError::NotWholeNumber { field: name, value });
        }

        Ok(())
    }

    /// Validate one categorical selection
    pub fn validate_categorical(
        &self,
        field: CategoricalField,
        value: &str,
    ) -> Result<(), ValidationError> {
        let name = field.as_str();

        if value.trim().is_empty() {
            return Err(ValidationError::EmptyCategory(name));
        }

        match &self.universe {
            Some(universe) if !universe.allows(field, value) => {
                Err(ValidationError::UnknownCategory {
                    field: name,
                    value: value.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Validate a whole request, collecting every offending field
    pub fn validate(&self, input: &RawInput) -> ValidationResult {
        let mut errors = Vec::new();
        let mut fields_checked = 0;

        for field in CategoricalField::ALL {
            fields_checked += 1;
            if let Err(e) = self.validate_categorical(field, input.categorical(field)) {
                errors.push(e);
            }
        }

        for field in NumericField::ALL {
            fields_checked += 1;
            if let Err(e) = self.validate_numeric(field, input.numeric(field)) {
                errors.push(e);
            }
        }

        let volume = input.length * input.width * input.height;
        let dimensions_finite = [input.length, input.width, input.height]
            .iter()
            .all(|d| d.is_finite());
        if dimensions_finite && !volume.is_finite() {
            errors.push(ValidationError::NotFinite {
                field: "car_volume",
                value: volume,
            });
        }

        if self.config.reject_zero_volume && volume == 0.0 {
            errors.push(ValidationError::ZeroVolume {
                length: input.length,
                width: input.width,
                height: input.height,
            });
        }

        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            warn!("Rejected request with {} invalid field(s)", errors.len());
            ValidationResult::invalid(errors, fields_checked)
        }
    }
}
