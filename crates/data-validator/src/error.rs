//! Validation Error Types

use thiserror::Error;

/// Errors during request validation, one per offending field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value below the allowed minimum
    #[error("{field} value {value} is below the minimum of {min}")]
    BelowMinimum {
        field: &'static str,
        value: f64,
        min: f64,
    },

    /// NaN or infinite numeric input
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    /// Count field with a fractional part
    #[error("{field} must be a whole number, got {value}")]
    NotWholeNumber { field: &'static str, value: f64 },

    /// Blank categorical selection
    #[error("{0} must not be empty")]
    EmptyCategory(&'static str),

    /// Categorical value outside the known universe
    #[error("{field} value {value:?} is not a known category")]
    UnknownCategory { field: &'static str, value: String },

    /// Length × width × height is zero while zero volume is rejected
    #[error("car volume is zero (length={length}, width={width}, height={height})")]
    ZeroVolume { length: f64, width: f64, height: f64 },
}

impl ValidationError {
    /// Name of the request field this error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::BelowMinimum { field, .. }
            | ValidationError::NotFinite { field, .. }
            | ValidationError::NotWholeNumber { field, .. }
            | ValidationError::UnknownCategory { field, .. } => field,
            ValidationError::EmptyCategory(field) => field,
            ValidationError::ZeroVolume { .. } => "car_volume",
        }
    }
}
