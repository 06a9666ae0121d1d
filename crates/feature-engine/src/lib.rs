//! Feature Engineering Engine
//!
//! Turns a vehicle form submission into numeric feature vectors aligned to
//! each model's training schema.

mod engineer;
mod features;
mod input;
mod schema;

pub use engineer::{EngineeredFeatures, CAR_VOLUME_COLUMN, POWER_INDEX_COLUMN};
pub use features::{FeatureVector, VectorBuilder, DEFAULT_FILL, ONE_HOT_SET};
pub use input::{CategoricalField, NumericField, RawInput};
pub use schema::FeatureSchema;

use thiserror::Error;

/// Errors raised while loading or validating a feature schema
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Schema column {position} is not a string: {found}")]
    NonString { position: usize, found: String },
    #[error("Duplicate schema column {column:?} at positions {first} and {second}")]
    Duplicate {
        column: String,
        first: usize,
        second: usize,
    },
    #[error("Failed to parse schema: {0}")]
    Parse(String),
    #[error("Failed to read schema {path}: {message}")]
    Io { path: String, message: String },
}
