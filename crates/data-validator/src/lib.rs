//! Request Validation
//!
//! Rejects malformed vehicle prediction requests before any feature is
//! engineered, reporting every offending field.

mod categories;
mod error;
mod validator;

pub use categories::{CategoryError, CategoryUniverse};
pub use error::ValidationError;
pub use validator::{ValidationConfig, ValidationResult, Validator};
