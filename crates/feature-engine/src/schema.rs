//! Feature Schema
//!
//! The ordered column list a trained model expects, indexed by name.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::SchemaError;

/// Ordered, duplicate-free list of column names paired with one model
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Create a schema from column names
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(columns.len());

        for (position, column) in columns.iter().enumerate() {
            if let Some(first) = index.insert(column.clone(), position) {
                return Err(SchemaError::Duplicate {
                    column: column.clone(),
                    first,
                    second: position,
                });
            }
        }

        debug!("Indexed feature schema with {} columns", columns.len());
        Ok(Self { columns, index })
    }

    /// Create a schema from loosely typed JSON values; every entry must be a string
    pub fn from_json_values(values: &[Value]) -> Result<Self, SchemaError> {
        let columns = values
            .iter()
            .enumerate()
            .map(|(position, value)| match value {
                Value::String(name) => Ok(name.clone()),
                other => Err(SchemaError::NonString {
                    position,
                    found: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(columns)
    }

    /// Parse a JSON array of column names
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| SchemaError::Parse(e.to_string()))?;

        match value {
            Value::Array(values) => Self::from_json_values(&values),
            other => Err(SchemaError::Parse(format!(
                "expected a JSON array of column names, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Load a schema file (JSON array of column names)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let schema = Self::from_json_str(&json)?;
        info!("Loaded feature schema {} ({} columns)", path.display(), schema.len());
        Ok(schema)
    }

    /// Position of a column, if present
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Whether the schema has a column with this exact name
    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Column names in schema order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns (model input width)
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
