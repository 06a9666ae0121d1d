//! Category Universe
//!
//! Legal values for each categorical field, used to populate form choices and,
//! when configured, to reject unknown selections.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use feature_engine::CategoricalField;
use thiserror::Error;
use tracing::info;

/// Errors while loading a category universe
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Failed to read categories {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse categories: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unknown categorical field {0:?}")]
    UnknownField(String),
}

/// Sorted set of legal values per categorical field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUniverse {
    values: BTreeMap<CategoricalField, BTreeSet<String>>,
}

impl CategoryUniverse {
    /// Create an empty universe
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a legal value; blank values are ignored
    pub fn insert(&mut self, field: CategoricalField, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            return;
        }
        self.values.entry(field).or_default().insert(value);
    }

    /// Parse a JSON object keyed by field prefix, e.g. `{"fuel_type": ["Diesel", "Petrol"]}`
    pub fn from_json_str(json: &str) -> Result<Self, CategoryError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut universe = Self::new();

        for (key, values) in raw {
            let field = CategoricalField::from_prefix(&key)
                .ok_or_else(|| CategoryError::UnknownField(key.clone()))?;
            for value in values {
                universe.insert(field, value);
            }
        }

        Ok(universe)
    }

    /// Load a universe file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CategoryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CategoryError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let universe = Self::from_json_str(&json)?;
        info!(
            "Loaded category universe {} ({} fields)",
            path.display(),
            universe.values.len()
        );
        Ok(universe)
    }

    /// Whether `value` is legal for `field`.
    ///
    /// Fields with no recorded values accept anything.
    pub fn allows(&self, field: CategoricalField, value: &str) -> bool {
        match self.values.get(&field) {
            Some(known) => known.contains(value),
            None => true,
        }
    }

    /// Sorted choices for one field
    pub fn choices(&self, field: CategoricalField) -> Vec<&str> {
        self.values
            .get(&field)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Sorted choices for every field, keyed by field prefix
    pub fn all_choices(&self) -> BTreeMap<&'static str, Vec<&str>> {
        CategoricalField::ALL
            .into_iter()
            .map(|field| (field.as_str(), self.choices(field)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
