//! Schema-Aligned Feature Vector Assembly

use crate::engineer::{EngineeredFeatures, CAR_VOLUME_COLUMN, POWER_INDEX_COLUMN};
use crate::input::{CategoricalField, NumericField, RawInput};
use crate::schema::FeatureSchema;
use tracing::debug;

/// Value every cell starts from before known columns are written
pub const DEFAULT_FILL: f64 = 0.0;

/// Value written into a matching one-hot column
pub const ONE_HOT_SET: f64 = 1.0;

/// Single-row feature vector whose columns are exactly its schema's
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'s> {
    schema: &'s FeatureSchema,
    values: Vec<f64>,
}

impl<'s> FeatureVector<'s> {
    /// Allocate a vector for `schema` with every cell set to `fill`
    pub fn filled(schema: &'s FeatureSchema, fill: f64) -> Self {
        Self {
            schema,
            values: vec![fill; schema.len()],
        }
    }

    /// Overwrite a column by name. Returns `false` if the schema has no such column.
    pub fn set(&mut self, column: &str, value: f64) -> bool {
        match self.schema.index_of(column) {
            Some(idx) => {
                self.values[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Read a column by name
    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.index_of(column).map(|idx| self.values[idx])
    }

    /// Cell values in schema order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Column names in schema order
    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    /// Schema this vector was built against
    pub fn schema(&self) -> &'s FeatureSchema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values narrowed to `f32` for single-precision model runtimes
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }

    /// (column, value) pairs in schema order
    pub fn named(&self) -> Vec<(&str, f64)> {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
            .collect()
    }
}

/// Builds feature vectors that match a model schema column for column
#[derive(Debug, Clone, Copy)]
pub struct VectorBuilder {
    fill: f64,
}

impl Default for VectorBuilder {
    fn default() -> Self {
        Self { fill: DEFAULT_FILL }
    }
}

impl VectorBuilder {
    /// Create a builder with the standard zero fill
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder that fills unmatched columns with `fill`
    pub fn with_fill(fill: f64) -> Self {
        Self { fill }
    }

    pub fn fill(&self) -> f64 {
        self.fill
    }

    /// Build the vector for one (request, schema) pair.
    ///
    /// Unknown schema columns keep the fill value, numeric fields the schema
    /// lacks are skipped, and a category value without a one-hot column leaves
    /// its whole group unset (reference category).
    pub fn build<'s>(
        &self,
        input: &RawInput,
        engineered: &EngineeredFeatures,
        schema: &'s FeatureSchema,
    ) -> FeatureVector<'s> {
        let mut vector = FeatureVector::filled(schema, self.fill);
        let mut written = 0usize;

        for field in NumericField::MODEL_INPUTS {
            if let Some(column) = field.column() {
                if vector.set(column, input.numeric(field)) {
                    written += 1;
                }
            }
        }

        if vector.set(CAR_VOLUME_COLUMN, engineered.car_volume) {
            written += 1;
        }
        if vector.set(POWER_INDEX_COLUMN, engineered.power_index) {
            written += 1;
        }

        for field in CategoricalField::ALL {
            let column = field.one_hot_column(input.categorical(field));
            if vector.set(&column, ONE_HOT_SET) {
                written += 1;
            } else {
                debug!("No one-hot column {} in schema; treating as reference category", column);
            }
        }

        debug!(
            "Built feature vector: {} columns, {} populated",
            schema.len(),
            written
        );

        vector
    }
}
