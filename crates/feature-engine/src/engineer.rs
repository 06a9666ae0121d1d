//! Engineered Features
//!
//! Synthetic attributes derived from the physical dimensions of the vehicle.

use serde::{Deserialize, Serialize};

use crate::input::RawInput;

/// Schema column holding the car volume
pub const CAR_VOLUME_COLUMN: &str = "car_volume";
/// Schema column holding the power index
pub const POWER_INDEX_COLUMN: &str = "Power_Index";

/// Features derived once per request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    /// length × width × height
    pub car_volume: f64,
    /// horsepower / ln(1 + car_volume)
    pub power_index: f64,
}

impl EngineeredFeatures {
    /// Compute the engineered features from raw dimensions.
    ///
    /// A zero volume makes the denominator `ln(1) = 0`; the power index is
    /// then `+inf` and flows on as an ordinary value.
    pub fn compute(length: f64, width: f64, height: f64, horsepower: f64) -> Self {
        let car_volume = length * width * height;
        let denominator = car_volume.ln_1p();

        let power_index = if denominator == 0.0 {
            f64::INFINITY
        } else {
            horsepower / denominator
        };

        Self {
            car_volume,
            power_index,
        }
    }

    /// Compute from a request
    pub fn from_input(input: &RawInput) -> Self {
        Self::compute(input.length, input.width, input.height, input.hp)
    }
}
