//! Raw Prediction Request

use serde::{Deserialize, Serialize};

/// Categorical selections made on the vehicle form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    /// Car body type (Sedan, Hatchback, ...)
    CarBodyType,
    /// Fuel type (Petrol, Diesel, ...)
    FuelType,
    /// Market segment (Economy, Luxury, ...)
    MarketSegment,
    /// Driveline style (FWD, RWD, AWD, ...)
    DrivelineStyle,
    /// Transmission type (Manual, Automatic, ...)
    TransmissionType,
}

impl CategoricalField {
    /// All categorical fields, in form order
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::CarBodyType,
        CategoricalField::FuelType,
        CategoricalField::MarketSegment,
        CategoricalField::DrivelineStyle,
        CategoricalField::TransmissionType,
    ];

    /// Column prefix used by the one-hot encoding at training time
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoricalField::CarBodyType => "car_body_type",
            CategoricalField::FuelType => "fuel_type",
            CategoricalField::MarketSegment => "market_segment",
            CategoricalField::DrivelineStyle => "driveline_style",
            CategoricalField::TransmissionType => "transmission_type",
        }
    }

    /// Parse a column prefix back into a field
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == prefix)
    }

    /// One-hot column name for a selected value: `<prefix>_<value>`
    pub fn one_hot_column(&self, value: &str) -> String {
        format!("{}_{}", self.as_str(), value)
    }
}

/// Numeric attributes entered on the vehicle form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Torque,
    Horsepower,
    Gears,
    Displacement,
    Cylinders,
    CarAge,
    Length,
    Width,
    Height,
}

impl NumericField {
    pub const ALL: [NumericField; 9] = [
        NumericField::Torque,
        NumericField::Horsepower,
        NumericField::Gears,
        NumericField::Displacement,
        NumericField::Cylinders,
        NumericField::CarAge,
        NumericField::Length,
        NumericField::Width,
        NumericField::Height,
    ];

    /// Fields copied verbatim into a feature vector when the schema asks for them
    pub const MODEL_INPUTS: [NumericField; 6] = [
        NumericField::Displacement,
        NumericField::Cylinders,
        NumericField::Horsepower,
        NumericField::Torque,
        NumericField::Gears,
        NumericField::CarAge,
    ];

    /// Request field name
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericField::Torque => "torque",
            NumericField::Horsepower => "hp",
            NumericField::Gears => "no_of_gears",
            NumericField::Displacement => "displacement",
            NumericField::Cylinders => "cylinders",
            NumericField::CarAge => "car_age",
            NumericField::Length => "length",
            NumericField::Width => "width",
            NumericField::Height => "height",
        }
    }

    /// Training column name, if the field is a direct model input.
    ///
    /// Length, width and height only reach the models through the
    /// engineered features.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            NumericField::Displacement => Some("displacement"),
            NumericField::Cylinders => Some("cylinders"),
            NumericField::Horsepower => Some("hp"),
            NumericField::Torque => Some("torque"),
            NumericField::Gears => Some("no_of_gears"),
            NumericField::CarAge => Some("Car_Age"),
            NumericField::Length | NumericField::Width | NumericField::Height => None,
        }
    }

    /// Whether the field counts discrete things and must be a whole number
    pub fn is_count(&self) -> bool {
        matches!(
            self,
            NumericField::Gears | NumericField::Cylinders | NumericField::CarAge
        )
    }
}

/// One prediction request as submitted by the form.
///
/// Counts (gears, cylinders, age) are carried as `f64` so that loosely typed
/// input deserializes; the validator checks they are whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub car_body_type: String,
    pub fuel_type: String,
    pub market_segment: String,
    pub driveline_style: String,
    pub transmission_type: String,

    /// Torque (Nm)
    pub torque: f64,
    /// Horsepower
    pub hp: f64,
    pub no_of_gears: f64,
    /// Engine displacement (cc)
    pub displacement: f64,
    pub cylinders: f64,
    /// Car age (years)
    pub car_age: f64,
    /// Length (in)
    pub length: f64,
    /// Width (in)
    pub width: f64,
    /// Height (in)
    pub height: f64,
}

impl RawInput {
    /// Selected value for a categorical field
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::CarBodyType => &self.car_body_type,
            CategoricalField::FuelType => &self.fuel_type,
            CategoricalField::MarketSegment => &self.market_segment,
            CategoricalField::DrivelineStyle => &self.driveline_style,
            CategoricalField::TransmissionType => &self.transmission_type,
        }
    }

    /// Value of a numeric field
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Torque => self.torque,
            NumericField::Horsepower => self.hp,
            NumericField::Gears => self.no_of_gears,
            NumericField::Displacement => self.displacement,
            NumericField::Cylinders => self.cylinders,
            NumericField::CarAge => self.car_age,
            NumericField::Length => self.length,
            NumericField::Width => self.width,
            NumericField::Height => self.height,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::RawInput;

    /// Sedan / Petrol / Economy / FWD / Manual reference request
    pub fn sedan() -> RawInput {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot_column_naming() {
        assert_eq!(
            CategoricalField::CarBodyType.one_hot_column("Sedan"),
            "car_body_type_Sedan"
        );
        assert_eq!(
            CategoricalField::TransmissionType.one_hot_column("Automatic"),
            "transmission_type_Automatic"
        );
    }

    #[test]
    fn test_prefix_round_trip() {
        for field in CategoricalField::ALL {
            assert_eq!(CategoricalField::from_prefix(field.as_str()), Some(field));
        }
        assert_eq!(CategoricalField::from_prefix("colour"), None);
    }

    #[test]
    fn test_training_column_names() {
        assert_eq!(NumericField::CarAge.column(), Some("Car_Age"));
        assert_eq!(NumericField::Horsepower.column(), Some("hp"));
        assert_eq!(NumericField::Length.column(), None);
        assert!(NumericField::MODEL_INPUTS.iter().all(|f| f.column().is_some()));
    }

    #[test]
    fn test_deserialize_request() {
        let json = r#"{
            "car_body_type": "Sedan", "fuel_type": "Petrol",
            "market_segment": "Economy", "driveline_style": "FWD",
            "transmission_type": "Manual",
            "torque": 100, "hp": 90, "no_of_gears": 5, "displacement": 1200,
            "cylinders": 4, "car_age": 2, "length": 150, "width": 60, "height": 55
        }"#;
        let input: RawInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, fixtures::sedan());
        assert_eq!(input.categorical(CategoricalField::MarketSegment), "Economy");
        assert_eq!(input.numeric(NumericField::Gears), 5.0);
    }
}
