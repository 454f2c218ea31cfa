//! Input feature data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features the model consumes
pub const FEATURE_COUNT: usize = 4;

/// A model input feature.
///
/// The declaration order is the column order the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
}

impl Feature {
    /// All features, in model column order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
    ];

    /// Column index in the model input tensor
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name used in the training data
    pub fn name(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Pregnancies",
            Feature::Glucose => "Glucose",
            Feature::BloodPressure => "BloodPressure",
            Feature::SkinThickness => "SkinThickness",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw text entered for each feature, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInputs {
    pub pregnancies: String,
    pub glucose: String,
    pub blood_pressure: String,
    pub skin_thickness: String,
}

impl FeatureInputs {
    /// Create inputs from the four raw field values
    pub fn new(
        pregnancies: impl Into<String>,
        glucose: impl Into<String>,
        blood_pressure: impl Into<String>,
        skin_thickness: impl Into<String>,
    ) -> Self {
        Self {
            pregnancies: pregnancies.into(),
            glucose: glucose.into(),
            blood_pressure: blood_pressure.into(),
            skin_thickness: skin_thickness.into(),
        }
    }

    /// Split a comma-separated line into the four fields.
    ///
    /// Missing trailing fields become empty strings; surplus fields are
    /// folded into the last one so they fail parsing instead of vanishing.
    pub fn from_line(line: &str) -> Self {
        let mut parts = line.trim_end_matches(['\r', '\n']).splitn(FEATURE_COUNT, ',');
        let mut next = || parts.next().unwrap_or("").to_string();
        Self {
            pregnancies: next(),
            glucose: next(),
            blood_pressure: next(),
            skin_thickness: next(),
        }
    }

    /// Raw value of a single feature
    pub fn get(&self, feature: Feature) -> &str {
        match feature {
            Feature::Pregnancies => &self.pregnancies,
            Feature::Glucose => &self.glucose,
            Feature::BloodPressure => &self.blood_pressure,
            Feature::SkinThickness => &self.skin_thickness,
        }
    }

    /// Iterate `(feature, raw value)` pairs in model column order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, &str)> + '_ {
        Feature::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

/// Parsed feature values in model column order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f32 {
        self.0[feature.index()]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let indices: Vec<usize> = Feature::ALL.iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(Feature::ALL[1].name(), "Glucose");
    }

    #[test]
    fn test_from_line() {
        let inputs = FeatureInputs::from_line("2,120,70,20\n");
        assert_eq!(inputs, FeatureInputs::new("2", "120", "70", "20"));

        let short = FeatureInputs::from_line("2,120");
        assert_eq!(short.blood_pressure, "");
        assert_eq!(short.skin_thickness, "");

        let long = FeatureInputs::from_line("1,2,3,4,5");
        assert_eq!(long.skin_thickness, "4,5");
    }

    #[test]
    fn test_iter_matches_fields() {
        let inputs = FeatureInputs::new("a", "b", "c", "d");
        let pairs: Vec<(Feature, &str)> = inputs.iter().collect();
        assert_eq!(pairs[0], (Feature::Pregnancies, "a"));
        assert_eq!(pairs[3], (Feature::SkinThickness, "d"));
    }
}
