//! Prediction output and display strings

use crate::types::features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one successful submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Normalized inputs fed to the model
    pub normalized: FeatureVector,
    /// Raw model output (normalized target scale)
    pub raw_output: f32,
    /// Output mapped back to the target range
    pub value: f32,
}

/// Text shown to the user after a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMessage {
    /// Already formatted prediction value
    Result(String),
    EmptyField,
    InvalidNumber,
    Error,
}

impl DisplayMessage {
    /// Build a result message using a fixed number of decimals, or the
    /// shortest round-trip rendering when `decimal_places` is `None`
    pub fn result(value: f32, decimal_places: Option<usize>) -> Self {
        let text = match decimal_places {
            Some(places) => format!("{:.*}", places, value),
            None => value.to_string(),
        };
        DisplayMessage::Result(text)
    }

    pub fn is_result(&self) -> bool {
        matches!(self, DisplayMessage::Result(_))
    }
}

impl fmt::Display for DisplayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMessage::Result(value) => write!(f, "Result: {}", value),
            DisplayMessage::EmptyField => f.write_str("Please enter valid inputs."),
            DisplayMessage::InvalidNumber => {
                f.write_str("Invalid input. Please enter numeric values.")
            }
            DisplayMessage::Error => f.write_str("An error occurred."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_strings() {
        assert_eq!(
            DisplayMessage::EmptyField.to_string(),
            "Please enter valid inputs."
        );
        assert_eq!(
            DisplayMessage::InvalidNumber.to_string(),
            "Invalid input. Please enter numeric values."
        );
        assert_eq!(DisplayMessage::Error.to_string(), "An error occurred.");
    }

    #[test]
    fn test_result_formatting() {
        assert_eq!(
            DisplayMessage::result(1.2110001, Some(3)).to_string(),
            "Result: 1.211"
        );
        assert_eq!(
            DisplayMessage::result(1.5, Some(3)).to_string(),
            "Result: 1.500"
        );
        assert_eq!(DisplayMessage::result(1.5, None).to_string(), "Result: 1.5");
    }
}
