//! Error types for the prediction pipeline

use crate::types::features::Feature;
use thiserror::Error;

/// Errors raised while loading the model or handling a submission.
#[derive(Error, Debug)]
pub enum PredictError {
    /// One or more required fields were left blank
    #[error("empty input fields: {fields:?}")]
    EmptyField { fields: Vec<Feature> },

    /// A field could not be parsed as a decimal number
    #[error("{feature} is not a number: {value:?}")]
    NumberFormat { feature: Feature, value: String },

    /// The inference runtime failed or returned an unusable output
    #[error("inference failed: {0}")]
    Inference(String),

    /// A normalization range with `max <= min`
    #[error("invalid normalization range: min={min}, max={max}")]
    InvalidRange { min: f32, max: f32 },

    /// A computed value was NaN or infinite
    #[error("non-finite value: {0}")]
    NonFinite(f32),

    /// The model asset is missing, unreadable or not loadable
    #[error("failed to load model asset '{asset}': {reason}")]
    ResourceLoad { asset: String, reason: String },
}

impl PredictError {
    pub(crate) fn resource_load(asset: &str, reason: impl ToString) -> Self {
        PredictError::ResourceLoad {
            asset: asset.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the user can fix the failure by editing the inputs
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PredictError::EmptyField { .. } | PredictError::NumberFormat { .. }
        )
    }
}

impl From<ort::Error> for PredictError {
    fn from(e: ort::Error) -> Self {
        PredictError::Inference(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors() {
        let empty = PredictError::EmptyField {
            fields: vec![Feature::Glucose],
        };
        let format = PredictError::NumberFormat {
            feature: Feature::Pregnancies,
            value: "abc".to_string(),
        };

        assert!(empty.is_input_error());
        assert!(format.is_input_error());
        assert!(!PredictError::Inference("boom".to_string()).is_input_error());
    }

    #[test]
    fn test_resource_load_message() {
        let err = PredictError::resource_load("MIDTERM_linear.tflite", "not found");
        assert_eq!(
            err.to_string(),
            "failed to load model asset 'MIDTERM_linear.tflite': not found"
        );
    }
}
