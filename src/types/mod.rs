//! Type definitions for the prediction pipeline

pub mod features;
pub mod prediction;

pub use features::{Feature, FeatureInputs, FeatureVector, FEATURE_COUNT};
pub use prediction::{DisplayMessage, PredictionResult};
