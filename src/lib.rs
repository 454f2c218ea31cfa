//! biopredict
//!
//! Predicts a health target from four measurements (pregnancies, glucose,
//! blood pressure, skin thickness) using a pre-trained linear regression
//! model, executed by tract for TensorFlow Lite assets or by ONNX Runtime for
//! ONNX graphs. Inputs are min-max normalized with the
//! training-time ranges and the model output is mapped back to target units.

pub mod config;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod models;
pub mod normalization;
pub mod types;
pub mod validator;

pub use config::AppConfig;
pub use controller::{ControllerState, PredictionController, Submission};
pub use error::PredictError;
pub use models::{
    load_model, AssetDirSource, InMemorySource, ModelFormat, ModelPredictor, ModelSource, Predictor,
};
pub use normalization::{denormalize, normalize, FeatureScaler};
pub use types::{DisplayMessage, Feature, FeatureInputs, FeatureVector, PredictionResult};
