//! Submission handling: validate, normalize, infer, denormalize, display.
//!
//! Every submission starts from [`ControllerState::Idle`], walks the forward
//! path and ends back in `Idle`. A failure at any step jumps straight to
//! [`ControllerState::DisplayingError`] with one of the fixed user messages;
//! error detail only goes to the logs.

use crate::config::DisplayConfig;
use crate::error::{PredictError, Result};
use crate::metrics::SessionMetrics;
use crate::models::inference::Predictor;
use crate::normalization::FeatureScaler;
use crate::types::features::{FeatureInputs, FeatureVector, FEATURE_COUNT};
use crate::types::prediction::{DisplayMessage, PredictionResult};
use crate::validator;
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Controller states, in forward order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Validating,
    Normalizing,
    Inferring,
    Denormalizing,
    Displaying,
    DisplayingError,
}

/// Everything produced by one submission
#[derive(Debug)]
pub struct Submission {
    /// What to show the user
    pub message: DisplayMessage,
    /// Present only when a result is displayed
    pub prediction: Option<PredictionResult>,
    /// State the submission failed in, if it failed
    pub failed_in: Option<ControllerState>,
    /// Underlying failure, for logging only
    pub error: Option<PredictError>,
}

/// Turn raw field text into numbers.
///
/// Surrounding whitespace is ignored; a field holding only whitespace passed
/// the presence check but is not a number. A single trailing float or double
/// suffix (`2f`, `2.5D`) is accepted.
pub fn parse_inputs(inputs: &FeatureInputs) -> Result<FeatureVector> {
    let mut values = [0.0_f32; FEATURE_COUNT];
    for (feature, raw) in inputs.iter() {
        values[feature.index()] =
            parse_decimal(raw).ok_or_else(|| PredictError::NumberFormat {
                feature,
                value: raw.to_string(),
            })?;
    }
    Ok(FeatureVector(values))
}

fn parse_decimal(raw: &str) -> Option<f32> {
    let text = raw.trim();
    let digits = text
        .strip_suffix(['f', 'F', 'd', 'D'])
        .filter(|rest| rest.ends_with(|c: char| c.is_ascii_digit() || c == '.'))
        .unwrap_or(text);
    digits.parse::<f32>().ok()
}

/// Drives submissions through the prediction pipeline
pub struct PredictionController<P: Predictor> {
    predictor: P,
    scaler: FeatureScaler,
    decimal_places: Option<usize>,
    state: ControllerState,
    metrics: SessionMetrics,
}

impl<P: Predictor> PredictionController<P> {
    /// Controller using the trained model's ranges and 3 decimal places
    pub fn new(predictor: P) -> Self {
        Self::with_display(predictor, &DisplayConfig::default())
    }

    pub fn with_display(predictor: P, display: &DisplayConfig) -> Self {
        Self {
            predictor,
            scaler: FeatureScaler::new(),
            decimal_places: display.decimal_places,
            state: ControllerState::Idle,
            metrics: SessionMetrics::new(),
        }
    }

    /// Replace the scaler, e.g. for a retrained model
    pub fn with_scaler(mut self, scaler: FeatureScaler) -> Self {
        self.scaler = scaler;
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Handle one submission end to end
    pub fn submit(&mut self, inputs: &FeatureInputs) -> Submission {
        self.state = ControllerState::Idle;

        let submission = match self.run(inputs) {
            Ok(prediction) => {
                self.enter(ControllerState::Displaying);
                let message = DisplayMessage::result(prediction.value, self.decimal_places);
                debug!(
                    raw_output = prediction.raw_output,
                    value = prediction.value,
                    "Prediction displayed"
                );
                Submission {
                    message,
                    prediction: Some(prediction),
                    failed_in: None,
                    error: None,
                }
            }
            Err((failed_in, error)) => {
                self.enter(ControllerState::DisplayingError);
                let message = match &error {
                    PredictError::EmptyField { .. } => DisplayMessage::EmptyField,
                    PredictError::NumberFormat { .. } => DisplayMessage::InvalidNumber,
                    _ => DisplayMessage::Error,
                };
                if error.is_input_error() {
                    debug!(state = ?failed_in, error = %error, "Submission rejected");
                } else {
                    warn!(state = ?failed_in, error = %error, "Submission failed");
                }
                Submission {
                    message,
                    prediction: None,
                    failed_in: Some(failed_in),
                    error: Some(error),
                }
            }
        };

        self.metrics.record_submission(&submission.message);
        self.state = ControllerState::Idle;
        submission
    }

    fn enter(&mut self, state: ControllerState) -> ControllerState {
        trace!(from = ?self.state, to = ?state, "State transition");
        self.state = state;
        state
    }

    fn run(
        &mut self,
        inputs: &FeatureInputs,
    ) -> std::result::Result<PredictionResult, (ControllerState, PredictError)> {
        let state = self.enter(ControllerState::Validating);
        if !validator::validate(inputs) {
            let fields = validator::empty_fields(inputs);
            return Err((state, PredictError::EmptyField { fields }));
        }

        let state = self.enter(ControllerState::Normalizing);
        let features = parse_inputs(inputs).map_err(|e| (state, e))?;
        let normalized = self.scaler.transform(&features);

        let state = self.enter(ControllerState::Inferring);
        let started = Instant::now();
        let raw_output = self
            .predictor
            .predict(normalized.as_slice())
            .map_err(|e| (state, e))?;
        self.metrics.record_inference_time(started.elapsed());

        let state = self.enter(ControllerState::Denormalizing);
        let value = self.scaler.inverse_target(raw_output);
        if !value.is_finite() {
            return Err((state, PredictError::NonFinite(value)));
        }

        Ok(PredictionResult {
            normalized,
            raw_output,
            value,
        })
    }
}
