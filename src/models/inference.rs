//! Inference adapter over ONNX Runtime and tract

use crate::error::{PredictError, Result};
use crate::models::loader::{LoadedModel, OnnxModel};
use crate::types::features::FEATURE_COUNT;
use ort::value::Tensor;
use std::fmt;
use std::sync::RwLock;
use tracing::debug;

/// A model that maps one normalized feature vector to one normalized output
pub trait Predictor {
    fn predict(&self, features: &[f32]) -> Result<f32>;
}

impl<F> Predictor for F
where
    F: Fn(&[f32]) -> Result<f32>,
{
    fn predict(&self, features: &[f32]) -> Result<f32> {
        self(features)
    }
}

/// Run the model on a single `[1, FEATURE_COUNT]` input and return the
/// single value of its `[1, 1]` output
pub fn infer(model: &mut LoadedModel, input: [[f32; FEATURE_COUNT]; 1]) -> Result<f32> {
    match model {
        LoadedModel::Onnx(onnx) => infer_onnx(onnx, input),
        LoadedModel::TfLite(tflite) => tflite.infer(input),
    }
}

fn infer_onnx(model: &mut OnnxModel, input: [[f32; FEATURE_COUNT]; 1]) -> Result<f32> {
    let shape = vec![1_i64, FEATURE_COUNT as i64];
    let input_tensor = Tensor::from_array((shape, input[0].to_vec()))?;

    let outputs = model
        .session
        .run(ort::inputs![&model.input_name => input_tensor])?;

    let output = outputs.get(&model.output_name).ok_or_else(|| {
        PredictError::Inference(format!("model output '{}' missing", model.output_name))
    })?;
    let (shape, data) = output.try_extract_tensor::<f32>()?;

    let value = extract_scalar(&shape[..], data)?;
    debug!(model = %model.name, output = value, "Inference complete");
    Ok(value)
}

/// Accepts `[1, 1]`, `[1]` or any other shape holding exactly one element
pub(crate) fn extract_scalar<S: fmt::Debug + ?Sized>(shape: &S, data: &[f32]) -> Result<f32> {
    match data {
        [value] => Ok(*value),
        _ => Err(PredictError::Inference(format!(
            "expected a single output value, got shape {:?} with {} elements",
            shape,
            data.len()
        ))),
    }
}

/// [`Predictor`] backed by a loaded model asset
pub struct ModelPredictor {
    name: String,
    /// ONNX session runs need `&mut`, the lock provides it behind `&self`
    model: RwLock<LoadedModel>,
}

impl ModelPredictor {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            name: model.name().to_string(),
            model: RwLock::new(model),
        }
    }

    /// Asset name of the wrapped model
    pub fn model_name(&self) -> &str {
        &self.name
    }
}

impl Predictor for ModelPredictor {
    fn predict(&self, features: &[f32]) -> Result<f32> {
        let input: [f32; FEATURE_COUNT] = features.try_into().map_err(|_| {
            PredictError::Inference(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                features.len()
            ))
        })?;

        let mut model = self
            .model
            .write()
            .map_err(|e| PredictError::Inference(format!("Lock error: {}", e)))?;

        infer(&mut model, [input])
    }
}
