//! TensorFlow Lite models executed by tract

use crate::error::{PredictError, Result};
use crate::models::inference::extract_scalar;
use crate::types::features::FEATURE_COUNT;
use tract_core::prelude::*;
use tracing::debug;

/// Optimized tract plan for a TFLite flatbuffer
pub struct TfLiteModel {
    /// Asset name the model was loaded from
    pub name: String,
    plan: TypedRunnableModel<TypedModel>,
}

impl TfLiteModel {
    /// Parse and optimize a TFLite flatbuffer.
    ///
    /// The bytes are only borrowed while parsing; tract copies the weights
    /// into its own tensors.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        let plan = tract_tflite::tflite()
            .model_for_read(&mut &bytes[..])
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| PredictError::resource_load(name, format!("{:#}", e)))?;

        Ok(Self {
            name: name.to_string(),
            plan,
        })
    }

    /// Run the model on a single `[1, FEATURE_COUNT]` input and return the
    /// single value of its `[1, 1]` output
    pub fn infer(&self, input: [[f32; FEATURE_COUNT]; 1]) -> Result<f32> {
        let tensor = Tensor::from_shape(&[1, FEATURE_COUNT], &input[0]).map_err(tract_error)?;
        let outputs = self.plan.run(tvec!(tensor.into())).map_err(tract_error)?;

        let output = outputs
            .first()
            .ok_or_else(|| PredictError::Inference("model produced no outputs".to_string()))?;
        let data = output.as_slice::<f32>().map_err(tract_error)?;

        let value = extract_scalar(output.shape(), data)?;
        debug!(model = %self.name, output = value, "Inference complete");
        Ok(value)
    }
}

fn tract_error(e: TractError) -> PredictError {
    PredictError::Inference(format!("{:#}", e))
}
