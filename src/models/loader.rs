//! Model asset loader

use crate::error::{PredictError, Result};
use crate::models::source::ModelSource;
use crate::models::tflite::TfLiteModel;
use ort::session::{builder::GraphOptimizationLevel, Session};
use tracing::{debug, info};

/// Serialization format of a model asset, detected from its header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// ONNX protobuf graph
    Onnx,
    /// ONNX Runtime flatbuffer (`.ort`)
    OrtFlatbuffer,
    /// TensorFlow Lite flatbuffer
    TfLite,
}

impl ModelFormat {
    /// Flatbuffer formats carry a 4-byte file identifier at offset 4.
    /// Anything else is assumed to be an ONNX protobuf.
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes.get(4..8) {
            Some(b"TFL3") => ModelFormat::TfLite,
            Some(b"ORTM") => ModelFormat::OrtFlatbuffer,
            _ => ModelFormat::Onnx,
        }
    }

    /// Runtime that executes this format
    pub fn engine(self) -> &'static str {
        match self {
            ModelFormat::TfLite => "tract",
            ModelFormat::Onnx | ModelFormat::OrtFlatbuffer => "onnxruntime",
        }
    }
}

/// ONNX Runtime session with its tensor names
pub struct OnnxModel {
    /// Asset name the model was loaded from
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature tensor
    pub input_name: String,
    /// Output name for the regression value
    pub output_name: String,
}

/// A model ready to run, in whichever engine its format needs
pub enum LoadedModel {
    Onnx(OnnxModel),
    TfLite(TfLiteModel),
}

impl LoadedModel {
    /// Asset name the model was loaded from
    pub fn name(&self) -> &str {
        match self {
            LoadedModel::Onnx(model) => &model.name,
            LoadedModel::TfLite(model) => &model.name,
        }
    }
}

/// Loader for model assets
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load a model asset from `source` and build it for the engine its
    /// header names: tract for TFLite, ONNX Runtime otherwise.
    ///
    /// Every failure, from a missing file to a graph the runtime rejects,
    /// is reported as [`PredictError::ResourceLoad`].
    pub fn load(&self, source: &dyn ModelSource, asset_name: &str) -> Result<LoadedModel> {
        info!(
            model = %asset_name,
            source = %source.describe(),
            threads = self.onnx_threads,
            "Loading model"
        );

        let bytes = source.open(asset_name)?;

        let format = ModelFormat::detect(&bytes);

        let model = match format {
            ModelFormat::TfLite => {
                LoadedModel::TfLite(TfLiteModel::from_bytes(asset_name, &bytes)?)
            }
            ModelFormat::Onnx | ModelFormat::OrtFlatbuffer => {
                LoadedModel::Onnx(self.build_session(asset_name, &bytes)?)
            }
        };

        info!(
            model = %asset_name,
            format = ?format,
            engine = format.engine(),
            mapped = bytes.is_mapped(),
            "Model loaded successfully"
        );

        Ok(model)
    }

    fn build_session(&self, asset_name: &str, bytes: &[u8]) -> Result<OnnxModel> {
        ort::init()
            .commit()
            .map_err(|e| PredictError::resource_load(asset_name, e))?;

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(self.onnx_threads))
            .and_then(|b| b.commit_from_memory(bytes))
            .map_err(|e| PredictError::resource_load(asset_name, e))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| PredictError::resource_load(asset_name, "model has no inputs"))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| PredictError::resource_load(asset_name, "model has no outputs"))?;

        debug!(input = %input_name, output = %output_name, "ONNX session ready");

        Ok(OnnxModel {
            name: asset_name.to_string(),
            session,
            input_name,
            output_name,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load `asset_name` from `source` with default loader settings
pub fn load_model(source: &dyn ModelSource, asset_name: &str) -> Result<LoadedModel> {
    ModelLoader::default().load(source, asset_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{LINEAR_ONNX, LINEAR_TFLITE};
    use crate::models::source::InMemorySource;

    fn tflite_header() -> Vec<u8> {
        let mut bytes = vec![0x1c, 0x00, 0x00, 0x00];
        bytes.extend_from_slice(b"TFL3");
        bytes.extend_from_slice(&[0; 24]);
        bytes
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(ModelFormat::detect(&tflite_header()), ModelFormat::TfLite);
        assert_eq!(ModelFormat::detect(LINEAR_TFLITE), ModelFormat::TfLite);
        assert_eq!(
            ModelFormat::detect(b"\x10\x00\x00\x00ORTM\x00\x00"),
            ModelFormat::OrtFlatbuffer
        );
        assert_eq!(ModelFormat::detect(LINEAR_ONNX), ModelFormat::Onnx);
        assert_eq!(ModelFormat::detect(b"abc"), ModelFormat::Onnx);
        assert_eq!(ModelFormat::TfLite.engine(), "tract");
        assert_eq!(ModelFormat::OrtFlatbuffer.engine(), "onnxruntime");
    }

    #[test]
    fn test_missing_asset_is_resource_error() {
        let source = InMemorySource::new();
        let result = load_model(&source, "MIDTERM_linear.tflite");

        match result {
            Err(PredictError::ResourceLoad { asset, .. }) => {
                assert_eq!(asset, "MIDTERM_linear.tflite")
            }
            _ => panic!("expected a resource load error"),
        }
    }

    #[test]
    fn test_tflite_asset_loads_with_tract() {
        let source = InMemorySource::new().with_asset("MIDTERM_linear.tflite", LINEAR_TFLITE);
        let model = ModelLoader::with_threads(2)
            .load(&source, "MIDTERM_linear.tflite")
            .unwrap();

        assert!(matches!(model, LoadedModel::TfLite(_)));
        assert_eq!(model.name(), "MIDTERM_linear.tflite");
    }

    #[test]
    fn test_onnx_asset_loads_with_onnxruntime() {
        let source = InMemorySource::new().with_asset("MIDTERM_linear.onnx", LINEAR_ONNX);
        let model = load_model(&source, "MIDTERM_linear.onnx").unwrap();

        match model {
            LoadedModel::Onnx(onnx) => {
                assert_eq!(onnx.name, "MIDTERM_linear.onnx");
                assert_eq!(onnx.input_name, "input");
                assert_eq!(onnx.output_name, "output");
            }
            LoadedModel::TfLite(_) => panic!("ONNX asset routed to tract"),
        }
    }

    #[test]
    fn test_corrupt_tflite_is_resource_error() {
        // Right identifier, no valid flatbuffer behind it
        let source = InMemorySource::new().with_asset("MIDTERM_linear.tflite", tflite_header());

        match load_model(&source, "MIDTERM_linear.tflite") {
            Err(PredictError::ResourceLoad { asset, .. }) => {
                assert_eq!(asset, "MIDTERM_linear.tflite")
            }
            _ => panic!("expected a resource load error"),
        }
    }
}
