//! Model loading and inference components

pub mod inference;
pub mod loader;
pub mod source;
pub mod tflite;

pub use inference::{infer, ModelPredictor, Predictor};
pub use loader::{load_model, LoadedModel, ModelFormat, ModelLoader, OnnxModel};
pub use source::{AssetDirSource, InMemorySource, ModelBytes, ModelSource};
pub use tflite::TfLiteModel;

/// Linear model `y = 0.5 x0 + 0.25 x1 - 0.125 x2 + x3 + 0.1` in both
/// formats, written by `tests/fixtures/make_fixtures.py`
#[cfg(test)]
pub(crate) mod fixtures {
    pub const LINEAR_ONNX: &[u8] =
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/linear.onnx"));
    pub const LINEAR_TFLITE: &[u8] =
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/linear.tflite"));

    pub const LINEAR_KNOWN_INPUT: [f32; 4] = [0.2, 0.4, 0.8, 0.5];
    pub const LINEAR_KNOWN_OUTPUT: f32 = 0.7;
}
