//! Where model bytes come from

use crate::error::{PredictError, Result};
use memmap2::Mmap;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Read-only model bytes, either mapped from a file or held in memory
pub enum ModelBytes {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl ModelBytes {
    pub fn is_mapped(&self) -> bool {
        matches!(self, ModelBytes::Mapped(_))
    }
}

impl Deref for ModelBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            ModelBytes::Mapped(map) => &map[..],
            ModelBytes::Owned(bytes) => &bytes[..],
        }
    }
}

/// Provider of named model assets
pub trait ModelSource {
    /// Open the named asset read-only
    fn open(&self, asset_name: &str) -> Result<ModelBytes>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Assets are flat names inside the bundle; anything else is rejected
fn check_asset_name(asset_name: &str) -> Result<()> {
    let mut components = Path::new(asset_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(PredictError::resource_load(
            asset_name,
            "asset name must be a plain file name",
        )),
    }
}

/// Assets stored as files in a directory
#[derive(Debug, Clone)]
pub struct AssetDirSource {
    root: PathBuf,
    memory_map: bool,
}

impl AssetDirSource {
    /// Source rooted at `root`, memory-mapping assets by default
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            memory_map: true,
        }
    }

    /// Read assets into a buffer instead of mapping them
    pub fn with_memory_map(mut self, memory_map: bool) -> Self {
        self.memory_map = memory_map;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ModelSource for AssetDirSource {
    fn open(&self, asset_name: &str) -> Result<ModelBytes> {
        check_asset_name(asset_name)?;
        let path = self.root.join(asset_name);

        let mut file =
            File::open(&path).map_err(|e| PredictError::resource_load(asset_name, e))?;
        let len = file
            .metadata()
            .map_err(|e| PredictError::resource_load(asset_name, e))?
            .len();
        if len == 0 {
            return Err(PredictError::resource_load(asset_name, "asset is empty"));
        }

        if self.memory_map {
            // The asset directory is read-only for the lifetime of the process.
            match unsafe { Mmap::map(&file) } {
                Ok(map) => {
                    debug!(path = %path.display(), bytes = len, "Mapped model asset");
                    return Ok(ModelBytes::Mapped(map));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Memory mapping failed, reading into buffer");
                }
            }
        }

        let mut bytes = Vec::with_capacity(len as usize);
        file.read_to_end(&mut bytes)
            .map_err(|e| PredictError::resource_load(asset_name, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read model asset");
        Ok(ModelBytes::Owned(bytes))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Assets held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    assets: HashMap<String, Vec<u8>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset under `name`
    pub fn with_asset(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.assets.insert(name.to_string(), bytes.into());
        self
    }
}

impl ModelSource for InMemorySource {
    fn open(&self, asset_name: &str) -> Result<ModelBytes> {
        check_asset_name(asset_name)?;
        match self.assets.get(asset_name) {
            Some(bytes) if bytes.is_empty() => {
                Err(PredictError::resource_load(asset_name, "asset is empty"))
            }
            Some(bytes) => Ok(ModelBytes::Owned(bytes.clone())),
            None => Err(PredictError::resource_load(asset_name, "asset not found")),
        }
    }

    fn describe(&self) -> String {
        format!("in-memory ({} assets)", self.assets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_asset_dir_mapped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model.onnx"), b"model-bytes").unwrap();

        let source = AssetDirSource::new(dir.path());
        let bytes = source.open("model.onnx").unwrap();

        assert!(bytes.is_mapped());
        assert_eq!(&*bytes, b"model-bytes");
    }

    #[test]
    fn test_asset_dir_buffered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model.onnx"), b"model-bytes").unwrap();

        let source = AssetDirSource::new(dir.path()).with_memory_map(false);
        let bytes = source.open("model.onnx").unwrap();

        assert!(!bytes.is_mapped());
        assert_eq!(&*bytes, b"model-bytes");
    }

    #[test]
    fn test_asset_dir_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.onnx"), b"").unwrap();
        let source = AssetDirSource::new(dir.path());

        assert!(matches!(
            source.open("missing.onnx"),
            Err(PredictError::ResourceLoad { .. })
        ));
        assert!(matches!(
            source.open("empty.onnx"),
            Err(PredictError::ResourceLoad { .. })
        ));
    }

    #[test]
    fn test_asset_name_must_be_flat() {
        let source = InMemorySource::new().with_asset("model.onnx", vec![1, 2, 3]);

        assert!(source.open("model.onnx").is_ok());
        assert!(source.open("../model.onnx").is_err());
        assert!(source.open("nested/model.onnx").is_err());
        assert!(source.open("").is_err());
    }
}
