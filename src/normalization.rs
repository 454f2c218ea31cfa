//! Min-max scaling of model inputs and outputs.
//!
//! The ranges below are the per-column minimum and maximum of the training
//! data. They must match the preprocessing done when the model was trained,
//! so they are constants rather than runtime configuration.

use crate::error::{PredictError, Result};
use crate::types::features::{Feature, FeatureVector, FEATURE_COUNT};

/// Closed `(min, max)` interval used for min-max scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationRange {
    pub min: f32,
    pub max: f32,
}

impl NormalizationRange {
    /// Build a range, rejecting `max <= min` and non-finite bounds
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(PredictError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn normalize(&self, value: f32) -> f32 {
        normalize(value, self.min, self.max)
    }

    pub fn denormalize(&self, value: f32) -> f32 {
        denormalize(value, self.min, self.max)
    }
}

/// Per-feature ranges, indexed by [`Feature::index`]
pub const FEATURE_RANGES: [NormalizationRange; FEATURE_COUNT] = [
    NormalizationRange { min: 0.0, max: 10.0 },
    NormalizationRange { min: 78.0, max: 197.0 },
    NormalizationRange { min: 0.0, max: 96.0 },
    NormalizationRange { min: 0.0, max: 47.0 },
];

/// Range of the regression target
pub const TARGET_RANGE: NormalizationRange = NormalizationRange {
    min: 0.134,
    max: 2.288,
};

/// `(value - min) / (max - min)`. Values outside `[min, max]` map outside
/// `[0, 1]` and are passed through unclamped.
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    (value - min) / (max - min)
}

/// Inverse of [`normalize`] for the same `(min, max)`
pub fn denormalize(value: f32, min: f32, max: f32) -> f32 {
    value * (max - min) + min
}

/// Applies the training-time scaling to a whole feature vector and maps
/// model outputs back to target units.
#[derive(Debug, Clone)]
pub struct FeatureScaler {
    feature_ranges: [NormalizationRange; FEATURE_COUNT],
    target_range: NormalizationRange,
}

impl FeatureScaler {
    /// Scaler with the trained model's constant ranges
    pub fn new() -> Self {
        Self {
            feature_ranges: FEATURE_RANGES,
            target_range: TARGET_RANGE,
        }
    }

    /// Scaler with custom ranges, e.g. for a retrained model
    pub fn with_ranges(
        feature_ranges: [NormalizationRange; FEATURE_COUNT],
        target_range: NormalizationRange,
    ) -> Result<Self> {
        for range in feature_ranges.iter().chain(std::iter::once(&target_range)) {
            NormalizationRange::new(range.min, range.max)?;
        }
        Ok(Self {
            feature_ranges,
            target_range,
        })
    }

    pub fn range(&self, feature: Feature) -> NormalizationRange {
        self.feature_ranges[feature.index()]
    }

    pub fn target_range(&self) -> NormalizationRange {
        self.target_range
    }

    /// Normalize every feature with its own range
    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut scaled = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            scaled[feature.index()] = self.range(feature).normalize(features.get(feature));
        }
        FeatureVector(scaled)
    }

    /// Map a model output back to target units
    pub fn inverse_target(&self, output: f32) -> f32 {
        self.target_range.denormalize(output)
    }
}

impl Default for FeatureScaler {
    fn default() -> Self {
        Self::new()
    }
}
