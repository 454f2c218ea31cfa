//! Presence check over the raw input fields.
//!
//! Only emptiness is checked here; numeric parsing happens afterwards so
//! the two failures can be reported with different messages.

use crate::types::features::{Feature, FeatureInputs};

/// True only if every field holds a non-empty string
pub fn validate(inputs: &FeatureInputs) -> bool {
    inputs.iter().all(|(_, raw)| !raw.is_empty())
}

/// Features whose field is empty, in model column order
pub fn empty_fields(inputs: &FeatureInputs) -> Vec<Feature> {
    inputs
        .iter()
        .filter(|(_, raw)| raw.is_empty())
        .map(|(feature, _)| feature)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FeatureInputs {
        FeatureInputs::new("2", "120", "70", "20")
    }

    #[test]
    fn test_all_filled() {
        assert!(validate(&filled()));
        assert!(empty_fields(&filled()).is_empty());
    }

    #[test]
    fn test_every_blank_subset_fails() {
        for mask in 1u8..16 {
            let mut inputs = filled();
            if mask & 1 != 0 {
                inputs.pregnancies.clear();
            }
            if mask & 2 != 0 {
                inputs.glucose.clear();
            }
            if mask & 4 != 0 {
                inputs.blood_pressure.clear();
            }
            if mask & 8 != 0 {
                inputs.skin_thickness.clear();
            }

            assert!(!validate(&inputs), "mask {mask:04b} should fail");
            assert_eq!(empty_fields(&inputs).len(), mask.count_ones() as usize);
        }
    }

    #[test]
    fn test_non_numeric_passes_presence_check() {
        let inputs = FeatureInputs::new("two", " ", "70", "20");
        assert!(validate(&inputs));
    }
}
