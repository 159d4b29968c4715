//! # Flooring (PCC) Calculation
//!
//! Plain cement concrete bed under a floor finish. The mix is always the
//! standard PCC ratio 1:2:4.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MaterialQuantities;
use crate::errors::{require_positive, CalcResult};
use crate::mix_ratio::MixRatio;
use crate::units::{cement_bags, round_to, CubicFeet, CubicMeters, Feet, Inches, DRY_VOLUME_MULTIPLIER};

/// Default PCC bed thickness
pub const DEFAULT_THICKNESS_IN: f64 = 2.0;

fn default_thickness_in() -> f64 {
    DEFAULT_THICKNESS_IN
}

/// Input parameters for a PCC floor bed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlooringInput {
    #[serde(default)]
    pub label: String,

    #[serde(alias = "area")]
    pub area_sqft: f64,

    #[serde(default = "default_thickness_in", alias = "thickness")]
    pub thickness_in: f64,
}

impl FlooringInput {
    /// Validate input parameters
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("area_sqft", self.area_sqft)?;
        require_positive("thickness_in", self.thickness_in)
    }

    /// Wet volume of the bed
    pub fn wet_volume(&self) -> CubicFeet {
        let thickness: Feet = Inches(self.thickness_in).into();
        CubicFeet(self.area_sqft * thickness.0)
    }
}

/// Results from a flooring calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlooringResult {
    pub cement_bags: u64,
    pub sand_cft: f64,
    pub aggregate_cft: f64,
    pub volume_cft: f64,
    pub volume_m3: f64,
}

impl FlooringResult {
    /// Raw quantities for aggregation
    pub fn quantities(&self) -> MaterialQuantities {
        MaterialQuantities {
            cement_bags: self.cement_bags,
            sand_cft: self.sand_cft,
            aggregate_cft: self.aggregate_cft,
            ..MaterialQuantities::default()
        }
    }
}

/// Calculate materials for a PCC floor bed.
pub fn calculate(input: &FlooringInput) -> CalcResult<FlooringResult> {
    input.validate()?;

    let wet = input.wet_volume();
    let split = MixRatio::PCC.split(wet * DRY_VOLUME_MULTIPLIER);

    let result = FlooringResult {
        cement_bags: cement_bags(split.cement.into()),
        sand_cft: round_to(split.sand.0, 2),
        aggregate_cft: round_to(split.aggregate.0, 2),
        volume_cft: round_to(wet.0, 2),
        volume_m3: round_to(CubicMeters::from(wet).0, 3),
    };

    debug!(
        label = %input.label,
        area_sqft = input.area_sqft,
        cement_bags = result.cement_bags,
        "flooring calculated"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;

    #[test]
    fn test_reference_floor() {
        let input = FlooringInput {
            label: "Ground floor".to_string(),
            area_sqft: 100.0,
            thickness_in: 2.0,
        };
        let result = calculate(&input).unwrap();

        // 100 x 2/12 = 16.67 cft wet, 25.67 cft dry, 1:2:4
        assert_eq!(result.volume_cft, 16.67);
        // cement 3.667 cft = 0.1038 m3 = 149.5 kg
        assert_eq!(result.cement_bags, 3);
        assert!((result.sand_cft - 7.33).abs() < 0.01);
        assert!((result.aggregate_cft - 14.67).abs() < 0.01);
    }

    #[test]
    fn test_default_thickness() {
        let input: FlooringInput = serde_json::from_str(r#"{ "area": 500 }"#).unwrap();
        assert_eq!(input.thickness_in, DEFAULT_THICKNESS_IN);
        assert!(calculate(&input).is_ok());
    }

    #[test]
    fn test_invalid_inputs() {
        let input = FlooringInput {
            label: String::new(),
            area_sqft: -10.0,
            thickness_in: 2.0,
        };
        assert!(matches!(calculate(&input), Err(CalcError::InvalidGeometry { .. })));

        let input = FlooringInput {
            label: String::new(),
            area_sqft: 10.0,
            thickness_in: 0.0,
        };
        assert!(matches!(calculate(&input), Err(CalcError::InvalidGeometry { .. })));
    }
}
