//! # Plaster Calculation
//!
//! Cement and sand for a plastered surface of given area and thickness.
//! Area is taken in square feet and converted to metric, thickness in
//! millimetres.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MaterialQuantities;
use crate::errors::{require_positive, CalcResult};
use crate::mix_ratio::MixRatio;
use crate::units::{
    cement_bags, round_to, CubicFeet, CubicMeters, Meters, Millimeters, SqFt, SqM, DRY_VOLUME_MULTIPLIER,
};

/// Default plaster coat
pub const DEFAULT_THICKNESS_MM: f64 = 12.0;

/// Default plaster mix
pub const DEFAULT_PLASTER_RATIO: &str = "1:4";

fn default_thickness_mm() -> f64 {
    DEFAULT_THICKNESS_MM
}

fn default_ratio() -> String {
    DEFAULT_PLASTER_RATIO.to_string()
}

/// Input parameters for a plaster coat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasterInput {
    #[serde(default)]
    pub label: String,

    #[serde(alias = "area")]
    pub area_sqft: f64,

    #[serde(default = "default_thickness_mm", alias = "thickness")]
    pub thickness_mm: f64,

    #[serde(default = "default_ratio")]
    pub ratio: String,
}

impl PlasterInput {
    /// Validate input parameters and resolve the mix.
    pub fn validate(&self) -> CalcResult<MixRatio> {
        require_positive("area_sqft", self.area_sqft)?;
        require_positive("thickness_mm", self.thickness_mm)?;
        MixRatio::parse(&self.ratio)?.require_two_part()
    }

    /// Wet volume of the coat
    pub fn wet_volume(&self) -> CubicMeters {
        let area = SqM::from(SqFt(self.area_sqft));
        let thickness = Meters::from(Millimeters(self.thickness_mm));
        CubicMeters(area.0 * thickness.0)
    }
}

/// Results from a plaster calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasterResult {
    pub cement_bags: u64,
    pub sand_cft: f64,
    pub sand_m3: f64,
    pub wet_volume_m3: f64,
    pub dry_volume_m3: f64,
}

impl PlasterResult {
    /// Raw quantities for aggregation
    pub fn quantities(&self) -> MaterialQuantities {
        MaterialQuantities {
            cement_bags: self.cement_bags,
            sand_cft: self.sand_cft,
            ..MaterialQuantities::default()
        }
    }
}

/// Calculate cement and sand for a plaster coat.
pub fn calculate(input: &PlasterInput) -> CalcResult<PlasterResult> {
    let ratio = input.validate()?;

    let wet = input.wet_volume();
    let dry = wet * DRY_VOLUME_MULTIPLIER;
    let split = ratio.split(CubicFeet::from(dry));

    let result = PlasterResult {
        cement_bags: cement_bags(split.cement.into()),
        sand_cft: round_to(split.sand.0, 2),
        sand_m3: round_to(CubicMeters::from(split.sand).0, 3),
        wet_volume_m3: round_to(wet.0, 3),
        dry_volume_m3: round_to(dry.0, 3),
    };

    debug!(
        label = %input.label,
        area_sqft = input.area_sqft,
        cement_bags = result.cement_bags,
        "plaster calculated"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;

    fn test_plaster() -> PlasterInput {
        PlasterInput {
            label: "Living room walls".to_string(),
            area_sqft: 200.0,
            thickness_mm: 12.0,
            ratio: "1:4".to_string(),
        }
    }

    #[test]
    fn test_reference_plaster() {
        let result = calculate(&test_plaster()).unwrap();

        // 200 sqft = 18.58 m2; x 0.012 m = 0.223 m3 wet, 0.343 m3 dry
        assert_eq!(result.wet_volume_m3, 0.223);
        assert_eq!(result.dry_volume_m3, 0.343);
        // cement 0.0687 m3 = 98.9 kg
        assert_eq!(result.cement_bags, 2);
        // sand 0.2747 m3 = 9.70 cft
        assert!((result.sand_cft - 9.70).abs() < 0.01);
    }

    #[test]
    fn test_thicker_coat_needs_more() {
        let thin = calculate(&test_plaster()).unwrap();
        let mut thick = test_plaster();
        thick.thickness_mm = 20.0;
        let thick = calculate(&thick).unwrap();
        assert!(thick.sand_cft > thin.sand_cft);
        assert!(thick.cement_bags >= thin.cement_bags);
    }

    #[test]
    fn test_defaults() {
        let input: PlasterInput = serde_json::from_str(r#"{ "area": 150 }"#).unwrap();
        assert_eq!(input.thickness_mm, DEFAULT_THICKNESS_MM);
        assert_eq!(input.ratio, DEFAULT_PLASTER_RATIO);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut input = test_plaster();
        input.area_sqft = 0.0;
        assert!(matches!(calculate(&input), Err(CalcError::InvalidGeometry { .. })));

        let mut input = test_plaster();
        input.thickness_mm = -6.0;
        assert!(matches!(calculate(&input), Err(CalcError::InvalidGeometry { .. })));

        let mut input = test_plaster();
        input.ratio = "1:2:4".to_string();
        assert!(matches!(calculate(&input), Err(CalcError::InvalidRatio { .. })));
    }
}
