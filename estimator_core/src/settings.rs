//! # Estimator Settings
//!
//! Tunable rule-of-thumb constants for the budget aggregator: wastage per
//! material class and the heuristics that turn a floor's area and room count
//! into equivalent walls, slab and frame members.
//!
//! Every field has a default, so a settings file only needs the values it
//! overrides:
//!
//! ```json
//! {
//!   "wastage": { "sand_pct": 12.0 },
//!   "floor": { "storey_height_ft": 11.0, "concrete_grade": "M25" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::mix_ratio::{ConcreteGrade, MixRatio};
use crate::units::MaterialClass;

/// Largest wastage allowance accepted for any material (percent)
pub const MAX_WASTAGE_PCT: f64 = 25.0;

/// Complete settings bundle passed to [`crate::budget::calculate_with`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    pub wastage: WastagePolicy,
    pub floor: FloorHeuristics,
}

impl EstimatorSettings {
    /// Check every value is in range.
    pub fn validate(&self) -> CalcResult<()> {
        self.wastage.validate()?;
        self.floor.validate()
    }
}

/// Wastage allowance per material class, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WastagePolicy {
    pub cement_pct: f64,
    pub sand_pct: f64,
    pub aggregate_pct: f64,
    pub brick_pct: f64,
    pub steel_pct: f64,
}

impl Default for WastagePolicy {
    fn default() -> Self {
        WastagePolicy {
            cement_pct: MaterialClass::Cement.default_wastage_pct(),
            sand_pct: MaterialClass::Sand.default_wastage_pct(),
            aggregate_pct: MaterialClass::Aggregate.default_wastage_pct(),
            brick_pct: MaterialClass::Brick.default_wastage_pct(),
            steel_pct: MaterialClass::Steel.default_wastage_pct(),
        }
    }
}

impl WastagePolicy {
    /// A policy that adds nothing
    pub fn none() -> Self {
        WastagePolicy {
            cement_pct: 0.0,
            sand_pct: 0.0,
            aggregate_pct: 0.0,
            brick_pct: 0.0,
            steel_pct: 0.0,
        }
    }

    /// Allowance for one material class (percent)
    pub fn pct(&self, class: MaterialClass) -> f64 {
        match class {
            MaterialClass::Cement => self.cement_pct,
            MaterialClass::Sand => self.sand_pct,
            MaterialClass::Aggregate => self.aggregate_pct,
            MaterialClass::Brick => self.brick_pct,
            MaterialClass::Steel => self.steel_pct,
        }
    }

    /// Multiplier to apply to a raw quantity (e.g., 1.05 for 5%)
    pub fn factor(&self, class: MaterialClass) -> f64 {
        1.0 + self.pct(class) / 100.0
    }

    fn validate(&self) -> CalcResult<()> {
        for class in MaterialClass::ALL {
            let pct = self.pct(class);
            if !pct.is_finite() || !(0.0..=MAX_WASTAGE_PCT).contains(&pct) {
                return Err(CalcError::invalid_settings(
                    format!("wastage.{}", class.field_name()),
                    pct.to_string(),
                    format!("Wastage must be between 0 and {}%", MAX_WASTAGE_PCT),
                ));
            }
        }
        Ok(())
    }
}

/// Rules that convert a floor description into structural elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorHeuristics {
    /// Floor-to-floor wall height
    pub storey_height_ft: f64,
    /// Partition run per room, as a fraction of the floor's side length
    pub partition_factor: f64,
    pub slab_thickness_in: f64,
    /// Floor area served by one column
    pub sqft_per_column: f64,
    pub column_width_in: f64,
    pub column_depth_in: f64,
    pub beam_width_in: f64,
    pub beam_depth_in: f64,
    pub footing_side_ft: f64,
    pub footing_depth_in: f64,
    /// Masonry mortar mix for every wall
    pub mortar_ratio: String,
    /// Grade for slab, frame and footings
    pub concrete_grade: ConcreteGrade,
}

impl Default for FloorHeuristics {
    fn default() -> Self {
        FloorHeuristics {
            storey_height_ft: 10.0,
            partition_factor: 0.5,
            slab_thickness_in: 5.0,
            sqft_per_column: 120.0,
            column_width_in: 9.0,
            column_depth_in: 12.0,
            beam_width_in: 9.0,
            beam_depth_in: 14.0,
            footing_side_ft: 5.0,
            footing_depth_in: 18.0,
            mortar_ratio: "1:6".to_string(),
            concrete_grade: ConcreteGrade::M20,
        }
    }
}

impl FloorHeuristics {
    fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("floor.storey_height_ft", self.storey_height_ft),
            ("floor.slab_thickness_in", self.slab_thickness_in),
            ("floor.sqft_per_column", self.sqft_per_column),
            ("floor.column_width_in", self.column_width_in),
            ("floor.column_depth_in", self.column_depth_in),
            ("floor.beam_width_in", self.beam_width_in),
            ("floor.beam_depth_in", self.beam_depth_in),
            ("floor.footing_side_ft", self.footing_side_ft),
            ("floor.footing_depth_in", self.footing_depth_in),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_settings(field, value.to_string(), "Must be greater than zero"));
            }
        }

        if !self.partition_factor.is_finite() || self.partition_factor < 0.0 {
            return Err(CalcError::invalid_settings(
                "floor.partition_factor",
                self.partition_factor.to_string(),
                "Must be zero or positive",
            ));
        }

        MixRatio::parse(&self.mortar_ratio)?.require_two_part()?;
        Ok(())
    }
}
