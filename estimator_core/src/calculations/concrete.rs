//! # Reinforced Concrete Calculation
//!
//! Cement, sand, aggregate and reinforcement for a rectangular concrete
//! element (slab, beam, column or footing).
//!
//! ## Method
//!
//! - Wet volume = length × width × thickness
//! - Dry volume = wet × 1.54, split by the cement:sand:aggregate ratio
//! - Rebar = wet volume (m³) × typical steel density for the element type
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::calculations::concrete::{calculate, ConcreteInput, StructureType};
//! use estimator_core::mix_ratio::ConcreteGrade;
//!
//! let input = ConcreteInput {
//!     label: "Roof slab".to_string(),
//!     length_ft: 10.0,
//!     width_ft: 10.0,
//!     thickness_in: 5.0,
//!     grade: ConcreteGrade::M20,
//!     ratio: None,
//!     structure_type: StructureType::Slab,
//!     include_rebar: true,
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.volume_m3, 1.18);
//! assert!(result.rebar_kg > 0.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MaterialQuantities;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::mix_ratio::{ConcreteGrade, MixRatio};
use crate::units::{
    cement_bags, round_to, CubicFeet, CubicMeters, Feet, Inches, DRY_VOLUME_MULTIPLIER,
};

/// Kind of concrete element. Sets the typical reinforcement density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructureType {
    #[default]
    Slab,
    Beam,
    Column,
    Footing,
}

impl StructureType {
    /// All element types for UI selection
    pub const ALL: [StructureType; 4] = [
        StructureType::Slab,
        StructureType::Beam,
        StructureType::Column,
        StructureType::Footing,
    ];

    /// Typical reinforcement steel per cubic metre of concrete (kg/m³)
    pub fn rebar_density_kg_per_m3(&self) -> f64 {
        match self {
            StructureType::Slab => 90.0,
            StructureType::Beam => 160.0,
            StructureType::Column => 200.0,
            StructureType::Footing => 80.0,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            StructureType::Slab => "Slab",
            StructureType::Beam => "Beam",
            StructureType::Column => "Column",
            StructureType::Footing => "Footing",
        }
    }

    /// Parse from common string representations ("SLAB", "column", "pillar")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "SLAB" | "ROOF" => Ok(StructureType::Slab),
            "BEAM" | "PLINTH_BEAM" => Ok(StructureType::Beam),
            "COLUMN" | "PILLAR" => Ok(StructureType::Column),
            "FOOTING" | "FOUNDATION" => Ok(StructureType::Footing),
            _ => Err(CalcError::invalid_geometry(
                "structure_type",
                s,
                "Unknown structure type (expected SLAB, BEAM, COLUMN or FOOTING)",
            )),
        }
    }
}

impl std::fmt::Display for StructureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn default_include_rebar() -> bool {
    true
}

/// Input parameters for a concrete element.
///
/// For a column, `length_ft` is the height and `width_ft` × `thickness_in`
/// the cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteInput {
    #[serde(default)]
    pub label: String,

    #[serde(alias = "length")]
    pub length_ft: f64,

    #[serde(alias = "width")]
    pub width_ft: f64,

    #[serde(alias = "thickness")]
    pub thickness_in: f64,

    #[serde(default)]
    pub grade: ConcreteGrade,

    /// Explicit mix (e.g., "1:2:4"). Overrides `grade` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,

    #[serde(default, alias = "structure")]
    pub structure_type: StructureType,

    #[serde(default = "default_include_rebar")]
    pub include_rebar: bool,
}

impl ConcreteInput {
    /// Validate input parameters and resolve the mix.
    pub fn validate(&self) -> CalcResult<MixRatio> {
        require_positive("length_ft", self.length_ft)?;
        require_positive("width_ft", self.width_ft)?;
        require_positive("thickness_in", self.thickness_in)?;
        self.mix_ratio()
    }

    /// Mix in effect: the explicit ratio if given, otherwise the grade's.
    pub fn mix_ratio(&self) -> CalcResult<MixRatio> {
        match &self.ratio {
            Some(expression) => MixRatio::parse(expression)?.require_three_part(),
            None => Ok(self.grade.mix_ratio()),
        }
    }

    /// Wet (placed) volume
    pub fn wet_volume(&self) -> CubicFeet {
        CubicFeet::of_prism(
            Feet(self.length_ft),
            Feet(self.width_ft),
            Inches(self.thickness_in).into(),
        )
    }
}

/// Results from a concrete calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "structure_type": "SLAB",
///   "mix": "1:1.5:3",
///   "cement_bags": 10,
///   "sand_cft": 17.5,
///   "sand_m3": 0.5,
///   "aggregate_cft": 35.0,
///   "aggregate_m3": 0.99,
///   "rebar_kg": 106.19,
///   "volume_m3": 1.18,
///   "volume_cft": 41.67,
///   "area_sqft": 100.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteResult {
    pub structure_type: StructureType,
    /// Mix actually used, as a ratio expression
    pub mix: String,
    pub cement_bags: u64,
    pub sand_cft: f64,
    pub sand_m3: f64,
    pub aggregate_cft: f64,
    pub aggregate_m3: f64,
    pub rebar_kg: f64,
    pub volume_m3: f64,
    pub volume_cft: f64,
    /// Plan area (length × width)
    pub area_sqft: f64,
}

impl ConcreteResult {
    /// Raw quantities for aggregation
    pub fn quantities(&self) -> MaterialQuantities {
        MaterialQuantities {
            cement_bags: self.cement_bags,
            sand_cft: self.sand_cft,
            aggregate_cft: self.aggregate_cft,
            rod_kg: self.rebar_kg,
            ..MaterialQuantities::default()
        }
    }
}

/// Calculate materials for a concrete element.
///
/// # Returns
///
/// * `Ok(ConcreteResult)` - Raw material quantities (no wastage, no pricing)
/// * `Err(CalcError::InvalidGeometry)` - A dimension is not positive
/// * `Err(CalcError::InvalidRatio)` - An explicit ratio is malformed or not 3-part
pub fn calculate(input: &ConcreteInput) -> CalcResult<ConcreteResult> {
    let ratio = input.validate()?;

    let wet = input.wet_volume();
    let wet_m3 = CubicMeters::from(wet);
    let dry = wet * DRY_VOLUME_MULTIPLIER;
    let split = ratio.split(dry);

    let rebar_kg = if input.include_rebar {
        wet_m3.0 * input.structure_type.rebar_density_kg_per_m3()
    } else {
        0.0
    };

    let result = ConcreteResult {
        structure_type: input.structure_type,
        mix: ratio.to_string(),
        cement_bags: cement_bags(split.cement.into()),
        sand_cft: round_to(split.sand.0, 2),
        sand_m3: round_to(CubicMeters::from(split.sand).0, 2),
        aggregate_cft: round_to(split.aggregate.0, 2),
        aggregate_m3: round_to(CubicMeters::from(split.aggregate).0, 2),
        rebar_kg: round_to(rebar_kg, 2),
        volume_m3: round_to(wet_m3.0, 2),
        volume_cft: round_to(wet.0, 2),
        area_sqft: round_to(input.length_ft * input.width_ft, 2),
    };

    debug!(
        label = %input.label,
        structure = ?input.structure_type,
        mix = %result.mix,
        volume_m3 = result.volume_m3,
        cement_bags = result.cement_bags,
        "concrete calculated"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_slab() -> ConcreteInput {
        ConcreteInput {
            label: "Test Slab".to_string(),
            length_ft: 10.0,
            width_ft: 10.0,
            thickness_in: 5.0,
            grade: ConcreteGrade::M20,
            ratio: None,
            structure_type: StructureType::Slab,
            include_rebar: true,
        }
    }

    #[test]
    fn test_reference_slab() {
        let result = calculate(&test_slab()).unwrap();

        // 10 x 10 x 5/12 = 41.67 cft = 1.18 m3
        assert_eq!(result.volume_cft, 41.67);
        assert_eq!(result.volume_m3, 1.18);
        // dry 64.17 cft; cement 11.67 cft = 0.330 m3 = 475.8 kg = 9.5 bags
        assert_eq!(result.cement_bags, 10);
        assert!((result.sand_cft - 17.5).abs() < 0.01);
        assert!((result.aggregate_cft - 35.0).abs() < 0.01);
        // 1.1799 m3 x 90 kg/m3
        assert!((result.rebar_kg - 106.19).abs() < 0.01);
        assert_eq!(result.mix, "1:1.5:3");
        assert_eq!(result.area_sqft, 100.0);
    }

    #[test]
    fn test_column_carries_more_steel_than_slab() {
        let slab = calculate(&test_slab()).unwrap();
        let mut column = test_slab();
        column.structure_type = StructureType::Column;
        let column = calculate(&column).unwrap();

        assert_eq!(slab.volume_m3, column.volume_m3);
        assert!(column.rebar_kg > slab.rebar_kg);
        assert_eq!(slab.cement_bags, column.cement_bags);
    }

    #[test]
    fn test_rebar_density_ordering() {
        let density = |s: StructureType| s.rebar_density_kg_per_m3();
        assert!(density(StructureType::Column) > density(StructureType::Beam));
        assert!(density(StructureType::Beam) > density(StructureType::Slab));
        assert!(density(StructureType::Slab) >= density(StructureType::Footing));
    }

    #[test]
    fn test_without_rebar() {
        let mut input = test_slab();
        input.include_rebar = false;
        assert_eq!(calculate(&input).unwrap().rebar_kg, 0.0);
    }

    #[test]
    fn test_ratio_overrides_grade() {
        let mut input = test_slab();
        input.ratio = Some("1:2:4".to_string());
        let result = calculate(&input).unwrap();
        assert_eq!(result.mix, "1:2:4");

        let mut by_grade = test_slab();
        by_grade.grade = ConcreteGrade::M15;
        assert_eq!(calculate(&by_grade).unwrap().cement_bags, result.cement_bags);
    }

    #[test]
    fn test_two_part_ratio_rejected() {
        let mut input = test_slab();
        input.ratio = Some("1:6".to_string());
        assert!(matches!(calculate(&input), Err(CalcError::InvalidRatio { .. })));
    }

    #[test]
    fn test_invalid_dimensions() {
        for field in 0..3 {
            let mut input = test_slab();
            match field {
                0 => input.length_ft = 0.0,
                1 => input.width_ft = -2.0,
                _ => input.thickness_in = f64::NAN,
            }
            assert!(matches!(calculate(&input), Err(CalcError::InvalidGeometry { .. })));
        }
    }

    #[test]
    fn test_structure_type_parsing() {
        assert_eq!(StructureType::from_str_flexible("pillar").unwrap(), StructureType::Column);
        assert_eq!(StructureType::from_str_flexible(" Footing ").unwrap(), StructureType::Footing);
        assert!(StructureType::from_str_flexible("arch").is_err());
    }

    #[test]
    fn test_original_request_shape() {
        let json = r#"{ "length": 20, "width": 12, "thickness": 6, "grade": "M20", "structure": "COLUMN" }"#;
        let input: ConcreteInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.structure_type, StructureType::Column);
        assert!(input.include_rebar);
        assert_eq!(input.ratio, None);
    }

    #[test]
    fn test_grade_is_case_insensitive_on_input() {
        let json = r#"{ "length": 10, "width": 10, "thickness": 5, "grade": "m20" }"#;
        let input: ConcreteInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.grade, ConcreteGrade::M20);
        assert_eq!(serde_json::to_value(&input).unwrap()["grade"], "M20");
    }
}
