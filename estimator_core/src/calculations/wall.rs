//! # Brick Wall Calculation
//!
//! Bricks, cement and sand for a masonry wall.
//!
//! ## Method
//!
//! - Gross volume = length × height × wall thickness
//! - A fixed share of that volume is mortar joints; the rest is brick
//! - Bricks = net brick volume × bricks per cft, rounded up
//! - Mortar dry volume = gross × mortar share × 1.54, split by the cement:sand ratio
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::calculations::wall::{calculate, WallInput, WallThickness};
//!
//! let input = WallInput {
//!     label: "North wall".to_string(),
//!     length_ft: 10.0,
//!     height_ft: 10.0,
//!     thickness: WallThickness::NineInch,
//!     ratio: "1:6".to_string(),
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.gross_volume_cft, 75.0);
//! assert!(result.bricks > 1000 && result.bricks < 2000);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MaterialQuantities;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::mix_ratio::MixRatio;
use crate::units::{
    cement_bags, ceil_count, round_to, CubicFeet, CubicMeters, Feet, Inches, BRICKS_PER_CUBIC_FOOT,
    DRY_VOLUME_MULTIPLIER, MORTAR_VOLUME_FRACTION,
};

/// Default masonry mortar mix
pub const DEFAULT_MORTAR_RATIO: &str = "1:6";

/// Nominal wall thickness classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WallThickness {
    /// Full-brick (9") external or load-bearing wall
    #[default]
    #[serde(rename = "9_INCH", alias = "9_IN", alias = "NINE_INCH")]
    NineInch,
    /// Half-brick (4.5") partition wall
    #[serde(rename = "4_INCH", alias = "4.5_INCH", alias = "4_5_INCH", alias = "HALF_BRICK")]
    FourAndHalfInch,
}

impl WallThickness {
    /// All thickness classes for UI selection
    pub const ALL: [WallThickness; 2] = [WallThickness::NineInch, WallThickness::FourAndHalfInch];

    /// Thickness used in volume calculations
    pub fn thickness(&self) -> Feet {
        match self {
            WallThickness::NineInch => Inches(9.0).into(),
            WallThickness::FourAndHalfInch => Inches(4.5).into(),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            WallThickness::NineInch => "9 inch (External)",
            WallThickness::FourAndHalfInch => "4.5 inch (Partition)",
        }
    }

    /// Parse from common string representations ("9_INCH", "9in", "4.5")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_uppercase().replace([' ', '_', '-', '"'], "").as_str() {
            "9INCH" | "9IN" | "9" | "NINEINCH" | "FULLBRICK" => Ok(WallThickness::NineInch),
            "4INCH" | "4.5INCH" | "45INCH" | "4.5IN" | "4.5" | "4" | "HALFBRICK" => {
                Ok(WallThickness::FourAndHalfInch)
            }
            _ => Err(CalcError::invalid_geometry(
                "thickness",
                s,
                "Unknown wall thickness (expected 9_INCH or 4_INCH)",
            )),
        }
    }
}

impl std::fmt::Display for WallThickness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn default_ratio() -> String {
    DEFAULT_MORTAR_RATIO.to_string()
}

/// Input parameters for a brick wall.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "North wall",
///   "length_ft": 10.0,
///   "height_ft": 10.0,
///   "thickness": "9_INCH",
///   "ratio": "1:6"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallInput {
    #[serde(default)]
    pub label: String,

    #[serde(alias = "length")]
    pub length_ft: f64,

    #[serde(alias = "height")]
    pub height_ft: f64,

    #[serde(default)]
    pub thickness: WallThickness,

    /// Mortar cement:sand ratio (e.g., "1:6")
    #[serde(default = "default_ratio")]
    pub ratio: String,
}

impl WallInput {
    /// Validate input parameters and resolve the mortar mix.
    pub fn validate(&self) -> CalcResult<MixRatio> {
        require_positive("length_ft", self.length_ft)?;
        require_positive("height_ft", self.height_ft)?;
        MixRatio::parse(&self.ratio)?.require_two_part()
    }

    /// Face area of the wall (sq ft)
    pub fn area_sqft(&self) -> f64 {
        self.length_ft * self.height_ft
    }

    /// Gross volume including mortar joints
    pub fn gross_volume(&self) -> CubicFeet {
        CubicFeet::of_prism(Feet(self.length_ft), Feet(self.height_ft), self.thickness.thickness())
    }
}

/// Results from a wall calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "bricks": 1145,
///   "cement_bags": 4,
///   "sand_cft": 24.8,
///   "sand_m3": 0.7,
///   "wall_area_sqft": 100.0,
///   "gross_volume_cft": 75.0,
///   "mortar_dry_volume_cft": 28.88
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallResult {
    pub bricks: u64,
    pub cement_bags: u64,
    pub sand_cft: f64,
    pub sand_m3: f64,
    pub wall_area_sqft: f64,
    pub gross_volume_cft: f64,
    pub mortar_dry_volume_cft: f64,
}

impl WallResult {
    /// Raw quantities for aggregation
    pub fn quantities(&self) -> MaterialQuantities {
        MaterialQuantities {
            cement_bags: self.cement_bags,
            sand_cft: self.sand_cft,
            bricks: self.bricks,
            ..MaterialQuantities::default()
        }
    }
}

/// Calculate bricks and mortar for a wall.
///
/// # Returns
///
/// * `Ok(WallResult)` - Raw material quantities (no wastage, no pricing)
/// * `Err(CalcError::InvalidGeometry)` - A dimension is not positive
/// * `Err(CalcError::InvalidRatio)` - The mortar ratio is malformed or not cement:sand
pub fn calculate(input: &WallInput) -> CalcResult<WallResult> {
    let ratio = input.validate()?;

    let gross = input.gross_volume();
    let net_brick = gross * (1.0 - MORTAR_VOLUME_FRACTION);
    let bricks = ceil_count(net_brick.0 * BRICKS_PER_CUBIC_FOOT);

    let mortar_dry = gross * MORTAR_VOLUME_FRACTION * DRY_VOLUME_MULTIPLIER;
    let split = ratio.split(mortar_dry);

    let result = WallResult {
        bricks,
        cement_bags: cement_bags(split.cement.into()),
        sand_cft: round_to(split.sand.0, 1),
        sand_m3: round_to(CubicMeters::from(split.sand).0, 2),
        wall_area_sqft: round_to(input.area_sqft(), 2),
        gross_volume_cft: round_to(gross.0, 2),
        mortar_dry_volume_cft: round_to(mortar_dry.0, 2),
    };

    debug!(
        label = %input.label,
        thickness = ?input.thickness,
        bricks = result.bricks,
        cement_bags = result.cement_bags,
        "wall calculated"
    );
    Ok(result)
}
