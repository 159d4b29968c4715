//! # Unit Types and Conversion Constants
//!
//! Type-safe wrappers for the units an estimator works in, plus the fixed
//! conversion constants every calculator shares. The wrappers are plain f64
//! newtypes so JSON stays clean (just numbers).
//!
//! ## Mixed Units
//!
//! Site measurements arrive in feet and inches, plaster thickness in
//! millimetres, and material densities are quoted per cubic metre:
//! - Length: feet (ft), inches (in), millimetres (mm), metres (m)
//! - Area: square feet (sq ft)
//! - Volume: cubic feet (cft), cubic metres (m³)
//! - Mass: kilograms (kg)
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::units::{CubicFeet, CubicMeters, Feet, Inches};
//!
//! let slab: Feet = Inches(6.0).into();
//! assert_eq!(slab.0, 0.5);
//!
//! let volume: CubicMeters = CubicFeet(35.3147).into();
//! assert!((volume.0 - 1.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Cubic feet in one cubic metre
pub const CUBIC_FEET_PER_CUBIC_METER: f64 = 35.3147;

/// Square feet in one square metre
pub const SQFT_PER_SQM: f64 = 10.7639;

/// Inches in one foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Millimetres in one metre
pub const MM_PER_METER: f64 = 1000.0;

/// Loose (dry) volume of ingredients needed per unit of finished wet
/// mortar or concrete, covering bulking and voids.
pub const DRY_VOLUME_MULTIPLIER: f64 = 1.54;

/// Bulk density of cement (kg/m³)
pub const CEMENT_DENSITY_KG_PER_M3: f64 = 1440.0;

/// Mass of one cement bag (kg)
pub const KG_PER_CEMENT_BAG: f64 = 50.0;

/// Bricks per cubic foot of solid brickwork, mortar joints excluded.
///
/// Based on a 230 x 110 x 55 mm modular brick (0.0491 cft each).
pub const BRICKS_PER_CUBIC_FOOT: f64 = 20.35;

/// Share of gross brickwork volume taken by mortar joints
pub const MORTAR_VOLUME_FRACTION: f64 = 0.25;

/// Tolerance used before rounding up so float noise (e.g. 3.0000000001)
/// does not buy an extra bag or brick.
const ROUNDING_EPSILON: f64 = 1e-9;

/// Material classes that carry their own wastage allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialClass {
    Cement,
    Sand,
    Aggregate,
    Brick,
    Steel,
}

impl MaterialClass {
    /// All material classes
    pub const ALL: [MaterialClass; 5] = [
        MaterialClass::Cement,
        MaterialClass::Sand,
        MaterialClass::Aggregate,
        MaterialClass::Brick,
        MaterialClass::Steel,
    ];

    /// Lower-case name used in settings fields (e.g., "cement_pct")
    pub fn field_name(&self) -> &'static str {
        match self {
            MaterialClass::Cement => "cement_pct",
            MaterialClass::Sand => "sand_pct",
            MaterialClass::Aggregate => "aggregate_pct",
            MaterialClass::Brick => "brick_pct",
            MaterialClass::Steel => "steel_pct",
        }
    }

    /// Default on-site wastage allowance in percent (5%-10%).
    pub fn default_wastage_pct(&self) -> f64 {
        match self {
            MaterialClass::Cement => 5.0,
            MaterialClass::Sand => 10.0,
            MaterialClass::Aggregate => 7.5,
            MaterialClass::Brick => 5.0,
            MaterialClass::Steel => 5.0,
        }
    }
}

/// Number of whole cement bags holding `volume` of loose cement.
///
/// Cement is bought by the bag, so any fractional demand rounds up.
pub fn cement_bags(volume: CubicMeters) -> u64 {
    let kg = volume.0.max(0.0) * CEMENT_DENSITY_KG_PER_M3;
    ceil_count(kg / KG_PER_CEMENT_BAG)
}

/// Round a non-negative quantity up to a whole count.
pub fn ceil_count(value: f64) -> u64 {
    if !value.is_finite() || value <= ROUNDING_EPSILON {
        return 0;
    }
    (value - ROUNDING_EPSILON).ceil() as u64
}

/// Round to `decimals` decimal places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / INCHES_PER_FOOT)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / MM_PER_METER)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

impl From<SqFt> for SqM {
    fn from(sqft: SqFt) -> Self {
        SqM(sqft.0 / SQFT_PER_SQM)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicFeet(pub f64);

/// Volume in cubic metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl From<CubicFeet> for CubicMeters {
    fn from(cft: CubicFeet) -> Self {
        CubicMeters(cft.0 / CUBIC_FEET_PER_CUBIC_METER)
    }
}

impl From<CubicMeters> for CubicFeet {
    fn from(m3: CubicMeters) -> Self {
        CubicFeet(m3.0 * CUBIC_FEET_PER_CUBIC_METER)
    }
}

impl CubicFeet {
    /// Volume of a rectangular prism
    pub fn of_prism(length: Feet, width: Feet, depth: Feet) -> Self {
        CubicFeet(length.0 * width.0 * depth.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(SqFt);
impl_arithmetic!(SqM);
impl_arithmetic!(CubicFeet);
impl_arithmetic!(CubicMeters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_feet() {
        let ft: Feet = Inches(9.0).into();
        assert_eq!(ft.0, 0.75);
    }

    #[test]
    fn test_millimeters_to_meters() {
        let m: Meters = Millimeters(12.0).into();
        assert!((m.0 - 0.012).abs() < 1e-12);
    }

    #[test]
    fn test_volume_conversion() {
        let cft: CubicFeet = CubicMeters(2.0).into();
        assert!((cft.0 - 70.6294).abs() < 1e-9);
    }

    #[test]
    fn test_area_conversion() {
        let sqm: SqM = SqFt(107.639).into();
        assert!((sqm.0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_prism_volume() {
        let v = CubicFeet::of_prism(Feet(10.0), Feet(10.0), Feet(0.75));
        assert_eq!(v.0, 75.0);
    }

    #[test]
    fn test_cement_bags_round_up() {
        // 1 m³ of cement = 1440 kg = 28.8 bags -> 29
        assert_eq!(cement_bags(CubicMeters(1.0)), 29);
        // exactly one bag worth stays one bag
        assert_eq!(cement_bags(CubicMeters(KG_PER_CEMENT_BAG / CEMENT_DENSITY_KG_PER_M3)), 1);
        assert_eq!(cement_bags(CubicMeters(0.0)), 0);
    }

    #[test]
    fn test_ceil_count() {
        assert_eq!(ceil_count(3.0000000000001), 3);
        assert_eq!(ceil_count(3.01), 4);
        assert_eq!(ceil_count(-2.0), 0);
        assert_eq!(ceil_count(f64::NAN), 0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(24.749, 1), 24.7);
        assert_eq!(round_to(1.005, 0), 1.0);
        assert_eq!(round_to(3.14159, 2), 3.14);
    }

    #[test]
    fn test_default_wastage_within_band() {
        for class in MaterialClass::ALL {
            let pct = class.default_wastage_pct();
            assert!((5.0..=10.0).contains(&pct), "{:?} wastage {} out of band", class, pct);
        }
    }

    #[test]
    fn test_serialization() {
        let ft = Feet(12.5);
        let json = serde_json::to_string(&ft).unwrap();
        assert_eq!(json, "12.5");

        let class = serde_json::to_string(&MaterialClass::Aggregate).unwrap();
        assert_eq!(class, "\"AGGREGATE\"");
    }
}
