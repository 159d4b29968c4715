//! # Element Calculations
//!
//! This module contains all element calculators. Each calculation follows
//! the pattern:
//!
//! - `*Input` - Input geometry and mix (JSON-serializable)
//! - `*Result` - Raw material quantities (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! Results never include wastage or prices. Those are applied once, by
//! [`crate::budget`], after quantities from every element are summed.
//!
//! ## Available Calculations
//!
//! - [`wall`] - Brick masonry walls (bricks + mortar)
//! - [`concrete`] - Slabs, beams, columns and footings (concrete + rebar)
//! - [`plaster`] - Cement:sand plaster on a surface
//! - [`flooring`] - Plain cement concrete (PCC) floor bed

pub mod concrete;
pub mod flooring;
pub mod plaster;
pub mod wall;

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::units::round_to;

// Re-export commonly used types
pub use concrete::{ConcreteInput, ConcreteResult, StructureType};
pub use flooring::{FlooringInput, FlooringResult};
pub use plaster::{PlasterInput, PlasterResult};
pub use wall::{WallInput, WallResult, WallThickness};

/// Material quantities in purchasing units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialQuantities {
    pub cement_bags: u64,
    pub sand_cft: f64,
    #[serde(alias = "agg_cft")]
    pub aggregate_cft: f64,
    pub bricks: u64,
    pub rod_kg: f64,
}

impl MaterialQuantities {
    /// Round the continuous quantities for display (cft and kg to 2 dp)
    pub fn rounded(&self) -> Self {
        MaterialQuantities {
            sand_cft: round_to(self.sand_cft, 2),
            aggregate_cft: round_to(self.aggregate_cft, 2),
            rod_kg: round_to(self.rod_kg, 2),
            ..*self
        }
    }
}

impl Add for MaterialQuantities {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        MaterialQuantities {
            cement_bags: self.cement_bags.saturating_add(rhs.cement_bags),
            sand_cft: self.sand_cft + rhs.sand_cft,
            aggregate_cft: self.aggregate_cft + rhs.aggregate_cft,
            bricks: self.bricks.saturating_add(rhs.bricks),
            rod_kg: self.rod_kg + rhs.rod_kg,
        }
    }
}

impl AddAssign for MaterialQuantities {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for MaterialQuantities {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MaterialQuantities::default(), Add::add)
    }
}

/// Enum wrapper for all calculation types.
///
/// This allows a batch of heterogeneous elements in one JSON document:
///
/// ```json
/// [
///   { "type": "Wall", "length_ft": 10, "height_ft": 10, "thickness": "9_INCH" },
///   { "type": "Plaster", "area_sqft": 200 }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Brick masonry wall
    Wall(WallInput),
    /// Slab, beam, column or footing
    Concrete(ConcreteInput),
    /// Wall or ceiling plaster
    Plaster(PlasterInput),
    /// PCC floor bed
    Flooring(FlooringInput),
}

/// Result of one [`CalculationItem`], tagged the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Wall(WallResult),
    Concrete(ConcreteResult),
    Plaster(PlasterResult),
    Flooring(FlooringResult),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Wall(w) => &w.label,
            CalculationItem::Concrete(c) => &c.label,
            CalculationItem::Plaster(p) => &p.label,
            CalculationItem::Flooring(f) => &f.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Wall(_) => "Wall",
            CalculationItem::Concrete(_) => "Concrete",
            CalculationItem::Plaster(_) => "Plaster",
            CalculationItem::Flooring(_) => "Flooring",
        }
    }

    /// Run the matching calculator
    pub fn calculate(&self) -> CalcResult<CalculationOutput> {
        Ok(match self {
            CalculationItem::Wall(input) => CalculationOutput::Wall(wall::calculate(input)?),
            CalculationItem::Concrete(input) => CalculationOutput::Concrete(concrete::calculate(input)?),
            CalculationItem::Plaster(input) => CalculationOutput::Plaster(plaster::calculate(input)?),
            CalculationItem::Flooring(input) => CalculationOutput::Flooring(flooring::calculate(input)?),
        })
    }
}

impl CalculationOutput {
    /// Raw quantities of this element
    pub fn quantities(&self) -> MaterialQuantities {
        match self {
            CalculationOutput::Wall(r) => r.quantities(),
            CalculationOutput::Concrete(r) => r.quantities(),
            CalculationOutput::Plaster(r) => r.quantities(),
            CalculationOutput::Flooring(r) => r.quantities(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities_add() {
        let a = MaterialQuantities {
            cement_bags: 3,
            sand_cft: 10.5,
            aggregate_cft: 0.0,
            bricks: 100,
            rod_kg: 0.0,
        };
        let b = MaterialQuantities {
            cement_bags: 2,
            sand_cft: 4.5,
            aggregate_cft: 8.0,
            bricks: 0,
            rod_kg: 12.0,
        };
        let total: MaterialQuantities = [a, b].into_iter().sum();
        assert_eq!(total.cement_bags, 5);
        assert_eq!(total.sand_cft, 15.0);
        assert_eq!(total.aggregate_cft, 8.0);
        assert_eq!(total.bricks, 100);
        assert_eq!(total.rod_kg, 12.0);
    }

    #[test]
    fn test_quantities_add_saturates() {
        let full = MaterialQuantities {
            cement_bags: u64::MAX,
            bricks: u64::MAX - 1,
            ..MaterialQuantities::default()
        };
        let more = MaterialQuantities {
            cement_bags: 1,
            bricks: 5,
            ..MaterialQuantities::default()
        };
        let total = full + more;
        assert_eq!(total.cement_bags, u64::MAX);
        assert_eq!(total.bricks, u64::MAX);
    }

    #[test]
    fn test_batch_dispatch() {
        let json = r#"[
            { "type": "Wall", "label": "W1", "length_ft": 10, "height_ft": 10, "thickness": "9_INCH" },
            { "type": "Concrete", "label": "S1", "length_ft": 10, "width_ft": 10, "thickness_in": 5 },
            { "type": "Plaster", "label": "P1", "area_sqft": 200 },
            { "type": "Flooring", "label": "F1", "area_sqft": 100 }
        ]"#;
        let items: Vec<CalculationItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].calc_type(), "Wall");
        assert_eq!(items[2].label(), "P1");

        for item in &items {
            let output = item.calculate().unwrap();
            assert!(output.quantities().cement_bags > 0);
        }
    }

    #[test]
    fn test_batch_error_passes_through() {
        let item = CalculationItem::Plaster(PlasterInput {
            label: "bad".to_string(),
            area_sqft: -1.0,
            thickness_mm: 12.0,
            ratio: "1:4".to_string(),
        });
        assert_eq!(item.calculate().unwrap_err().error_code(), "INVALID_GEOMETRY");
    }
}
