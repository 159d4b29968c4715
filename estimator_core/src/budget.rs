//! # Budget Aggregation
//!
//! Turns a floor-by-floor description of a building into material
//! quantities, a categorized cost budget and a duration estimate.
//!
//! ## Pipeline
//!
//! 1. Each floor is converted into equivalent elements: an external 9" wall
//!    around a square footprint, 4.5" partitions per room, a roof slab, a
//!    column/beam frame and (ground floor only) footings.
//! 2. The element calculators produce raw quantities, summed across floors.
//! 3. Wastage per material class is applied once to the totals.
//! 4. Quantities are priced from a [`RateSnapshot`]; counts of fixtures,
//!    doors and windows are priced directly.
//! 5. The quality tier scales MEP and finishing.
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::budget::{calculate, BudgetInput, FloorConfiguration};
//! use estimator_core::quality::QualityTier;
//! use estimator_core::rates::RateCatalog;
//!
//! let catalog = RateCatalog::with_defaults();
//! let input = BudgetInput {
//!     floors: vec![FloorConfiguration {
//!         index: 0,
//!         area_sqft: 1000.0,
//!         rooms: 4,
//!         bathrooms: 2,
//!         toilets: 1,
//!         balconies: 1,
//!         doors: 6,
//!         windows: 8,
//!     }],
//!     quality: QualityTier::Standard,
//!     include_mep: true,
//!     include_finishing: true,
//! };
//!
//! let result = calculate(&input, &catalog.snapshot()).unwrap();
//! assert!(result.quantities.cement_bags > 0);
//! assert_eq!(
//!     result.totals.all,
//!     result.totals.structure + result.totals.mep + result.totals.finishing
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculations::{concrete, wall, ConcreteInput, MaterialQuantities, StructureType, WallInput, WallThickness};
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::quality::QualityTier;
use crate::rates::{ids, RateSnapshot};
use crate::settings::{EstimatorSettings, FloorHeuristics, WastagePolicy};
use crate::units::{ceil_count, round_to, MaterialClass, INCHES_PER_FOOT};

/// Upper area bound (sq ft) and duration (months) for each step.
const DURATION_STEPS: [(f64, u32); 4] = [(1000.0, 6), (2000.0, 9), (3500.0, 12), (5000.0, 15)];

/// Beyond the last step, this much area adds [`DURATION_TAIL_MONTHS`]
const DURATION_TAIL_SQFT: f64 = 1500.0;
const DURATION_TAIL_MONTHS: u32 = 2;

fn default_true() -> bool {
    true
}

/// One storey of the building.
///
/// ## JSON Example
///
/// ```json
/// { "id": 0, "area": 1000, "rooms": 4, "bathrooms": 2, "toilets": 1,
///   "balconies": 1, "doors": 6, "windows": 8 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorConfiguration {
    /// 0 for the ground floor
    #[serde(default, alias = "id")]
    pub index: u32,

    #[serde(alias = "area")]
    pub area_sqft: f64,

    #[serde(default)]
    pub rooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub toilets: u32,
    #[serde(default)]
    pub balconies: u32,
    #[serde(default)]
    pub doors: u32,
    #[serde(default)]
    pub windows: u32,
}

impl FloorConfiguration {
    /// Ground floor carries the footings
    pub fn is_ground(&self) -> bool {
        self.index == 0
    }
}

/// A whole-building budget request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInput {
    #[serde(alias = "floor_details")]
    pub floors: Vec<FloorConfiguration>,

    #[serde(default, alias = "finish_quality")]
    pub quality: QualityTier,

    #[serde(default = "default_true")]
    pub include_mep: bool,

    #[serde(default = "default_true")]
    pub include_finishing: bool,
}

impl BudgetInput {
    /// Validate the request shape and every floor.
    pub fn validate(&self) -> CalcResult<()> {
        if self.floors.is_empty() {
            return Err(CalcError::EmptyFloorList);
        }
        for (position, floor) in self.floors.iter().enumerate() {
            require_positive(&format!("floors[{}].area_sqft", position), floor.area_sqft)?;
        }
        Ok(())
    }
}

/// Costs per category. `all` only includes the categories switched on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostTotals {
    pub structure: f64,
    pub mep: f64,
    pub finishing: f64,
    pub all: f64,
}

/// Counts and headline figures for the whole building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub floors: usize,
    pub rooms: u64,
    pub bathrooms: u64,
    pub toilets: u64,
    pub balconies: u64,
    pub doors: u64,
    pub windows: u64,
    pub total_area_sqft: f64,
    pub duration_months: u32,
    pub quality: QualityTier,
}

/// Raw quantities of a single floor, before wastage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorEstimate {
    pub index: u32,
    pub area_sqft: f64,
    pub quantities: MaterialQuantities,
}

/// Traceability data for one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateMeta {
    pub estimate_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Latest rate change included in the snapshot
    pub rates_as_of: Option<DateTime<Utc>>,
}

/// Complete budget. Built once per request and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Purchase quantities, wastage included
    pub quantities: MaterialQuantities,
    pub totals: CostTotals,
    pub summary: BudgetSummary,
    pub floors: Vec<FloorEstimate>,
    pub meta: EstimateMeta,
}

/// Estimate a building with the default [`EstimatorSettings`].
pub fn calculate(input: &BudgetInput, rates: &RateSnapshot) -> CalcResult<EstimationResult> {
    calculate_with(input, rates, &EstimatorSettings::default())
}

/// Estimate a building.
///
/// # Errors
///
/// * `CalcError::EmptyFloorList` - `input.floors` is empty
/// * `CalcError::InvalidGeometry` / `CalcError::InvalidRatio` - from any floor,
///   unchanged; no partial result is produced
/// * `CalcError::InvalidSettings` - a setting is out of range
/// * `CalcError::RateNotFound` - the snapshot lacks a rate the budget prices
pub fn calculate_with(
    input: &BudgetInput,
    rates: &RateSnapshot,
    settings: &EstimatorSettings,
) -> CalcResult<EstimationResult> {
    input.validate()?;
    settings.validate()?;

    let floors = input
        .floors
        .iter()
        .map(|floor| estimate_floor(floor, &settings.floor))
        .collect::<CalcResult<Vec<_>>>()?;

    let raw: MaterialQuantities = floors.iter().map(|f| f.quantities).sum();
    let quantities = apply_wastage(&raw, &settings.wastage);

    let summary = summarize(input);
    let area = summary.total_area_sqft;
    let profile = input.quality.profile();

    let structure = quantities.cement_bags as f64 * rates.price(ids::CEMENT)?
        + quantities.sand_cft * rates.price(ids::SAND)?
        + quantities.aggregate_cft * rates.price(ids::AGGREGATE)?
        + quantities.bricks as f64 * rates.price(ids::BRICK)?
        + quantities.rod_kg * rates.price(ids::ROD)?
        + area * rates.price(ids::LABOR_CIVIL)?;

    let mep_base = summary.bathrooms as f64 * rates.price(ids::BATHROOM_FIXTURE)?
        + summary.toilets as f64 * rates.price(ids::TOILET_FIXTURE)?
        + area * (rates.price(ids::LABOR_MEP)? + rates.price(ids::MEP_MATERIAL_SQFT)?);

    let finishing_base = summary.doors as f64 * rates.price(ids::DOOR_UNIT)?
        + summary.windows as f64 * rates.price(ids::WINDOW_UNIT)?
        + summary.balconies as f64 * rates.price(ids::BALCONY_UNIT)?
        + area
            * (rates.price(ids::LABOR_FINISH)? + rates.price(ids::PAINT_SQFT)? + rates.price(ids::TILE_SQFT)?);

    let structure = round_to(structure, 2);
    let mep = round_to(mep_base * profile.mep_multiplier, 2);
    let finishing = round_to(finishing_base * profile.finishing_multiplier, 2);
    let totals = CostTotals {
        structure,
        mep,
        finishing,
        all: total_of(structure, mep, finishing, input.include_mep, input.include_finishing),
    };

    let result = EstimationResult {
        quantities,
        totals,
        summary,
        floors,
        meta: EstimateMeta {
            estimate_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            rates_as_of: rates.rates_as_of(),
        },
    };

    info!(
        estimate_id = %result.meta.estimate_id,
        floors = result.summary.floors,
        area_sqft = area,
        quality = %input.quality,
        total = result.totals.all,
        "budget estimated"
    );
    Ok(result)
}

/// Sum of the enabled cost categories. Structure is always included.
pub fn total_of(structure: f64, mep: f64, finishing: f64, include_mep: bool, include_finishing: bool) -> f64 {
    let mep = if include_mep { mep } else { 0.0 };
    let finishing = if include_finishing { finishing } else { 0.0 };
    structure + mep + finishing
}

/// Months to build a given total area. Never decreases as area grows.
pub fn duration_months(total_area_sqft: f64) -> u32 {
    for (limit, months) in DURATION_STEPS {
        if total_area_sqft <= limit {
            return months;
        }
    }
    let (last_limit, last_months) = DURATION_STEPS[DURATION_STEPS.len() - 1];
    let extra_steps = ceil_count((total_area_sqft - last_limit) / DURATION_TAIL_SQFT);
    let months = extra_steps
        .saturating_mul(u64::from(DURATION_TAIL_MONTHS))
        .saturating_add(u64::from(last_months));
    // clamp: absurd areas report the longest representable schedule
    u32::try_from(months).unwrap_or(u32::MAX)
}

fn summarize(input: &BudgetInput) -> BudgetSummary {
    let count = |f: fn(&FloorConfiguration) -> u32| -> u64 { input.floors.iter().map(|floor| u64::from(f(floor))).sum() };
    let total_area_sqft: f64 = input.floors.iter().map(|floor| floor.area_sqft).sum();

    BudgetSummary {
        floors: input.floors.len(),
        rooms: count(|f| f.rooms),
        bathrooms: count(|f| f.bathrooms),
        toilets: count(|f| f.toilets),
        balconies: count(|f| f.balconies),
        doors: count(|f| f.doors),
        windows: count(|f| f.windows),
        total_area_sqft: round_to(total_area_sqft, 2),
        duration_months: duration_months(total_area_sqft),
        quality: input.quality,
    }
}

fn apply_wastage(raw: &MaterialQuantities, policy: &WastagePolicy) -> MaterialQuantities {
    MaterialQuantities {
        cement_bags: ceil_count(raw.cement_bags as f64 * policy.factor(MaterialClass::Cement)),
        sand_cft: raw.sand_cft * policy.factor(MaterialClass::Sand),
        aggregate_cft: raw.aggregate_cft * policy.factor(MaterialClass::Aggregate),
        bricks: ceil_count(raw.bricks as f64 * policy.factor(MaterialClass::Brick)),
        rod_kg: raw.rod_kg * policy.factor(MaterialClass::Steel),
    }
    .rounded()
}

/// Convert one floor into walls, slab and frame, and sum their quantities.
fn estimate_floor(floor: &FloorConfiguration, rules: &FloorHeuristics) -> CalcResult<FloorEstimate> {
    let side_ft = floor.area_sqft.sqrt();
    let label = |part: &str| format!("floor {} {}", floor.index, part);

    let external_run_ft = 4.0 * side_ft;
    let partition_run_ft = f64::from(floor.rooms) * rules.partition_factor * side_ft;
    let columns = ceil_count(floor.area_sqft / rules.sqft_per_column).max(1) as f64;

    let mut quantities = wall::calculate(&WallInput {
        label: label("external wall"),
        length_ft: external_run_ft,
        height_ft: rules.storey_height_ft,
        thickness: WallThickness::NineInch,
        ratio: rules.mortar_ratio.clone(),
    })?
    .quantities();

    if partition_run_ft > 0.0 {
        quantities += wall::calculate(&WallInput {
            label: label("partitions"),
            length_ft: partition_run_ft,
            height_ft: rules.storey_height_ft,
            thickness: WallThickness::FourAndHalfInch,
            ratio: rules.mortar_ratio.clone(),
        })?
        .quantities();
    }

    let member = |part: &str, length_ft: f64, width_ft: f64, thickness_in: f64, structure_type| ConcreteInput {
        label: label(part),
        length_ft,
        width_ft,
        thickness_in,
        grade: rules.concrete_grade,
        ratio: None,
        structure_type,
        include_rebar: true,
    };

    let mut elements = vec![
        member("slab", side_ft, side_ft, rules.slab_thickness_in, StructureType::Slab),
        member(
            "columns",
            columns * rules.storey_height_ft,
            rules.column_width_in / INCHES_PER_FOOT,
            rules.column_depth_in,
            StructureType::Column,
        ),
        member(
            "beams",
            external_run_ft + partition_run_ft,
            rules.beam_width_in / INCHES_PER_FOOT,
            rules.beam_depth_in,
            StructureType::Beam,
        ),
    ];
    if floor.is_ground() {
        elements.push(member(
            "footings",
            columns * rules.footing_side_ft,
            rules.footing_side_ft,
            rules.footing_depth_in,
            StructureType::Footing,
        ));
    }

    for element in &elements {
        quantities += concrete::calculate(element)?.quantities();
    }

    debug!(
        floor = floor.index,
        area_sqft = floor.area_sqft,
        columns,
        cement_bags = quantities.cement_bags,
        bricks = quantities.bricks,
        "floor estimated"
    );
    Ok(FloorEstimate {
        index: floor.index,
        area_sqft: floor.area_sqft,
        quantities,
    })
}
