//! End-to-end budget estimation against a shared rate catalog.

use std::sync::Arc;
use std::thread;

use estimator_core::budget::{self, BudgetInput, FloorConfiguration};
use estimator_core::quality::QualityTier;
use estimator_core::rates::{ids, RateCatalog};
use estimator_core::settings::{EstimatorSettings, WastagePolicy};
use estimator_core::CalcError;
use proptest::prelude::*;

fn floor(index: u32, area_sqft: f64, rooms: u32) -> FloorConfiguration {
    FloorConfiguration {
        index,
        area_sqft,
        rooms,
        bathrooms: 1,
        toilets: 1,
        balconies: 1,
        doors: rooms + 2,
        windows: rooms * 2,
    }
}

fn two_storey() -> BudgetInput {
    BudgetInput {
        floors: vec![floor(0, 1200.0, 4), floor(1, 1100.0, 3)],
        quality: QualityTier::Standard,
        include_mep: true,
        include_finishing: true,
    }
}

#[test]
fn empty_request_is_rejected() {
    let catalog = RateCatalog::with_defaults();
    let input = BudgetInput {
        floors: Vec::new(),
        ..two_storey()
    };
    assert_eq!(budget::calculate(&input, &catalog.snapshot()).unwrap_err(), CalcError::EmptyFloorList);
}

#[test]
fn rate_update_affects_later_estimates_only() {
    let catalog = RateCatalog::with_defaults();
    let before = budget::calculate(&two_storey(), &catalog.snapshot()).unwrap();
    let frozen = before.clone();

    catalog.update(ids::CEMENT, 900.0).unwrap();
    let after = budget::calculate(&two_storey(), &catalog.snapshot()).unwrap();

    assert_eq!(before, frozen);
    assert_eq!(before.quantities, after.quantities);
    let extra = before.quantities.cement_bags as f64 * 150.0;
    assert!((after.totals.structure - before.totals.structure - extra).abs() < 0.02);
    assert_eq!(before.totals.mep, after.totals.mep);
    assert_ne!(before.meta.estimate_id, after.meta.estimate_id);
}

#[test]
fn snapshot_taken_before_update_keeps_old_prices() {
    let catalog = RateCatalog::with_defaults();
    let snapshot = catalog.snapshot();
    catalog.update(ids::ROD, 150.0).unwrap();

    let old = budget::calculate(&two_storey(), &snapshot).unwrap();
    let fresh = budget::calculate(&two_storey(), &catalog.snapshot()).unwrap();
    assert!(fresh.totals.structure > old.totals.structure);
}

#[test]
fn concurrent_estimates_and_updates() {
    let catalog = Arc::new(RateCatalog::with_defaults());
    let mut handles = Vec::new();

    for worker in 0..4 {
        let catalog = Arc::clone(&catalog);
        handles.push(thread::spawn(move || {
            for step in 0..25 {
                if worker == 0 {
                    catalog.update(ids::SAND, 90.0 + step as f64).unwrap();
                } else {
                    let result = budget::calculate(&two_storey(), &catalog.snapshot()).unwrap();
                    let t = result.totals;
                    assert_eq!(t.all, t.structure + t.mep + t.finishing);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(catalog.get(ids::SAND).unwrap().price, 114.0);
}

#[test]
fn zero_wastage_matches_floor_sums() {
    let catalog = RateCatalog::with_defaults();
    let settings = EstimatorSettings {
        wastage: WastagePolicy::none(),
        ..EstimatorSettings::default()
    };
    let result = budget::calculate_with(&two_storey(), &catalog.snapshot(), &settings).unwrap();

    let bags: u64 = result.floors.iter().map(|f| f.quantities.cement_bags).sum();
    let bricks: u64 = result.floors.iter().map(|f| f.quantities.bricks).sum();
    assert_eq!(result.quantities.cement_bags, bags);
    assert_eq!(result.quantities.bricks, bricks);
}

#[test]
fn invalid_settings_are_rejected() {
    let catalog = RateCatalog::with_defaults();
    let mut settings = EstimatorSettings::default();
    settings.floor.storey_height_ft = -1.0;
    let err = budget::calculate_with(&two_storey(), &catalog.snapshot(), &settings).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_SETTINGS");
}

#[test]
fn result_serializes_with_wire_names() {
    let catalog = RateCatalog::with_defaults();
    let result = budget::calculate(&two_storey(), &catalog.snapshot()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["quantities"]["cement_bags"].is_u64());
    assert!(json["totals"]["all"].is_f64());
    assert_eq!(json["summary"]["quality"], "STANDARD");
    assert!(json["meta"]["estimate_id"].is_string());
}

proptest! {
    #[test]
    fn totals_identity_holds(
        areas in proptest::collection::vec(200.0f64..5000.0, 1..5),
        rooms in 0u32..8,
        include_mep in any::<bool>(),
        include_finishing in any::<bool>(),
        tier in prop_oneof![Just(QualityTier::Economy), Just(QualityTier::Standard), Just(QualityTier::Luxury)],
    ) {
        let catalog = RateCatalog::with_defaults();
        let input = BudgetInput {
            floors: areas.iter().enumerate().map(|(i, a)| floor(i as u32, *a, rooms)).collect(),
            quality: tier,
            include_mep,
            include_finishing,
        };
        let result = budget::calculate(&input, &catalog.snapshot()).unwrap();
        let t = result.totals;

        let mep = if include_mep { t.mep } else { 0.0 };
        let finishing = if include_finishing { t.finishing } else { 0.0 };
        prop_assert_eq!(t.all, t.structure + mep + finishing);
        prop_assert!(t.structure > 0.0);
    }

    #[test]
    fn more_area_never_shortens_duration(area in 100.0f64..20_000.0, extra in 0.0f64..5_000.0) {
        prop_assert!(budget::duration_months(area + extra) >= budget::duration_months(area));
    }
}
