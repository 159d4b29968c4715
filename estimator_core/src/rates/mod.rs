//! # Rate Catalog
//!
//! Named unit prices (cement per bag, sand per cft, labour per sq ft, ...)
//! used by every cost calculation. The catalog is the only shared mutable
//! state in the engine:
//!
//! - readers share a `parking_lot::RwLock` and never wait on each other
//! - an update swaps one `Arc<RateEntry>` under the write lock, so a reader
//!   sees either the old entry or the new one, never a mix
//! - estimations take a [`RateSnapshot`] up front; later updates do not
//!   reach results that were already computed
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::rates::{ids, RateCatalog};
//!
//! let catalog = RateCatalog::with_defaults();
//! let before = catalog.snapshot();
//!
//! catalog.update(ids::CEMENT, 800.0).unwrap();
//!
//! assert_eq!(before.price(ids::CEMENT).unwrap(), 750.0);
//! assert_eq!(catalog.snapshot().price(ids::CEMENT).unwrap(), 800.0);
//! ```

#[cfg(not(target_arch = "wasm32"))]
pub mod store;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{CalcError, CalcResult};
use crate::generated::rate_data::DEFAULT_RATES;

/// Identifiers of the rates the budget aggregator prices with.
pub mod ids {
    pub const CEMENT: &str = "CEMENT";
    pub const SAND: &str = "SAND";
    pub const AGGREGATE: &str = "AGGREGATE";
    pub const BRICK: &str = "BRICK";
    pub const ROD: &str = "ROD";
    pub const PAINT_SQFT: &str = "PAINT_SQFT";
    pub const TILE_SQFT: &str = "TILE_SQFT";
    pub const MEP_MATERIAL_SQFT: &str = "MEP_MATERIAL_SQFT";
    pub const DOOR_UNIT: &str = "DOOR_UNIT";
    pub const WINDOW_UNIT: &str = "WINDOW_UNIT";
    pub const BALCONY_UNIT: &str = "BALCONY_UNIT";
    pub const BATHROOM_FIXTURE: &str = "BATHROOM_FIXTURE";
    pub const TOILET_FIXTURE: &str = "TOILET_FIXTURE";
    pub const LABOR_CIVIL: &str = "LABOR_CIVIL";
    pub const LABOR_MEP: &str = "LABOR_MEP";
    pub const LABOR_FINISH: &str = "LABOR_FINISH";
}

/// What a rate pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateCategory {
    Material,
    Labor,
    #[serde(alias = "OTHER")]
    Overhead,
}

impl RateCategory {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RateCategory::Material => "Material",
            RateCategory::Labor => "Labor",
            RateCategory::Overhead => "Overhead",
        }
    }
}

impl std::fmt::Display for RateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single priced, categorized, unit-labeled rate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "CEMENT",
///   "category": "MATERIAL",
///   "label": "Cement (OPC/PPC)",
///   "unit": "Bag",
///   "price": 750.0,
///   "updated_at": "2025-01-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// Unique identifier used by the calculators (e.g., "CEMENT")
    #[serde(alias = "key")]
    pub id: String,

    pub category: RateCategory,

    /// Display name
    pub label: String,

    /// Unit of measure (e.g., "Bag", "Cft", "Sq.Ft")
    pub unit: String,

    /// Price per unit, never negative
    #[serde(alias = "value")]
    pub price: f64,

    pub updated_at: DateTime<Utc>,
}

impl RateEntry {
    /// Create a rate entry stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        category: RateCategory,
        label: impl Into<String>,
        unit: impl Into<String>,
        price: f64,
    ) -> CalcResult<Self> {
        let id = id.into();
        validate_price(&id, price)?;
        Ok(RateEntry {
            id,
            category,
            label: label.into(),
            unit: unit.into(),
            price,
            updated_at: Utc::now(),
        })
    }
}

fn validate_price(id: &str, price: f64) -> CalcResult<()> {
    if !price.is_finite() {
        return Err(CalcError::invalid_rate(id, price, "Price must be a finite number"));
    }
    if price < 0.0 {
        return Err(CalcError::invalid_rate(id, price, "Price cannot be negative"));
    }
    Ok(())
}

/// Thread-safe catalog of rates keyed by identifier.
///
/// Share it behind an `Arc` and pass [`RateCatalog::snapshot`] to the
/// calculators.
#[derive(Debug, Default)]
pub struct RateCatalog {
    entries: RwLock<HashMap<String, Arc<RateEntry>>>,
}

impl RateCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with the compiled-in default rates.
    pub fn with_defaults() -> Self {
        let now = Utc::now();
        let entries = DEFAULT_RATES
            .iter()
            .map(|seed| {
                let entry = RateEntry {
                    id: seed.id.to_string(),
                    category: seed.category,
                    label: seed.label.to_string(),
                    unit: seed.unit.to_string(),
                    price: seed.price,
                    updated_at: now,
                };
                (entry.id.clone(), Arc::new(entry))
            })
            .collect();
        RateCatalog {
            entries: RwLock::new(entries),
        }
    }

    /// Build a catalog from existing entries (e.g., loaded from a rate file).
    ///
    /// Every price is validated. When an identifier appears twice the later
    /// entry wins.
    pub fn from_entries(entries: impl IntoIterator<Item = RateEntry>) -> CalcResult<Self> {
        let mut map = HashMap::new();
        for entry in entries {
            validate_price(&entry.id, entry.price)?;
            if map.contains_key(&entry.id) {
                warn!(id = %entry.id, "duplicate rate id, keeping the later entry");
            }
            map.insert(entry.id.clone(), Arc::new(entry));
        }
        Ok(RateCatalog {
            entries: RwLock::new(map),
        })
    }

    /// Look up one rate.
    pub fn get(&self, id: &str) -> CalcResult<RateEntry> {
        self.entries
            .read()
            .get(id)
            .map(|entry| entry.as_ref().clone())
            .ok_or_else(|| CalcError::rate_not_found(id))
    }

    /// All rates, ordered by category then label.
    pub fn list(&self) -> Vec<RateEntry> {
        let mut rates: Vec<RateEntry> = self
            .entries
            .read()
            .values()
            .map(|entry| entry.as_ref().clone())
            .collect();
        sort_for_display(&mut rates);
        rates
    }

    /// Replace the price of an existing rate.
    ///
    /// Fails with [`CalcError::RateNotFound`] for an unknown identifier and
    /// [`CalcError::InvalidRate`] for a negative or non-finite price. The
    /// catalog is unchanged on failure.
    pub fn update(&self, id: &str, price: f64) -> CalcResult<RateEntry> {
        validate_price(id, price)?;

        let mut entries = self.entries.write();
        let current = entries.get(id).ok_or_else(|| CalcError::rate_not_found(id))?;

        let updated = RateEntry {
            price,
            updated_at: Utc::now(),
            ..current.as_ref().clone()
        };
        let old_price = current.price;
        entries.insert(id.to_string(), Arc::new(updated.clone()));
        drop(entries);

        info!(id, old_price, new_price = price, "rate updated");
        Ok(updated)
    }

    /// Take an immutable view of every rate as of now.
    pub fn snapshot(&self) -> RateSnapshot {
        let rates = self.entries.read().clone();
        debug!(rates = rates.len(), "rate snapshot taken");
        RateSnapshot { rates }
    }

    /// Number of rates
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when the catalog has no rates
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn sort_for_display(rates: &mut [RateEntry]) {
    rates.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.label.cmp(&b.label))
    });
}

/// Point-in-time copy of the catalog used for one estimation.
#[derive(Debug, Clone)]
pub struct RateSnapshot {
    rates: HashMap<String, Arc<RateEntry>>,
}

impl RateSnapshot {
    /// Unit price of a rate.
    pub fn price(&self, id: &str) -> CalcResult<f64> {
        self.rates
            .get(id)
            .map(|entry| entry.price)
            .ok_or_else(|| CalcError::rate_not_found(id))
    }

    /// Most recent `updated_at` across the snapshot, if any rates exist
    pub fn rates_as_of(&self) -> Option<DateTime<Utc>> {
        self.rates.values().map(|entry| entry.updated_at).max()
    }
}
