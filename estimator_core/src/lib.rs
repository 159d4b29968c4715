//! # estimator_core - Construction Material & Cost Estimation Engine
//!
//! `estimator_core` converts building geometry (walls, slabs, frames, floor
//! plans) into material quantities and a categorized cost budget. All inputs
//! and outputs are JSON-serializable, so the same types serve a CLI, an HTTP
//! handler or a batch job.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Calculators are pure functions from input to result
//! - **JSON-First**: All types implement Serialize/Deserialize and accept
//!   the field names used by existing clients (`area`, `finish_quality`, ...)
//! - **Rich Errors**: Structured error types, not just strings
//! - **Injected Prices**: Costs come from a [`rates::RateSnapshot`], never
//!   from globals
//!
//! ## Quick Start
//!
//! ```rust
//! use estimator_core::calculations::wall::{calculate, WallInput, WallThickness};
//!
//! let wall = WallInput {
//!     label: "Boundary wall".to_string(),
//!     length_ft: 10.0,
//!     height_ft: 10.0,
//!     thickness: WallThickness::NineInch,
//!     ratio: "1:6".to_string(),
//! };
//!
//! let result = calculate(&wall).unwrap();
//! println!("{} bricks, {} bags of cement", result.bricks, result.cement_bags);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Wall, concrete, plaster and flooring calculators
//! - [`budget`] - Floor-by-floor budget aggregation
//! - [`rates`] - Rate catalog, snapshots and rate files
//! - [`mix_ratio`] - Mix ratio parsing and concrete grades
//! - [`quality`] - Finish-quality tiers
//! - [`settings`] - Wastage and floor heuristics
//! - [`units`] - Type-safe unit wrappers and conversion constants
//! - [`errors`] - Structured error types

pub mod budget;
pub mod calculations;
pub mod errors;
mod generated;
pub mod mix_ratio;
pub mod quality;
pub mod rates;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use budget::{BudgetInput, EstimationResult, FloorConfiguration};
pub use errors::{CalcError, CalcResult};
pub use mix_ratio::{ConcreteGrade, MixRatio};
pub use quality::{QualityProfile, QualityTier};
pub use rates::{RateCatalog, RateCategory, RateEntry, RateSnapshot};
pub use settings::EstimatorSettings;

#[cfg(not(target_arch = "wasm32"))]
pub use rates::store::{load_catalog, save_catalog, update_rate_file, RateFileGuard};
