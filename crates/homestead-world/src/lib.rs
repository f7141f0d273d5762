//! Catalog, land plots, and crop growth for the Homestead simulation.
//!
//! This crate models the farm itself: the immutable catalog of crops,
//! upgrades, and decorations; the per-plot state machine; and the external
//! hazard collaborator that proposes pests, weeds, and dry soil.
//!
//! # Modules
//!
//! - [`catalog`] -- Validated, immutable game data with lookups.
//! - [`error`] -- Plot transition and catalog validation errors.
//! - [`hazard`] -- Seeded malady proposals for growing plots.
//! - [`plot`] -- [`LandPlot`] state machine and the pure readiness
//!   computation.

pub mod catalog;
pub mod error;
pub mod hazard;
pub mod plot;

// Re-export primary types at crate root.
pub use catalog::Catalog;
pub use error::{CatalogError, PlotError};
pub use hazard::MaladyInjector;
pub use plot::{GrowthProgress, LandPlot, PlotState, growth_progress, is_ready};
