//! Shared type definitions for the Homestead farming simulation.
//!
//! This crate is the vocabulary every other workspace crate speaks. Types
//! defined here flow downstream to `TypeScript` via `ts-rs` so that a display
//! layer can render plots and outcomes without re-declaring them.
//!
//! # Modules
//!
//! - [`ids`] -- Plot indices, catalog keys, and command UUIDs
//! - [`enums`] -- Plot status, maladies, severities, rejection reasons
//! - [`structs`] -- Catalog entries (crops, upgrade tiers, decorations)
//! - [`actions`] -- Commands, outcomes, and notifications

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{AppliedEffects, Command, Notification, Outcome, Rejection};
pub use enums::{Malady, PlotStatus, RejectionReason, Severity, UnknownMalady};
pub use ids::{CommandId, CropId, DecorationId, PlotId};
pub use structs::{CropDefinition, DecorationItem, UpgradeTier};
