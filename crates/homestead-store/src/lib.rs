//! File-backed persistence for the Homestead simulation.
//!
//! [`JsonFileStore`] implements the core's
//! [`PersistenceGateway`](homestead_core::persistence::PersistenceGateway)
//! by writing each snapshot as pretty-printed JSON. Writes go to a
//! temporary sibling file that is then renamed over the save file, so a
//! crash mid-write leaves the previous save intact.
//!
//! # Modules
//!
//! - [`json_file`] -- [`JsonFileStore`] gateway
//! - [`error`] -- Shared error types

pub mod error;
pub mod json_file;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use json_file::JsonFileStore;
