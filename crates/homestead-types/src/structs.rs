//! Catalog entry structs: crops, house upgrade tiers, and decorations.
//!
//! These are immutable, process-lifetime data. The `homestead-world` crate
//! bundles them into a validated `Catalog`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{CropId, DecorationId};

// ---------------------------------------------------------------------------
// CropDefinition
// ---------------------------------------------------------------------------

/// A plantable crop: how long it grows and what it is worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CropDefinition {
    /// Catalog key.
    pub id: CropId,
    /// Display name.
    pub name: String,
    /// Real-time seconds between planting and readiness.
    pub growth_duration_seconds: u64,
    /// Currency paid when planting.
    pub buy_price: u64,
    /// Currency credited on harvest.
    pub sell_price: u64,
    /// Experience granted on harvest.
    pub xp_reward: u64,
}

impl CropDefinition {
    /// Growth duration in milliseconds, saturating at `i64::MAX`.
    pub fn growth_duration_ms(&self) -> i64 {
        let ms = self.growth_duration_seconds.saturating_mul(1000);
        i64::try_from(ms).unwrap_or(i64::MAX)
    }
}

// ---------------------------------------------------------------------------
// UpgradeTier
// ---------------------------------------------------------------------------

/// One level of the farmhouse.
///
/// Tiers are ordered with strictly increasing `level` and `cost`. Reaching a
/// tier raises the player's maximum energy by `energy_bonus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UpgradeTier {
    /// House level this tier represents (the baseline house is level 1).
    pub level: u32,
    /// Currency cost to upgrade into this tier.
    pub cost: u64,
    /// Maximum-energy increase granted on reaching this tier.
    pub energy_bonus: u32,
    /// Display label.
    pub label: String,
}

// ---------------------------------------------------------------------------
// DecorationItem
// ---------------------------------------------------------------------------

/// A cosmetic item the player can buy once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DecorationItem {
    /// Catalog key.
    pub id: DecorationId,
    /// Display name.
    pub name: String,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
    /// Currency cost.
    pub price: u64,
}
