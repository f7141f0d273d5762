//! Enumeration types for the Homestead simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Plot status
// ---------------------------------------------------------------------------

/// Occupancy status of a land plot.
///
/// Readiness is deliberately absent: a growing crop is ready once its growth
/// duration has elapsed, which is derived from the clock on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PlotStatus {
    /// No crop planted. Initial state, re-entered after harvest or bulldoze.
    Empty,
    /// A crop is in the ground, ready or not.
    Growing,
}

// ---------------------------------------------------------------------------
// Maladies
// ---------------------------------------------------------------------------

/// A negative condition affecting a plot, cleared by tending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Malady {
    /// Pests on the crop; cleared with pesticide.
    Buggy,
    /// Weeds crowding the crop; cleared by weeding.
    Weedy,
    /// Dry soil; cleared by watering.
    Dry,
}

impl Malady {
    /// Every malady, in declaration order.
    pub const ALL: [Self; 3] = [Self::Buggy, Self::Weedy, Self::Dry];

    /// Lowercase name used in command syntax and messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buggy => "buggy",
            Self::Weedy => "weedy",
            Self::Dry => "dry",
        }
    }
}

impl core::fmt::Display for Malady {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown malady name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMalady(pub String);

impl core::fmt::Display for UnknownMalady {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown malady '{}' (expected buggy, weedy or dry)", self.0)
    }
}

impl std::error::Error for UnknownMalady {}

impl core::str::FromStr for Malady {
    type Err = UnknownMalady;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buggy" | "bugs" | "pest" => Ok(Self::Buggy),
            "weedy" | "weeds" | "weed" => Ok(Self::Weedy),
            "dry" | "water" => Ok(Self::Dry),
            _ => Err(UnknownMalady(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Severity attached to every outcome notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Severity {
    /// The command was applied.
    Success,
    /// Informational message that is neither a success nor a failure.
    Info,
    /// The command was rejected.
    Error,
}

// ---------------------------------------------------------------------------
// Rejection reasons
// ---------------------------------------------------------------------------

/// Why a command was rejected. Every kind is recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// The plot is in the wrong status for the requested transition.
    PreconditionViolation,
    /// Not enough currency.
    InsufficientFunds,
    /// Not enough energy.
    InsufficientEnergy,
    /// The crop id is not in the catalog.
    UnknownCrop,
    /// The plot id does not exist.
    UnknownPlot,
    /// The decoration id is not in the catalog.
    UnknownItem,
    /// The house is already at the top catalog tier.
    NoUpgradeAvailable,
    /// The decoration is already owned.
    AlreadyOwned,
}

impl RejectionReason {
    /// Short human-readable label for the reason.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreconditionViolation => "not possible right now",
            Self::InsufficientFunds => "not enough gold",
            Self::InsufficientEnergy => "not enough energy",
            Self::UnknownCrop => "no such crop",
            Self::UnknownPlot => "no such plot",
            Self::UnknownItem => "no such item",
            Self::NoUpgradeAvailable => "house is fully upgraded",
            Self::AlreadyOwned => "already owned",
        }
    }
}

impl core::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn malady_parses_aliases() {
        assert_eq!("buggy".parse::<Malady>().unwrap(), Malady::Buggy);
        assert_eq!("Weeds".parse::<Malady>().unwrap(), Malady::Weedy);
        assert_eq!("water".parse::<Malady>().unwrap(), Malady::Dry);
        assert!("mold".parse::<Malady>().is_err());
    }

    #[test]
    fn malady_display_round_trips_through_parse() {
        for malady in Malady::ALL {
            assert_eq!(malady.to_string().parse::<Malady>().unwrap(), malady);
        }
    }

    #[test]
    fn rejection_reason_serializes_by_name() {
        let json = serde_json::to_string(&RejectionReason::NoUpgradeAvailable).unwrap();
        assert_eq!(json, "\"NoUpgradeAvailable\"");
    }
}
