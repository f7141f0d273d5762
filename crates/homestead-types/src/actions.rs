//! Player commands, their outcomes, and the notifications they produce.
//!
//! A [`Command`] enters the action processor; it comes back as an
//! [`Outcome`] and exactly one [`Notification`] is emitted for it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Malady, RejectionReason, Severity};
use crate::ids::{CommandId, CropId, DecorationId, PlotId};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A player command accepted by the action processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Command {
    /// Plant a crop on an empty plot. Costs the crop's buy price and energy.
    Plant {
        /// Target plot.
        plot_id: PlotId,
        /// Crop to plant.
        crop_id: CropId,
    },
    /// Harvest a ready crop. Credits the sell price and grants experience.
    Harvest {
        /// Target plot.
        plot_id: PlotId,
    },
    /// Clear one malady from a plot. Costs a small amount of energy.
    Tend {
        /// Target plot.
        plot_id: PlotId,
        /// Malady to clear.
        malady: Malady,
    },
    /// Dig up a growing crop without reward.
    Bulldoze {
        /// Target plot.
        plot_id: PlotId,
    },
    /// Upgrade the farmhouse to the next catalog tier.
    UpgradeHouse,
    /// Buy a decoration from the catalog.
    BuyDecoration {
        /// Decoration to buy.
        decoration_id: DecorationId,
    },
}

impl Command {
    /// The plot this command targets, if any.
    pub const fn plot_id(&self) -> Option<PlotId> {
        match self {
            Self::Plant { plot_id, .. }
            | Self::Harvest { plot_id }
            | Self::Tend { plot_id, .. }
            | Self::Bulldoze { plot_id } => Some(*plot_id),
            Self::UpgradeHouse | Self::BuyDecoration { .. } => None,
        }
    }

    /// Short verb naming the command, used in logs.
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Plant { .. } => "plant",
            Self::Harvest { .. } => "harvest",
            Self::Tend { .. } => "tend",
            Self::Bulldoze { .. } => "bulldoze",
            Self::UpgradeHouse => "upgrade_house",
            Self::BuyDecoration { .. } => "buy_decoration",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Summary of everything a successful command changed.
///
/// Fields that do not apply to a command keep their default (zero or `None`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AppliedEffects {
    /// The plot that was mutated.
    pub plot_id: Option<PlotId>,
    /// The crop planted, harvested, or bulldozed.
    pub crop_id: Option<CropId>,
    /// Net currency change (negative for purchases).
    pub currency_delta: i64,
    /// Energy consumed by the command.
    pub energy_spent: u32,
    /// Experience granted.
    pub experience_gained: u64,
    /// Number of player levels gained.
    pub levels_gained: u32,
    /// New house level after an upgrade.
    pub house_level: Option<u32>,
    /// Decoration acquired.
    pub decoration_id: Option<DecorationId>,
    /// Malady cleared or added, if it was present or absent respectively.
    pub malady: Option<Malady>,
}

/// Why a command was refused, with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Rejection {
    /// Machine-readable reason.
    pub reason: RejectionReason,
    /// Human-readable detail.
    pub detail: String,
}

/// Result of processing one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Outcome {
    /// The command was applied atomically.
    Success(AppliedEffects),
    /// The command was refused; nothing changed.
    Rejected(Rejection),
}

impl Outcome {
    /// Whether the command was applied.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The rejection reason, if the command was refused.
    pub const fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            Self::Success(_) => None,
            Self::Rejected(rejection) => Some(rejection.reason),
        }
    }

    /// The applied effects, if the command succeeded.
    pub const fn effects(&self) -> Option<&AppliedEffects> {
        match self {
            Self::Success(effects) => Some(effects),
            Self::Rejected(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// The single message emitted for a processed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notification {
    /// The command this notification reports on.
    pub command_id: CommandId,
    /// Human-readable message.
    pub message: String,
    /// Severity of the outcome.
    pub severity: Severity,
}
