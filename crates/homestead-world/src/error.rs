//! Error types for the `homestead-world` crate.
//!
//! Plot transitions fail with [`PlotError`]; catalog construction fails with
//! [`CatalogError`]. Each plot error maps onto the [`RejectionReason`] that
//! the action processor reports to the player.

use homestead_types::{CropId, DecorationId, PlotId, RejectionReason};

/// Errors raised by land plot transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlotError {
    /// The plot already holds a crop.
    #[error("plot {plot} is already growing {crop}")]
    Occupied {
        /// The occupied plot.
        plot: PlotId,
        /// The crop in the ground.
        crop: CropId,
    },

    /// The plot holds no crop.
    #[error("plot {plot} is empty")]
    Empty {
        /// The empty plot.
        plot: PlotId,
    },

    /// The crop has not finished growing.
    #[error("{crop} on plot {plot} needs {remaining_ms} more ms to grow")]
    NotReady {
        /// The plot.
        plot: PlotId,
        /// The growing crop.
        crop: CropId,
        /// Milliseconds until the crop is ready.
        remaining_ms: i64,
    },

    /// The crop id is not in the catalog.
    #[error("unknown crop: {0}")]
    UnknownCrop(CropId),
}

impl PlotError {
    /// The rejection reason reported for this error.
    pub const fn reason(&self) -> RejectionReason {
        match self {
            Self::Occupied { .. } | Self::Empty { .. } | Self::NotReady { .. } => {
                RejectionReason::PreconditionViolation
            }
            Self::UnknownCrop(_) => RejectionReason::UnknownCrop,
        }
    }
}

/// Errors raised while validating catalog data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The catalog defines no crops.
    #[error("catalog must define at least one crop")]
    NoCrops,

    /// An id the command parser could never produce: empty, containing
    /// whitespace, or not lowercase.
    #[error("invalid catalog id {0:?}: ids must be non-empty lowercase words")]
    InvalidId(String),

    /// Two crops share an id.
    #[error("duplicate crop id: {0}")]
    DuplicateCrop(CropId),

    /// A crop would be ready the instant it is planted.
    #[error("crop {0} has a zero growth duration")]
    ZeroGrowthDuration(CropId),

    /// Two decorations share an id.
    #[error("duplicate decoration id: {0}")]
    DuplicateDecoration(DecorationId),

    /// Upgrade tiers are not strictly increasing in level and cost.
    #[error("upgrade tier for level {level} must have a higher level and cost than level {previous_level}")]
    TierOrder {
        /// Level of the preceding tier.
        previous_level: u32,
        /// Level of the offending tier.
        level: u32,
    },
}
