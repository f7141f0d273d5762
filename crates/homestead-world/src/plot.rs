//! Land plot state machine: planting, growth readiness, harvest, and upkeep.
//!
//! A plot is either [`PlotState::Empty`] or [`PlotState::Growing`]. The
//! growing state carries the crop id and planting timestamp together, so a
//! plot can never hold one without the other.
//!
//! Readiness is never stored. [`is_ready`] and [`growth_progress`] compute it
//! from the planting timestamp, the crop's growth duration, and the current
//! time, so a plot queried after any amount of wall-clock time (including
//! across a restart) reports exactly the right answer.
//!
//! Every transition has a validation-only `check_*` twin. The action
//! processor runs all checks for a command before it mutates anything.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use homestead_types::{CropDefinition, CropId, Malady, PlotId, PlotStatus};

use crate::catalog::Catalog;
use crate::error::PlotError;

// ---------------------------------------------------------------------------
// Growth computation
// ---------------------------------------------------------------------------

/// Milliseconds elapsed since planting, never negative.
///
/// A clock reading earlier than the planting timestamp counts as zero
/// elapsed time.
pub fn elapsed_ms(planted_at_ms: i64, now_ms: i64) -> i64 {
    now_ms.saturating_sub(planted_at_ms).max(0)
}

/// Whether a crop planted at `planted_at_ms` is ready at `now_ms`.
///
/// False for every `now_ms < planted_at_ms + duration`, true for every
/// `now_ms >= planted_at_ms + duration`.
pub fn is_ready(planted_at_ms: i64, growth_duration_ms: i64, now_ms: i64) -> bool {
    elapsed_ms(planted_at_ms, now_ms) >= growth_duration_ms
}

/// Snapshot of how far a crop has grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthProgress {
    /// Milliseconds since planting.
    pub elapsed_ms: i64,
    /// Milliseconds until ready (zero once ready).
    pub remaining_ms: i64,
    /// Whole percent grown, `0..=100`.
    pub percent: u8,
    /// Whether the crop can be harvested.
    pub ready: bool,
}

/// Compute growth progress for a crop.
pub fn growth_progress(planted_at_ms: i64, growth_duration_ms: i64, now_ms: i64) -> GrowthProgress {
    let elapsed = elapsed_ms(planted_at_ms, now_ms);
    let ready = is_ready(planted_at_ms, growth_duration_ms, now_ms);
    let remaining_ms = growth_duration_ms.saturating_sub(elapsed).max(0);

    let percent = if ready || growth_duration_ms <= 0 {
        100
    } else {
        i128::from(elapsed)
            .checked_mul(100)
            .and_then(|scaled| scaled.checked_div(i128::from(growth_duration_ms)))
            .and_then(|pct| u8::try_from(pct.min(100)).ok())
            .unwrap_or(100)
    };

    GrowthProgress {
        elapsed_ms: elapsed,
        remaining_ms,
        percent,
        ready,
    }
}

// ---------------------------------------------------------------------------
// PlotState
// ---------------------------------------------------------------------------

/// Occupancy of a plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum PlotState {
    /// Nothing planted.
    Empty,
    /// A crop is growing (and may already be ready).
    Growing {
        /// The crop in the ground.
        crop_id: CropId,
        /// Epoch milliseconds at planting.
        planted_at_ms: i64,
    },
}

// ---------------------------------------------------------------------------
// LandPlot
// ---------------------------------------------------------------------------

/// One farmable plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandPlot {
    /// Stable index of this plot.
    pub id: PlotId,
    state: PlotState,
    #[serde(default)]
    maladies: BTreeSet<Malady>,
}

impl LandPlot {
    /// Create an empty plot with no maladies.
    pub const fn new(id: PlotId) -> Self {
        Self {
            id,
            state: PlotState::Empty,
            maladies: BTreeSet::new(),
        }
    }

    /// Create `count` empty plots numbered `0..count`.
    pub fn create_farm(count: u32) -> Vec<Self> {
        (0..count).map(|i| Self::new(PlotId(i))).collect()
    }

    /// Current occupancy.
    pub const fn state(&self) -> &PlotState {
        &self.state
    }

    /// Whether the plot is empty or growing.
    pub const fn status(&self) -> PlotStatus {
        match self.state {
            PlotState::Empty => PlotStatus::Empty,
            PlotState::Growing { .. } => PlotStatus::Growing,
        }
    }

    /// The crop in the ground, if any.
    pub const fn occupying_crop_id(&self) -> Option<&CropId> {
        match &self.state {
            PlotState::Empty => None,
            PlotState::Growing { crop_id, .. } => Some(crop_id),
        }
    }

    /// When the current crop was planted, if any.
    pub const fn planted_at_ms(&self) -> Option<i64> {
        match self.state {
            PlotState::Empty => None,
            PlotState::Growing { planted_at_ms, .. } => Some(planted_at_ms),
        }
    }

    /// Active maladies.
    pub const fn maladies(&self) -> &BTreeSet<Malady> {
        &self.maladies
    }

    /// Whether the given malady is active.
    pub fn has_malady(&self, malady: Malady) -> bool {
        self.maladies.contains(&malady)
    }

    /// Growth progress of the current crop.
    ///
    /// `None` if the plot is empty or its crop is no longer in the catalog.
    pub fn progress(&self, catalog: &Catalog, now_ms: i64) -> Option<GrowthProgress> {
        let PlotState::Growing {
            crop_id,
            planted_at_ms,
        } = &self.state
        else {
            return None;
        };
        let def = catalog.crop(crop_id)?;
        Some(growth_progress(*planted_at_ms, def.growth_duration_ms(), now_ms))
    }

    /// Whether the current crop can be harvested at `now_ms`.
    pub fn is_ready(&self, catalog: &Catalog, now_ms: i64) -> bool {
        self.progress(catalog, now_ms).is_some_and(|p| p.ready)
    }

    // -----------------------------------------------------------------------
    // Plant
    // -----------------------------------------------------------------------

    /// Validate planting `crop_id` without mutating.
    ///
    /// # Errors
    ///
    /// [`PlotError::Occupied`] if the plot is growing,
    /// [`PlotError::UnknownCrop`] if the crop is not in the catalog.
    pub fn check_plant<'c>(
        &self,
        crop_id: &CropId,
        catalog: &'c Catalog,
    ) -> Result<&'c CropDefinition, PlotError> {
        if let PlotState::Growing { crop_id: current, .. } = &self.state {
            return Err(PlotError::Occupied {
                plot: self.id,
                crop: current.clone(),
            });
        }
        catalog
            .crop(crop_id)
            .ok_or_else(|| PlotError::UnknownCrop(crop_id.clone()))
    }

    /// Plant `crop_id` at `now_ms`. No economic side effect.
    ///
    /// # Errors
    ///
    /// Same as [`check_plant`](Self::check_plant).
    pub fn plant<'c>(
        &mut self,
        crop_id: &CropId,
        catalog: &'c Catalog,
        now_ms: i64,
    ) -> Result<&'c CropDefinition, PlotError> {
        let def = self.check_plant(crop_id, catalog)?;
        self.state = PlotState::Growing {
            crop_id: def.id.clone(),
            planted_at_ms: now_ms,
        };
        Ok(def)
    }

    // -----------------------------------------------------------------------
    // Harvest
    // -----------------------------------------------------------------------

    /// Validate harvesting without mutating.
    ///
    /// # Errors
    ///
    /// [`PlotError::Empty`] if nothing is planted, [`PlotError::UnknownCrop`]
    /// if the planted crop has left the catalog, [`PlotError::NotReady`] if
    /// the crop is still growing.
    pub fn check_harvest<'c>(
        &self,
        catalog: &'c Catalog,
        now_ms: i64,
    ) -> Result<&'c CropDefinition, PlotError> {
        let PlotState::Growing {
            crop_id,
            planted_at_ms,
        } = &self.state
        else {
            return Err(PlotError::Empty { plot: self.id });
        };
        let def = catalog
            .crop(crop_id)
            .ok_or_else(|| PlotError::UnknownCrop(crop_id.clone()))?;
        let progress = growth_progress(*planted_at_ms, def.growth_duration_ms(), now_ms);
        if !progress.ready {
            return Err(PlotError::NotReady {
                plot: self.id,
                crop: crop_id.clone(),
                remaining_ms: progress.remaining_ms,
            });
        }
        Ok(def)
    }

    /// Harvest a ready crop, returning the plot to empty and clearing all
    /// maladies.
    ///
    /// # Errors
    ///
    /// Same as [`check_harvest`](Self::check_harvest).
    pub fn harvest<'c>(
        &mut self,
        catalog: &'c Catalog,
        now_ms: i64,
    ) -> Result<&'c CropDefinition, PlotError> {
        let def = self.check_harvest(catalog, now_ms)?;
        self.clear();
        Ok(def)
    }

    // -----------------------------------------------------------------------
    // Bulldoze
    // -----------------------------------------------------------------------

    /// Validate bulldozing without mutating, returning the crop that would
    /// be destroyed.
    ///
    /// # Errors
    ///
    /// [`PlotError::Empty`] if nothing is planted.
    pub fn check_bulldoze(&self) -> Result<&CropId, PlotError> {
        self.occupying_crop_id()
            .ok_or(PlotError::Empty { plot: self.id })
    }

    /// Destroy the current crop without reward, returning the plot to empty.
    ///
    /// # Errors
    ///
    /// [`PlotError::Empty`] if nothing is planted.
    pub fn bulldoze(&mut self) -> Result<CropId, PlotError> {
        let crop = self.check_bulldoze()?.clone();
        self.clear();
        Ok(crop)
    }

    // -----------------------------------------------------------------------
    // Maladies
    // -----------------------------------------------------------------------

    /// Clear a malady. Valid in any status; returns whether it was present.
    pub fn tend(&mut self, malady: Malady) -> bool {
        self.maladies.remove(&malady)
    }

    /// Add a malady to a growing crop; returns whether it was newly added.
    ///
    /// # Errors
    ///
    /// [`PlotError::Empty`] if nothing is planted.
    pub fn afflict(&mut self, malady: Malady) -> Result<bool, PlotError> {
        if self.status() == PlotStatus::Empty {
            return Err(PlotError::Empty { plot: self.id });
        }
        Ok(self.maladies.insert(malady))
    }

    fn clear(&mut self) {
        self.state = PlotState::Empty;
        self.maladies.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
