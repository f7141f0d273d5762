//! Read-only projection of the farm for display layers.
//!
//! Building a view never mutates anything, so a display loop may call it
//! as often as it likes: a crop that has become ready shows as ready, but
//! it stays in the ground until an explicit harvest.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use homestead_types::{CropId, DecorationId, Malady, PlotId, PlotStatus};
use homestead_world::{Catalog, LandPlot};

use crate::clock::MS_PER_SECOND;
use crate::regen::{self, EnergyRegen};
use crate::state::GameState;

/// Everything a display needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FarmView {
    /// Time the view was computed at, epoch ms.
    pub now_ms: i64,
    /// Ledger summary.
    pub ledger: LedgerView,
    /// Per-plot status, in id order.
    pub plots: Vec<PlotView>,
}

/// Ledger summary for the header bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LedgerView {
    /// Currency balance.
    pub currency: u64,
    /// Current energy.
    pub energy: u32,
    /// Energy cap.
    pub max_energy: u32,
    /// Player level.
    pub level: u32,
    /// Experience toward the next level.
    pub experience: u64,
    /// Experience needed for the next level.
    pub experience_to_next_level: u64,
    /// Farmhouse level.
    pub house_level: u32,
    /// Label of the current farmhouse tier, if the catalog has one.
    pub house_label: Option<String>,
    /// Cost of the next farmhouse tier, if any.
    pub next_upgrade_cost: Option<u64>,
    /// Decorations owned.
    pub owned_decorations: Vec<DecorationId>,
}

/// One plot as the display sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlotView {
    /// Plot id.
    pub id: PlotId,
    /// Empty or growing.
    pub status: PlotStatus,
    /// Crop in the ground.
    pub crop_id: Option<CropId>,
    /// Display name of that crop.
    pub crop_name: Option<String>,
    /// Whether the crop can be harvested now.
    pub ready: bool,
    /// Whole percent grown (0 for empty plots).
    pub percent: u8,
    /// Whole seconds until ready, rounded up.
    pub remaining_secs: u64,
    /// Active maladies.
    pub maladies: Vec<Malady>,
}

impl FarmView {
    /// Project `state` at `now_ms`.
    pub fn build(state: &GameState, catalog: &Catalog, now_ms: i64) -> Self {
        Self::build_with_regen(state, catalog, None, now_ms)
    }

    /// Project `state` at `now_ms`, showing energy with any regeneration
    /// owed under `regen` already credited.
    pub fn build_with_regen(
        state: &GameState,
        catalog: &Catalog,
        regen: Option<&EnergyRegen>,
        now_ms: i64,
    ) -> Self {
        let ledger = &state.ledger;
        let energy = regen.map_or_else(
            || ledger.energy(),
            |rate| regen::preview(ledger, rate, now_ms).energy,
        );
        Self {
            now_ms,
            ledger: LedgerView {
                currency: ledger.currency(),
                energy,
                max_energy: ledger.max_energy(),
                level: ledger.level(),
                experience: ledger.experience(),
                experience_to_next_level: ledger.experience_to_next_level(),
                house_level: ledger.house_level(),
                house_label: catalog
                    .upgrade_for_level(ledger.house_level())
                    .map(|tier| tier.label.clone()),
                next_upgrade_cost: catalog
                    .next_upgrade(ledger.house_level())
                    .map(|tier| tier.cost),
                owned_decorations: ledger.owned_decorations().iter().cloned().collect(),
            },
            plots: state
                .plots
                .iter()
                .map(|plot| PlotView::build(plot, catalog, now_ms))
                .collect(),
        }
    }

    /// Number of plots ready to harvest.
    pub fn ready_count(&self) -> usize {
        self.plots.iter().filter(|p| p.ready).count()
    }
}

impl PlotView {
    /// Project one plot at `now_ms`.
    pub fn build(plot: &LandPlot, catalog: &Catalog, now_ms: i64) -> Self {
        let crop_id = plot.occupying_crop_id().cloned();
        let crop_name = crop_id
            .as_ref()
            .and_then(|id| catalog.crop(id))
            .map(|def| def.name.clone());
        let progress = plot.progress(catalog, now_ms);

        Self {
            id: plot.id,
            status: plot.status(),
            crop_id,
            crop_name,
            ready: progress.is_some_and(|p| p.ready),
            percent: progress.map_or(0, |p| p.percent),
            remaining_secs: progress.map_or(0, |p| ceil_secs(p.remaining_ms)),
            maladies: plot.maladies().iter().copied().collect(),
        }
    }
}

fn ceil_secs(ms: i64) -> u64 {
    let rounded = ms
        .max(0)
        .saturating_add(MS_PER_SECOND.saturating_sub(1))
        .checked_div(MS_PER_SECOND)
        .unwrap_or(0);
    u64::try_from(rounded).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homestead_types::CropId;

    use super::*;
    use crate::rules::GameRules;

    #[test]
    fn empty_farm_view() {
        let state = GameState::new_game(&GameRules::default());
        let view = FarmView::build(&state, &Catalog::standard(), 0);
        assert_eq!(view.plots.len(), 6);
        assert_eq!(view.ready_count(), 0);
        assert_eq!(view.ledger.house_label.as_deref(), Some("Thatched Cottage"));
        assert_eq!(view.ledger.next_upgrade_cost, Some(500));
        assert!(view.plots.iter().all(|p| p.status == PlotStatus::Empty));
    }

    #[test]
    fn growing_plot_progress_and_rounding() {
        let catalog = Catalog::standard();
        let mut state = GameState::new_game(&GameRules::default());
        state
            .plot_mut(PlotId(0))
            .unwrap()
            .plant(&CropId::from("radish"), &catalog, 10_000)
            .unwrap();

        let view = FarmView::build(&state, &catalog, 10_000 + 14_500);
        let plot = view.plots.first().unwrap();
        assert_eq!(plot.crop_name.as_deref(), Some("White Radish"));
        assert_eq!(plot.percent, 48);
        assert_eq!(plot.remaining_secs, 16);
        assert!(!plot.ready);

        let later = FarmView::build(&state, &catalog, 10_000 + 30_000);
        assert!(later.plots.first().unwrap().ready);
        assert_eq!(later.ready_count(), 1);
    }

    #[test]
    fn building_a_view_does_not_harvest() {
        let catalog = Catalog::standard();
        let mut state = GameState::new_game(&GameRules::default());
        state
            .plot_mut(PlotId(1))
            .unwrap()
            .plant(&CropId::from("radish"), &catalog, 0)
            .unwrap();
        let before = state.clone();
        let _ = FarmView::build(&state, &catalog, 1_000_000);
        assert_eq!(state, before);
    }

    #[test]
    fn owed_regen_is_shown_without_settling() {
        let rate = EnergyRegen {
            points_per_interval: 1,
            interval_ms: 1_000,
        };
        let mut state = GameState::new_game(&GameRules::default());
        state.ledger.spend_energy(5).unwrap();
        state.ledger.mark_energy_settled(10_000);
        let before = state.clone();

        let view = FarmView::build_with_regen(&state, &Catalog::standard(), Some(&rate), 13_000);
        assert_eq!(view.ledger.energy, 98);
        assert_eq!(state, before);

        let plain = FarmView::build(&state, &Catalog::standard(), 13_000);
        assert_eq!(plain.ledger.energy, 95);
    }
}
