//! The owned game state and its lifecycle: new game, bootstrap from a
//! stored snapshot, and conversion back to a snapshot.

use homestead_ledger::{InvariantCheck, PlayerLedger};
use homestead_types::PlotId;
use homestead_world::{Catalog, LandPlot};

use crate::persistence::{PersistenceGateway, SNAPSHOT_FORMAT_VERSION, Snapshot};
use crate::rules::GameRules;

/// Why a stored snapshot was discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotRejected {
    /// Written by an incompatible format version.
    #[error("snapshot format version {found}, expected {expected}")]
    Version {
        /// Version found in the snapshot.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// The ledger breaks its invariants.
    #[error("{0}")]
    Ledger(homestead_ledger::LedgerAnomaly),

    /// Plot ids are not `0..n` in order.
    #[error("plot at position {position} has id {id}")]
    PlotOrder {
        /// Index in the stored list.
        position: usize,
        /// Id found there.
        id: PlotId,
    },
}

/// The ledger and every plot: the whole mutable state of one farm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// The player's account.
    pub ledger: PlayerLedger,
    /// Plots indexed by [`PlotId::index`].
    pub plots: Vec<LandPlot>,
}

impl GameState {
    /// A fresh farm built from the rules' defaults.
    pub fn new_game(rules: &GameRules) -> Self {
        Self {
            ledger: PlayerLedger::new(&rules.ledger),
            plots: LandPlot::create_farm(rules.plot_count),
        }
    }

    /// Validate a stored snapshot and turn it into live state.
    ///
    /// Plots planted with crops the catalog no longer lists are kept (they
    /// can still be bulldozed) and logged.
    ///
    /// # Errors
    ///
    /// [`SnapshotRejected`] if the version is wrong, the ledger violates its
    /// invariants, or plot ids are out of order.
    pub fn from_snapshot(
        snapshot: Snapshot,
        catalog: &Catalog,
    ) -> Result<Self, SnapshotRejected> {
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotRejected::Version {
                found: snapshot.format_version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }
        if let InvariantCheck::Anomaly(anomaly) = snapshot.ledger.verify_invariants() {
            return Err(SnapshotRejected::Ledger(anomaly));
        }
        for (position, plot) in snapshot.plots.iter().enumerate() {
            if plot.id.index() != position {
                return Err(SnapshotRejected::PlotOrder {
                    position,
                    id: plot.id,
                });
            }
            if let Some(crop) = plot.occupying_crop_id()
                && catalog.crop(crop).is_none()
            {
                tracing::warn!(
                    plot = %plot.id,
                    %crop,
                    "Stored plot holds a crop missing from the catalog"
                );
            }
        }
        Ok(Self {
            ledger: snapshot.ledger,
            plots: snapshot.plots,
        })
    }

    /// Load state through `gateway`, falling back to a new game.
    ///
    /// A missing snapshot is a normal first run. An unreadable, corrupt,
    /// version-mismatched, or invariant-violating snapshot is logged and
    /// also replaced by a new game; none of these are errors.
    pub fn bootstrap<G: PersistenceGateway>(
        gateway: &G,
        rules: &GameRules,
        catalog: &Catalog,
    ) -> Self {
        match gateway.load() {
            Ok(None) => {
                tracing::info!(
                    plots = rules.plot_count,
                    "No saved farm found, starting a new game"
                );
                Self::new_game(rules)
            }
            Ok(Some(snapshot)) => match Self::from_snapshot(snapshot, catalog) {
                Ok(state) => {
                    tracing::info!(
                        plots = state.plots.len(),
                        currency = state.ledger.currency(),
                        level = state.ledger.level(),
                        "Loaded saved farm"
                    );
                    state
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Saved farm rejected, starting a new game");
                    Self::new_game(rules)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Saved farm unreadable, starting a new game");
                Self::new_game(rules)
            }
        }
    }

    /// Copy the state into a current-version snapshot.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::new(self.ledger.clone(), self.plots.clone())
    }

    /// Look up a plot.
    pub fn plot(&self, id: PlotId) -> Option<&LandPlot> {
        self.plots.get(id.index())
    }

    /// Look up a plot for mutation.
    pub fn plot_mut(&mut self, id: PlotId) -> Option<&mut LandPlot> {
        self.plots.get_mut(id.index())
    }
}
