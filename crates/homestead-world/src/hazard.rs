//! Stochastic malady injection.
//!
//! Pests, weeds, and dry soil are not part of the core's invariants: they are
//! proposed by an external collaborator with its own policy. The
//! [`MaladyInjector`] is that collaborator. It only *proposes* maladies; the
//! proposals must be applied through the action processor so that every
//! mutation still flows through the single serialized entry point.
//!
//! # Determinism
//!
//! The injector is seeded, so the same seed and the same sequence of plot
//! collections always yield the same proposals.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use homestead_types::{Malady, PlotId, PlotStatus};

use crate::plot::LandPlot;

/// Denominator for [`MaladyInjector`] chances (basis points).
pub const BASIS_POINTS: u32 = 10_000;

/// Proposes new maladies for growing plots.
#[derive(Debug, Clone)]
pub struct MaladyInjector {
    rng: SmallRng,
    chance_bp: u32,
}

impl MaladyInjector {
    /// Create an injector that afflicts each growing plot with probability
    /// `chance_bp / 10_000` per roll. Chances above 10 000 are clamped.
    pub fn new(seed: u64, chance_bp: u32) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            chance_bp: chance_bp.min(BASIS_POINTS),
        }
    }

    /// Per-roll chance in basis points.
    pub const fn chance_bp(&self) -> u32 {
        self.chance_bp
    }

    /// Roll once over the plot collection.
    ///
    /// Proposes at most one malady per growing plot, chosen among the
    /// maladies the plot does not already have. Empty plots and plots with
    /// every malady are skipped.
    pub fn roll(&mut self, plots: &[LandPlot]) -> Vec<(PlotId, Malady)> {
        let mut proposals = Vec::new();
        if self.chance_bp == 0 {
            return proposals;
        }

        for plot in plots {
            if plot.status() != PlotStatus::Growing {
                continue;
            }
            let absent: Vec<Malady> = Malady::ALL
                .into_iter()
                .filter(|m| !plot.has_malady(*m))
                .collect();
            if absent.is_empty() {
                continue;
            }
            if self.rng.random_range(0..BASIS_POINTS) >= self.chance_bp {
                continue;
            }
            let pick = self.rng.random_range(0..absent.len());
            if let Some(malady) = absent.get(pick) {
                proposals.push((plot.id, *malady));
            }
        }

        if !proposals.is_empty() {
            tracing::debug!(count = proposals.len(), "Maladies proposed");
        }
        proposals
    }
}
