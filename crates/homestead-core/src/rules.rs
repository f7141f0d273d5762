//! Policy constants that govern a game: starting values and action costs.

use homestead_ledger::LedgerDefaults;

use crate::regen::EnergyRegen;

/// Everything the processor needs to know besides the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    /// Starting ledger values, also used by a total reset.
    pub ledger: LedgerDefaults,
    /// Number of plots created for a new farm.
    pub plot_count: u32,
    /// Energy spent by every successful plant.
    pub plant_energy_cost: u32,
    /// Energy spent by a tend that clears a malady.
    pub tend_energy_cost: u32,
    /// Growth of the experience threshold per level.
    pub level_up_increment: u64,
    /// Lazy energy regeneration, if enabled.
    pub energy_regen: Option<EnergyRegen>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            ledger: LedgerDefaults::default(),
            plot_count: 6,
            plant_energy_cost: 5,
            tend_energy_cost: 2,
            level_up_increment: 25,
            energy_regen: None,
        }
    }
}
