//! The action processor: the single entry point for every state change.
//!
//! Each command runs in three steps:
//!
//! 1. **Validate** -- every plot and ledger precondition the command touches
//!    is checked through the non-mutating `check_*` methods.
//! 2. **Apply** -- only when all checks pass are the mutations performed.
//! 3. **Report** -- exactly one [`Notification`] goes to the sink and the
//!    [`Outcome`] is returned.
//!
//! Because validation completes before the first mutation, a rejected
//! command leaves both the plots and the ledger exactly as they were.
//! All entry points take `&mut self`, so commands are serialized by
//! construction.

use std::sync::Arc;

use tracing::{debug, info};

use homestead_ledger::{LedgerError, PlayerLedger};
use homestead_types::{
    AppliedEffects, Command, CommandId, CropId, DecorationId, Malady, Notification, Outcome,
    PlotId, Rejection, RejectionReason, Severity,
};
use homestead_world::{Catalog, LandPlot, PlotError};

use crate::clock::{Clock, SystemClock};
use crate::notify::{NotificationSink, TracingSink};
use crate::persistence::Snapshot;
use crate::regen;
use crate::rules::GameRules;
use crate::state::GameState;
use crate::view::FarmView;

/// Why a command could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The plot id does not exist.
    #[error("there is no plot {0}")]
    UnknownPlot(PlotId),

    /// A plot precondition failed.
    #[error(transparent)]
    Plot(#[from] PlotError),

    /// A ledger precondition failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl CommandError {
    /// The rejection reason reported for this error.
    pub const fn reason(&self) -> RejectionReason {
        match self {
            Self::UnknownPlot(_) => RejectionReason::UnknownPlot,
            Self::Plot(e) => e.reason(),
            Self::Ledger(e) => e.reason(),
        }
    }

    fn into_rejection(self) -> Rejection {
        Rejection {
            reason: self.reason(),
            detail: self.to_string(),
        }
    }
}

/// What a successful command did, plus the message to report.
struct Applied {
    effects: AppliedEffects,
    message: String,
    severity: Severity,
}

impl Applied {
    const fn success(effects: AppliedEffects, message: String) -> Self {
        Self {
            effects,
            message,
            severity: Severity::Success,
        }
    }
}

/// Owns the game state and applies commands to it.
#[derive(Debug)]
pub struct ActionProcessor<C = SystemClock, N = TracingSink> {
    state: GameState,
    catalog: Arc<Catalog>,
    rules: GameRules,
    clock: C,
    sink: N,
}

impl<C: Clock, N: NotificationSink> ActionProcessor<C, N> {
    /// Create a processor over existing state.
    pub const fn new(
        state: GameState,
        catalog: Arc<Catalog>,
        rules: GameRules,
        clock: C,
        sink: N,
    ) -> Self {
        Self {
            state,
            catalog,
            rules,
            clock,
            sink,
        }
    }

    /// Current state (read-only).
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The catalog in use.
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The policy constants in use.
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// The notification sink.
    pub const fn sink(&self) -> &N {
        &self.sink
    }

    /// Current time according to the processor's clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Copy of the state for persistence.
    pub fn snapshot(&self) -> Snapshot {
        self.state.to_snapshot()
    }

    /// Read-only projection at the current time. Never mutates.
    ///
    /// Energy includes any regeneration owed but not yet settled.
    pub fn view(&self) -> FarmView {
        FarmView::build_with_regen(
            &self.state,
            &self.catalog,
            self.rules.energy_regen.as_ref(),
            self.clock.now_ms(),
        )
    }

    /// Validate and apply one command, emitting exactly one notification.
    pub fn process(&mut self, command: &Command) -> Outcome {
        let command_id = CommandId::new();
        let now_ms = self.clock.now_ms();
        let unsettled = self.stage_energy(now_ms);

        let result = match command {
            Command::Plant { plot_id, crop_id } => self.plant(*plot_id, crop_id, now_ms),
            Command::Harvest { plot_id } => self.harvest(*plot_id, now_ms),
            Command::Tend { plot_id, malady } => self.tend(*plot_id, *malady),
            Command::Bulldoze { plot_id } => self.bulldoze(*plot_id),
            Command::UpgradeHouse => self.upgrade_house(),
            Command::BuyDecoration { decoration_id } => self.buy_decoration(decoration_id),
        };

        // Regeneration is committed together with the command or not at all.
        if result.is_err()
            && let Some(ledger) = unsettled
        {
            self.state.ledger = ledger;
        }

        self.finish(command_id, command.verb(), result)
    }

    /// Add a malady to a growing plot on behalf of the hazard collaborator.
    ///
    /// Goes through the same serialized path as player commands and emits
    /// exactly one notification.
    pub fn afflict(&mut self, plot_id: PlotId, malady: Malady) -> Outcome {
        let command_id = CommandId::new();
        let result = self.apply_malady(plot_id, malady);
        self.finish(command_id, "afflict", result)
    }

    /// Discard all progress and start a new game from the rules' defaults.
    pub fn reset(&mut self) {
        self.state = GameState::new_game(&self.rules);
        info!(plots = self.state.plots.len(), "Farm reset");
        self.sink.notify(Notification {
            command_id: CommandId::new(),
            message: "Farm reset. Starting fresh!".to_owned(),
            severity: Severity::Info,
        });
    }

    // -----------------------------------------------------------------------
    // Shared plumbing
    // -----------------------------------------------------------------------

    fn finish(
        &mut self,
        command_id: CommandId,
        verb: &'static str,
        result: Result<Applied, CommandError>,
    ) -> Outcome {
        let (outcome, message, severity) = match result {
            Ok(applied) => {
                info!(
                    %command_id,
                    verb,
                    currency_delta = applied.effects.currency_delta,
                    energy_spent = applied.effects.energy_spent,
                    currency = self.state.ledger.currency(),
                    energy = self.state.ledger.energy(),
                    "Command applied"
                );
                (Outcome::Success(applied.effects), applied.message, applied.severity)
            }
            Err(e) => {
                let rejection = e.into_rejection();
                debug!(
                    %command_id,
                    verb,
                    reason = %rejection.reason,
                    detail = %rejection.detail,
                    "Command rejected"
                );
                let message =
                    capitalize(&format!("{}: {}", rejection.reason.label(), rejection.detail));
                (Outcome::Rejected(rejection), message, Severity::Error)
            }
        };

        self.sink.notify(Notification {
            command_id,
            message,
            severity,
        });
        outcome
    }

    /// Swap in a ledger with regeneration settled at `now_ms`, returning
    /// the previous ledger so a rejected command can put it back.
    fn stage_energy(&mut self, now_ms: i64) -> Option<PlayerLedger> {
        let rate = self.rules.energy_regen.as_ref()?;
        let staged = regen::settled(&self.state.ledger, rate, now_ms);
        Some(std::mem::replace(&mut self.state.ledger, staged))
    }

    fn plot_ref(&self, plot_id: PlotId) -> Result<&LandPlot, CommandError> {
        self.state
            .plot(plot_id)
            .ok_or(CommandError::UnknownPlot(plot_id))
    }

    fn plot_mut(&mut self, plot_id: PlotId) -> Result<&mut LandPlot, CommandError> {
        self.state
            .plot_mut(plot_id)
            .ok_or(CommandError::UnknownPlot(plot_id))
    }

    fn crop_name(&self, crop_id: &CropId) -> String {
        self.catalog
            .crop(crop_id)
            .map_or_else(|| crop_id.to_string(), |def| def.name.clone())
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    fn plant(
        &mut self,
        plot_id: PlotId,
        crop_id: &CropId,
        now_ms: i64,
    ) -> Result<Applied, CommandError> {
        let energy_cost = self.rules.plant_energy_cost;
        let catalog = Arc::clone(&self.catalog);

        let def = self.plot_ref(plot_id)?.check_plant(crop_id, &catalog)?;
        self.state.ledger.check_debit(def.buy_price)?;
        self.state.ledger.check_energy(energy_cost)?;

        self.plot_mut(plot_id)?.plant(crop_id, &catalog, now_ms)?;
        self.state.ledger.debit(def.buy_price)?;
        self.state.ledger.spend_energy(energy_cost)?;

        Ok(Applied::success(
            AppliedEffects {
                plot_id: Some(plot_id),
                crop_id: Some(def.id.clone()),
                currency_delta: negative(def.buy_price),
                energy_spent: energy_cost,
                ..AppliedEffects::default()
            },
            format!("Planted {}!", def.name),
        ))
    }

    fn harvest(&mut self, plot_id: PlotId, now_ms: i64) -> Result<Applied, CommandError> {
        let increment = self.rules.level_up_increment;
        let catalog = Arc::clone(&self.catalog);

        let def = self.plot_ref(plot_id)?.check_harvest(&catalog, now_ms)?;
        self.state.ledger.check_credit(def.sell_price)?;
        self.state.ledger.preview_experience(def.xp_reward, increment)?;

        self.plot_mut(plot_id)?.harvest(&catalog, now_ms)?;
        self.state.ledger.credit(def.sell_price)?;
        let level_up = self.state.ledger.grant_experience(def.xp_reward, increment)?;

        let mut message = format!("Harvested {}! +{} Gold", def.name, def.sell_price);
        if level_up.levels_gained > 0 {
            message.push_str(&format!(" Level up! Now level {}.", level_up.new_level));
        }

        Ok(Applied::success(
            AppliedEffects {
                plot_id: Some(plot_id),
                crop_id: Some(def.id.clone()),
                currency_delta: positive(def.sell_price),
                experience_gained: def.xp_reward,
                levels_gained: level_up.levels_gained,
                ..AppliedEffects::default()
            },
            message,
        ))
    }

    fn tend(&mut self, plot_id: PlotId, malady: Malady) -> Result<Applied, CommandError> {
        let energy_cost = self.rules.tend_energy_cost;
        let present = self.plot_ref(plot_id)?.has_malady(malady);

        // Tending a healthy plot is a free no-op, which keeps tend idempotent.
        if !present {
            return Ok(Applied {
                effects: AppliedEffects {
                    plot_id: Some(plot_id),
                    ..AppliedEffects::default()
                },
                message: format!("Plot {plot_id} is not {malady}. Nothing to do."),
                severity: Severity::Info,
            });
        }

        self.state.ledger.check_energy(energy_cost)?;

        self.plot_mut(plot_id)?.tend(malady);
        self.state.ledger.spend_energy(energy_cost)?;

        Ok(Applied::success(
            AppliedEffects {
                plot_id: Some(plot_id),
                energy_spent: energy_cost,
                malady: Some(malady),
                ..AppliedEffects::default()
            },
            format!("Tended plot {plot_id}: no longer {malady}."),
        ))
    }

    fn bulldoze(&mut self, plot_id: PlotId) -> Result<Applied, CommandError> {
        self.plot_ref(plot_id)?.check_bulldoze()?;
        let crop_id = self.plot_mut(plot_id)?.bulldoze()?;
        let name = self.crop_name(&crop_id);

        Ok(Applied::success(
            AppliedEffects {
                plot_id: Some(plot_id),
                crop_id: Some(crop_id),
                ..AppliedEffects::default()
            },
            format!("Cleared {name} from plot {plot_id}."),
        ))
    }

    fn upgrade_house(&mut self) -> Result<Applied, CommandError> {
        let catalog = Arc::clone(&self.catalog);
        self.state.ledger.check_upgrade_house(&catalog)?;
        let tier = self.state.ledger.upgrade_house(&catalog)?;

        Ok(Applied::success(
            AppliedEffects {
                currency_delta: negative(tier.cost),
                house_level: Some(tier.level),
                ..AppliedEffects::default()
            },
            format!(
                "Upgraded to {}! Max energy is now {}.",
                tier.label,
                self.state.ledger.max_energy()
            ),
        ))
    }

    fn buy_decoration(&mut self, id: &DecorationId) -> Result<Applied, CommandError> {
        let catalog = Arc::clone(&self.catalog);
        self.state.ledger.check_purchase_decoration(id, &catalog)?;
        let item = self.state.ledger.purchase_decoration(id, &catalog)?;

        Ok(Applied::success(
            AppliedEffects {
                currency_delta: negative(item.price),
                decoration_id: Some(item.id.clone()),
                ..AppliedEffects::default()
            },
            format!("Bought {}!", item.name),
        ))
    }

    fn apply_malady(&mut self, plot_id: PlotId, malady: Malady) -> Result<Applied, CommandError> {
        let newly = self.plot_mut(plot_id)?.afflict(malady)?;
        let message = if newly {
            format!("Plot {plot_id} is now {malady}!")
        } else {
            format!("Plot {plot_id} is still {malady}.")
        };
        Ok(Applied {
            effects: AppliedEffects {
                plot_id: Some(plot_id),
                malady: Some(malady),
                ..AppliedEffects::default()
            },
            message,
            severity: Severity::Info,
        })
    }
}

fn positive(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

fn negative(amount: u64) -> i64 {
    0_i64.saturating_sub(positive(amount))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::RecordingSink;

    type TestProcessor = ActionProcessor<Arc<ManualClock>, RecordingSink>;

    fn processor() -> (TestProcessor, Arc<ManualClock>, RecordingSink) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let sink = RecordingSink::new();
        let rules = GameRules::default();
        let processor = ActionProcessor::new(
            GameState::new_game(&rules),
            Arc::new(Catalog::standard()),
            rules,
            Arc::clone(&clock),
            sink.clone(),
        );
        (processor, clock, sink)
    }

    fn plant(plot: u32, crop: &str) -> Command {
        Command::Plant {
            plot_id: PlotId(plot),
            crop_id: CropId::from(crop),
        }
    }

    #[test]
    fn plant_spends_currency_and_energy() {
        let (mut p, _, sink) = processor();
        let outcome = p.process(&plant(0, "radish"));
        let effects = outcome.effects().unwrap();
        assert_eq!(effects.currency_delta, -10);
        assert_eq!(effects.energy_spent, 5);
        assert_eq!(p.state().ledger.currency(), 90);
        assert_eq!(p.state().ledger.energy(), 95);
        assert_eq!(sink.last().unwrap().message, "Planted White Radish!");
        assert_eq!(sink.last().unwrap().severity, Severity::Success);
    }

    #[test]
    fn unknown_plot_is_rejected() {
        let (mut p, _, sink) = processor();
        let outcome = p.process(&Command::Harvest { plot_id: PlotId(99) });
        assert_eq!(outcome.rejection_reason(), Some(RejectionReason::UnknownPlot));
        assert_eq!(sink.last().unwrap().severity, Severity::Error);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn unknown_crop_is_rejected_before_funds() {
        let (mut p, _, _) = processor();
        let outcome = p.process(&plant(0, "mandrake"));
        assert_eq!(outcome.rejection_reason(), Some(RejectionReason::UnknownCrop));
    }

    #[test]
    fn harvest_grants_experience() {
        let (mut p, clock, sink) = processor();
        p.process(&plant(0, "watermelon"));
        clock.advance_secs(300);
        let outcome = p.process(&Command::Harvest { plot_id: PlotId(0) });
        let effects = outcome.effects().unwrap();
        assert_eq!(effects.currency_delta, 350);
        assert_eq!(effects.experience_gained, 75);
        assert_eq!(effects.levels_gained, 0);
        assert_eq!(p.state().ledger.currency(), 350);
        assert!(sink.last().unwrap().message.starts_with("Harvested Watermelon!"));
    }

    #[test]
    fn plant_without_energy_leaves_everything_unchanged() {
        let clock = Arc::new(ManualClock::new(0));
        let rules = GameRules {
            plant_energy_cost: 200,
            ..GameRules::default()
        };
        let mut p = ActionProcessor::new(
            GameState::new_game(&rules),
            Arc::new(Catalog::standard()),
            rules,
            clock,
            RecordingSink::new(),
        );
        let before = p.state().clone();
        let outcome = p.process(&plant(0, "radish"));
        assert_eq!(
            outcome.rejection_reason(),
            Some(RejectionReason::InsufficientEnergy)
        );
        assert_eq!(p.state(), &before);
    }

    #[test]
    fn tend_clears_malady_once() {
        let (mut p, _, sink) = processor();
        p.process(&plant(1, "corn"));
        assert!(p.afflict(PlotId(1), Malady::Dry).is_success());

        let tend = Command::Tend {
            plot_id: PlotId(1),
            malady: Malady::Dry,
        };
        let first = p.process(&tend);
        assert_eq!(first.effects().unwrap().energy_spent, 2);
        let after_first = p.state().clone();

        let second = p.process(&tend);
        assert!(second.is_success());
        assert_eq!(second.effects().unwrap().energy_spent, 0);
        assert_eq!(p.state(), &after_first);
        assert_eq!(sink.last().unwrap().severity, Severity::Info);
    }

    #[test]
    fn afflict_empty_plot_is_rejected() {
        let (mut p, _, sink) = processor();
        let outcome = p.afflict(PlotId(0), Malady::Buggy);
        assert_eq!(
            outcome.rejection_reason(),
            Some(RejectionReason::PreconditionViolation)
        );
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn bulldoze_clears_without_reward() {
        let (mut p, _, _) = processor();
        p.process(&plant(2, "cabbage"));
        let outcome = p.process(&Command::Bulldoze { plot_id: PlotId(2) });
        assert_eq!(outcome.effects().unwrap().currency_delta, 0);
        assert_eq!(p.state().ledger.currency(), 80);
        assert!(p.state().plot(PlotId(2)).unwrap().occupying_crop_id().is_none());

        let again = p.process(&Command::Bulldoze { plot_id: PlotId(2) });
        assert_eq!(
            again.rejection_reason(),
            Some(RejectionReason::PreconditionViolation)
        );
    }

    #[test]
    fn buy_decoration_twice() {
        let (mut p, _, _) = processor();
        let buy = Command::BuyDecoration {
            decoration_id: DecorationId::from("scarecrow"),
        };
        assert!(p.process(&buy).is_success());
        assert_eq!(
            p.process(&buy).rejection_reason(),
            Some(RejectionReason::AlreadyOwned)
        );
        assert_eq!(p.state().ledger.currency(), 50);
    }

    #[test]
    fn reset_restores_defaults() {
        let (mut p, _, sink) = processor();
        p.process(&plant(0, "radish"));
        p.reset();
        assert_eq!(p.state(), &GameState::new_game(&GameRules::default()));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn regen_settles_lazily_when_enabled() {
        let clock = Arc::new(ManualClock::new(10_000));
        let rules = GameRules {
            energy_regen: Some(regen::EnergyRegen {
                points_per_interval: 1,
                interval_ms: 1_000,
            }),
            ..GameRules::default()
        };
        let mut p = ActionProcessor::new(
            GameState::new_game(&rules),
            Arc::new(Catalog::standard()),
            rules,
            Arc::clone(&clock),
            RecordingSink::new(),
        );
        p.process(&plant(0, "radish"));
        assert_eq!(p.state().ledger.energy(), 95);

        clock.advance_secs(3);
        p.process(&plant(1, "radish"));
        assert_eq!(p.state().ledger.energy(), 93);
    }

    #[test]
    fn rejected_command_leaves_regen_unsettled() {
        let clock = Arc::new(ManualClock::new(10_000));
        let rules = GameRules {
            energy_regen: Some(regen::EnergyRegen {
                points_per_interval: 1,
                interval_ms: 1_000,
            }),
            ..GameRules::default()
        };
        let mut p = ActionProcessor::new(
            GameState::new_game(&rules),
            Arc::new(Catalog::standard()),
            rules,
            Arc::clone(&clock),
            RecordingSink::new(),
        );
        p.process(&plant(0, "radish"));
        let before = p.state().clone();
        assert_eq!(before.ledger.energy(), 95);
        assert_eq!(before.ledger.energy_settled_at_ms(), 10_000);

        clock.advance_secs(3);
        let outcome = p.process(&Command::Harvest { plot_id: PlotId(0) });
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(p.state(), &before);

        // The owed energy is still visible and is credited by the next success.
        assert_eq!(p.view().ledger.energy, 98);
        p.process(&plant(1, "radish"));
        assert_eq!(p.state().ledger.energy(), 93);
        assert_eq!(p.state().ledger.energy_settled_at_ms(), 13_000);
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("not enough gold: x"), "Not enough gold: x");
        assert_eq!(capitalize(""), "");
    }
}
