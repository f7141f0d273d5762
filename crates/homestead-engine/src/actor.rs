//! Single-owner actor around the action processor.
//!
//! The actor task owns the [`ActionProcessor`], the persistence gateway,
//! and the optional hazard injector. Everything else talks to it through
//! a [`FarmHandle`], which sends a [`Request`] over an `mpsc` channel and
//! waits for the reply on a `oneshot`. Requests are handled one at a time,
//! so commands are serialized no matter how many handles exist.
//!
//! The snapshot is saved after every request that can change state and
//! once more when the actor stops.

use homestead_core::clock::Clock;
use homestead_core::notify::NotificationSink;
use homestead_core::persistence::PersistenceGateway;
use homestead_core::processor::ActionProcessor;
use homestead_core::view::FarmView;
use homestead_types::{Command, Outcome};
use homestead_world::MaladyInjector;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::EngineError;

/// Capacity of the request channel.
const REQUEST_BUFFER: usize = 32;

/// A message for the actor.
#[derive(Debug)]
pub enum Request {
    /// Validate and apply a player command.
    Process {
        /// The command.
        command: Command,
        /// Receives the outcome.
        reply: oneshot::Sender<Outcome>,
    },
    /// Roll the hazard injector and apply whatever it proposes.
    RollHazards {
        /// Receives one outcome per applied malady.
        reply: oneshot::Sender<Vec<Outcome>>,
    },
    /// Read-only view of the farm.
    View {
        /// Receives the view.
        reply: oneshot::Sender<FarmView>,
    },
    /// Total reset to a new game; the save is discarded.
    Reset {
        /// Signalled when done.
        reply: oneshot::Sender<()>,
    },
    /// Save and stop.
    Shutdown {
        /// Signalled after the final save.
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle for sending requests to the actor.
#[derive(Debug, Clone)]
pub struct FarmHandle {
    tx: mpsc::Sender<Request>,
}

impl FarmHandle {
    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> Result<T, EngineError> {
        let (reply, response) = oneshot::channel();
        if self.tx.send(make(reply)).await.is_err() {
            return Err(EngineError::ActorGone);
        }
        Ok(response.await?)
    }

    /// Process a player command.
    pub async fn process(&self, command: Command) -> Result<Outcome, EngineError> {
        self.call(|reply| Request::Process { command, reply }).await
    }

    /// Roll for hazards.
    pub async fn roll_hazards(&self) -> Result<Vec<Outcome>, EngineError> {
        self.call(|reply| Request::RollHazards { reply }).await
    }

    /// Current farm view.
    pub async fn view(&self) -> Result<FarmView, EngineError> {
        self.call(|reply| Request::View { reply }).await
    }

    /// Start over and discard the save.
    pub async fn reset(&self) -> Result<(), EngineError> {
        self.call(|reply| Request::Reset { reply }).await
    }

    /// Save and stop the actor.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.call(|reply| Request::Shutdown { reply }).await
    }
}

/// The actor state.
struct FarmActor<C, N, G> {
    processor: ActionProcessor<C, N>,
    gateway: G,
    hazards: Option<MaladyInjector>,
}

/// Start the actor task.
pub fn spawn<C, N, G>(
    processor: ActionProcessor<C, N>,
    gateway: G,
    hazards: Option<MaladyInjector>,
) -> (FarmHandle, JoinHandle<()>)
where
    C: Clock + Send + 'static,
    N: NotificationSink + Send + 'static,
    G: PersistenceGateway + Send + 'static,
{
    let (tx, rx) = mpsc::channel(REQUEST_BUFFER);
    let actor = FarmActor {
        processor,
        gateway,
        hazards,
    };
    let task = tokio::spawn(actor.run(rx));
    (FarmHandle { tx }, task)
}

impl<C, N, G> FarmActor<C, N, G>
where
    C: Clock,
    N: NotificationSink,
    G: PersistenceGateway,
{
    async fn run(mut self, mut rx: mpsc::Receiver<Request>) {
        debug!("Farm actor started");
        while let Some(request) = rx.recv().await {
            match request {
                Request::Process { command, reply } => {
                    let outcome = self.processor.process(&command);
                    self.persist();
                    let _ = reply.send(outcome);
                }
                Request::RollHazards { reply } => {
                    let outcomes = self.roll_hazards();
                    if !outcomes.is_empty() {
                        self.persist();
                    }
                    let _ = reply.send(outcomes);
                }
                Request::View { reply } => {
                    let _ = reply.send(self.processor.view());
                }
                Request::Reset { reply } => {
                    self.processor.reset();
                    if let Err(e) = self.gateway.clear() {
                        warn!(error = %e, "Failed to clear saved farm");
                    }
                    let _ = reply.send(());
                }
                Request::Shutdown { reply } => {
                    self.persist();
                    info!("Farm actor stopped");
                    let _ = reply.send(());
                    return;
                }
            }
        }
        // Every handle was dropped without a shutdown request.
        self.persist();
        info!("Farm actor stopped (channel closed)");
    }

    fn roll_hazards(&mut self) -> Vec<Outcome> {
        let Some(injector) = self.hazards.as_mut() else {
            return Vec::new();
        };
        let proposals = injector.roll(&self.processor.state().plots);
        proposals
            .into_iter()
            .map(|(plot_id, malady)| self.processor.afflict(plot_id, malady))
            .collect()
    }

    fn persist(&self) {
        if let Err(e) = self.gateway.save(&self.processor.snapshot()) {
            warn!(error = %e, "Failed to save farm");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use homestead_core::clock::ManualClock;
    use homestead_core::notify::RecordingSink;
    use homestead_core::persistence::{MemoryGateway, Snapshot};
    use homestead_core::rules::GameRules;
    use homestead_core::state::GameState;
    use homestead_types::{CropId, PlotId, RejectionReason};
    use homestead_world::Catalog;

    use super::*;

    type Parts = (
        FarmHandle,
        JoinHandle<()>,
        Arc<ManualClock>,
        RecordingSink,
        Arc<MemoryGateway>,
    );

    struct SharedGateway(Arc<MemoryGateway>);

    impl PersistenceGateway for SharedGateway {
        type Error = <MemoryGateway as PersistenceGateway>::Error;

        fn load(&self) -> Result<Option<Snapshot>, Self::Error> {
            self.0.load()
        }

        fn save(&self, snapshot: &Snapshot) -> Result<(), Self::Error> {
            self.0.save(snapshot)
        }

        fn clear(&self) -> Result<(), Self::Error> {
            self.0.clear()
        }
    }

    fn start(hazards: Option<MaladyInjector>) -> Parts {
        let rules = GameRules::default();
        let clock = Arc::new(ManualClock::new(0));
        let sink = RecordingSink::new();
        let gateway = Arc::new(MemoryGateway::new());
        let processor = ActionProcessor::new(
            GameState::new_game(&rules),
            Arc::new(Catalog::standard()),
            rules,
            Arc::clone(&clock),
            sink.clone(),
        );
        let (handle, task) = spawn(processor, SharedGateway(Arc::clone(&gateway)), hazards);
        (handle, task, clock, sink, gateway)
    }

    fn plant(plot: u32, crop: &str) -> Command {
        Command::Plant {
            plot_id: PlotId(plot),
            crop_id: CropId::from(crop),
        }
    }

    #[tokio::test]
    async fn commands_are_processed_and_saved() {
        let (handle, task, clock, sink, gateway) = start(None);

        let outcome = handle.process(plant(0, "radish")).await.unwrap();
        assert!(outcome.is_success());
        let saved = gateway.load().unwrap().unwrap();
        assert_eq!(saved.ledger.currency(), 90);

        clock.advance_secs(30);
        let view = handle.view().await.unwrap();
        assert_eq!(view.ready_count(), 1);

        handle
            .process(Command::Harvest { plot_id: PlotId(0) })
            .await
            .unwrap();
        assert_eq!(gateway.load().unwrap().unwrap().ledger.currency(), 115);
        assert_eq!(sink.len(), 2);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
        assert!(matches!(
            handle.view().await,
            Err(EngineError::ActorGone)
        ));
    }

    #[tokio::test]
    async fn rejected_commands_are_reported() {
        let (handle, _task, _clock, sink, _gateway) = start(None);
        let outcome = handle.process(plant(0, "watermelon")).await.unwrap();
        assert!(outcome.is_success());
        let outcome = handle.process(plant(1, "watermelon")).await.unwrap();
        assert_eq!(
            outcome.rejection_reason(),
            Some(RejectionReason::InsufficientFunds)
        );
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn reset_clears_the_save() {
        let (handle, task, _clock, _sink, gateway) = start(None);
        handle.process(plant(0, "radish")).await.unwrap();
        assert!(gateway.load().unwrap().is_some());

        handle.reset().await.unwrap();
        assert!(gateway.load().unwrap().is_none());
        let view = handle.view().await.unwrap();
        assert!(view.plots.iter().all(|p| p.crop_id.is_none()));

        // The next save is the fresh game.
        handle.shutdown().await.unwrap();
        task.await.unwrap();
        let saved = gateway.load().unwrap().unwrap();
        assert_eq!(saved, GameState::new_game(&GameRules::default()).to_snapshot());
    }

    #[tokio::test]
    async fn certain_hazards_hit_every_growing_plot() {
        let injector = MaladyInjector::new(7, homestead_world::hazard::BASIS_POINTS);
        let (handle, _task, _clock, sink, _gateway) = start(Some(injector));
        handle.process(plant(0, "radish")).await.unwrap();
        handle.process(plant(3, "radish")).await.unwrap();

        let outcomes = handle.roll_hazards().await.unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(Outcome::is_success));
        assert_eq!(sink.len(), 4);

        let view = handle.view().await.unwrap();
        assert_eq!(view.plots.first().unwrap().maladies.len(), 1);
        assert!(view.plots.get(1).unwrap().maladies.is_empty());
    }

    #[tokio::test]
    async fn no_injector_means_no_hazards() {
        let (handle, _task, _clock, sink, _gateway) = start(None);
        handle.process(plant(0, "radish")).await.unwrap();
        assert!(handle.roll_hazards().await.unwrap().is_empty());
        assert_eq!(sink.len(), 1);
    }
}
