//! Interactive terminal binary for the Homestead farming simulation.
//!
//! Reads commands line by line from stdin, runs them through the farm
//! actor, and prints one notification per command. Crops grow in real
//! time whether or not the program is running.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `homestead-config.yaml` (or the path given
//!    as the first argument)
//! 2. Initialize structured logging (tracing, to stderr)
//! 3. Build the catalog and game rules
//! 4. Bootstrap the farm from the save file (a missing or damaged save
//!    starts a new game)
//! 5. Spawn the farm actor
//! 6. Run the input loop with the advisory refresh and hazard timers
//! 7. Save and shut down

mod actor;
mod display;
mod error;
mod parse;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use homestead_core::clock::SystemClock;
use homestead_core::config::{GameConfig, LoggingConfig};
use homestead_core::processor::ActionProcessor;
use homestead_core::state::GameState;
use homestead_store::JsonFileStore;
use homestead_world::MaladyInjector;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::actor::FarmHandle;
use crate::display::ConsoleSink;
use crate::error::EngineError;
use crate::parse::{HELP, Input};

/// Default configuration file name, relative to the working directory.
const CONFIG_FILE: &str = "homestead-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or stdin fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let config = GameConfig::load_or_default(&config_path).map_err(EngineError::from)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        config = %config_path.display(),
        save_path = %config.persistence.save_path.display(),
        plots = config.farm.plot_count,
        hazards = config.hazards.enabled,
        energy_regen = config.energy_regen.enabled,
        "homestead-engine starting"
    );

    // 3. Catalog and rules.
    let catalog = Arc::new(config.catalog().map_err(EngineError::from)?);
    let rules = config.rules();
    info!(
        crops = catalog.crops().len(),
        upgrade_tiers = catalog.upgrades().len(),
        decorations = catalog.decorations().len(),
        "Catalog loaded"
    );

    // 4. Bootstrap from the save file.
    let store = JsonFileStore::new(config.persistence.save_path.clone());
    let state = GameState::bootstrap(&store, &rules, &catalog);

    // 5. Spawn the farm actor.
    let processor = ActionProcessor::new(
        state,
        Arc::clone(&catalog),
        rules,
        SystemClock,
        ConsoleSink,
    );
    let hazards = config
        .hazards
        .enabled
        .then(|| MaladyInjector::new(config.hazards.seed, config.hazards.chance_bp));
    let (farm, task) = actor::spawn(processor, store, hazards);

    // 6. Input loop.
    println!("Welcome to your homestead! Type 'help' for commands.");
    print_status(&farm).await?;
    run_session(&farm, &config).await?;

    // 7. Shut down.
    farm.shutdown().await?;
    if let Err(e) = task.await {
        warn!(error = %e, "Farm actor task ended abnormally");
    }
    info!("homestead-engine shutdown complete");
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` overrides the configured
/// level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Read commands until `quit`, end of input, or Ctrl-C.
async fn run_session(farm: &FarmHandle, config: &GameConfig) -> Result<(), EngineError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let refresh_secs = config.display.refresh_interval_secs;
    let mut refresh = tokio::time::interval(Duration::from_secs(refresh_secs.max(1)));
    let hazard_secs = config.hazards.interval_secs;
    let mut hazard_timer = tokio::time::interval(Duration::from_secs(hazard_secs.max(1)));
    // Both intervals fire immediately once; skip that.
    refresh.tick().await;
    hazard_timer.tick().await;

    let mut last_hint: Option<String> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("End of input");
                    return Ok(());
                };
                if !handle_line(farm, &line).await? {
                    return Ok(());
                }
            }
            // Advisory only: reads a view, never mutates.
            _ = refresh.tick(), if refresh_secs > 0 => {
                let hint = display::render_ready_hint(&farm.view().await?);
                if hint != last_hint {
                    if let Some(text) = &hint {
                        println!("{text}");
                    }
                    last_hint = hint;
                }
            }
            _ = hazard_timer.tick(), if config.hazards.enabled => {
                let outcomes = farm.roll_hazards().await?;
                if !outcomes.is_empty() {
                    info!(count = outcomes.len(), "Hazards applied");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                return Ok(());
            }
        }
    }
}

/// Handle one input line. Returns `false` when the session should end.
async fn handle_line(farm: &FarmHandle, line: &str) -> Result<bool, EngineError> {
    match parse::parse_line(line) {
        Ok(None) => {}
        Ok(Some(Input::Command(command))) => {
            // The outcome is already reported through the notification sink.
            farm.process(command).await?;
        }
        Ok(Some(Input::Status)) => print_status(farm).await?,
        Ok(Some(Input::Reset)) => farm.reset().await?,
        Ok(Some(Input::Help)) => println!("{HELP}"),
        Ok(Some(Input::Quit)) => return Ok(false),
        Err(e) => println!("[error] {e}"),
    }
    Ok(true)
}

async fn print_status(farm: &FarmHandle) -> Result<(), EngineError> {
    println!("{}", display::render_farm(&farm.view().await?));
    Ok(())
}
