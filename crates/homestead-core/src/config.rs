//! Configuration loading and typed config structures.
//!
//! The configuration lives in `homestead-config.yaml` at the project root.
//! Every section and field has a default, so an empty or missing file gives
//! the standard game. `HOMESTEAD_SAVE_PATH` overrides the save path.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use homestead_ledger::LedgerDefaults;
use homestead_types::{CropDefinition, DecorationItem, UpgradeTier};
use homestead_world::{Catalog, CatalogError};

use crate::clock::MS_PER_SECOND;
use crate::regen::EnergyRegen;
use crate::rules::GameRules;

/// Environment variable overriding `persistence.save_path`.
pub const SAVE_PATH_ENV: &str = "HOMESTEAD_SAVE_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The catalog override is invalid.
    #[error("invalid catalog: {source}")]
    Catalog {
        /// The underlying validation error.
        #[from]
        source: CatalogError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `homestead-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Farm layout.
    #[serde(default)]
    pub farm: FarmConfig,

    /// Starting values and action costs.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Optional lazy energy regeneration.
    #[serde(default)]
    pub energy_regen: EnergyRegenConfig,

    /// Random malady injection.
    #[serde(default)]
    pub hazards: HazardConfig,

    /// Save file location.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Display refresh settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Catalog override. The standard catalog is used when absent.
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse_without_env(&contents)?;
        config.persistence.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file) for a file that exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = Self::default();
        config.persistence.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.persistence.apply_env_overrides();
        Ok(config)
    }

    fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Build the catalog: the override if present, otherwise the standard
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Catalog`] if the override fails validation.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog {
            None => Ok(Catalog::standard()),
            Some(over) => Ok(Catalog::new(
                over.crops.clone(),
                over.upgrades.clone(),
                over.decorations.clone(),
            )?),
        }
    }

    /// The policy constants for the action processor.
    pub fn rules(&self) -> GameRules {
        GameRules {
            ledger: self.economy.ledger_defaults(),
            plot_count: self.farm.plot_count,
            plant_energy_cost: self.economy.plant_energy_cost,
            tend_energy_cost: self.economy.tend_energy_cost,
            level_up_increment: self.economy.level_up_increment,
            energy_regen: self.energy_regen.regen(),
        }
    }
}

/// Farm layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FarmConfig {
    /// Number of plots on a new farm.
    #[serde(default = "default_plot_count")]
    pub plot_count: u32,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            plot_count: default_plot_count(),
        }
    }
}

/// Economy parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EconomyConfig {
    /// Currency on first run.
    #[serde(default = "default_starting_currency")]
    pub starting_currency: u64,

    /// Energy on first run.
    #[serde(default = "default_energy")]
    pub starting_energy: u32,

    /// Initial energy cap.
    #[serde(default = "default_energy")]
    pub max_energy: u32,

    /// Experience needed for level 2.
    #[serde(default = "default_experience_to_next_level")]
    pub experience_to_next_level: u64,

    /// Growth of the experience threshold per level.
    #[serde(default = "default_level_up_increment")]
    pub level_up_increment: u64,

    /// Energy spent per plant.
    #[serde(default = "default_plant_energy_cost")]
    pub plant_energy_cost: u32,

    /// Energy spent per tend that clears a malady.
    #[serde(default = "default_tend_energy_cost")]
    pub tend_energy_cost: u32,
}

impl EconomyConfig {
    /// Starting ledger values.
    pub const fn ledger_defaults(&self) -> LedgerDefaults {
        LedgerDefaults {
            starting_currency: self.starting_currency,
            starting_energy: self.starting_energy,
            max_energy: self.max_energy,
            experience_to_next_level: self.experience_to_next_level,
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_currency: default_starting_currency(),
            starting_energy: default_energy(),
            max_energy: default_energy(),
            experience_to_next_level: default_experience_to_next_level(),
            level_up_increment: default_level_up_increment(),
            plant_energy_cost: default_plant_energy_cost(),
            tend_energy_cost: default_tend_energy_cost(),
        }
    }
}

/// Energy regeneration settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnergyRegenConfig {
    /// Whether energy regenerates over time at all.
    #[serde(default)]
    pub enabled: bool,

    /// Energy restored per interval.
    #[serde(default = "default_regen_points")]
    pub points_per_interval: u32,

    /// Interval length in seconds.
    #[serde(default = "default_regen_interval_secs")]
    pub interval_secs: u64,
}

impl EnergyRegenConfig {
    /// The regeneration rate, or `None` when disabled or degenerate.
    pub fn regen(&self) -> Option<EnergyRegen> {
        if !self.enabled || self.points_per_interval == 0 || self.interval_secs == 0 {
            return None;
        }
        let interval_ms = i64::try_from(self.interval_secs)
            .ok()?
            .checked_mul(MS_PER_SECOND)?;
        Some(EnergyRegen {
            points_per_interval: self.points_per_interval,
            interval_ms,
        })
    }
}

impl Default for EnergyRegenConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            points_per_interval: default_regen_points(),
            interval_secs: default_regen_interval_secs(),
        }
    }
}

/// Random malady injection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HazardConfig {
    /// Whether hazards are rolled at all.
    #[serde(default)]
    pub enabled: bool,

    /// RNG seed for reproducible runs.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Chance per growing plot per roll, in basis points (1/100 of a
    /// percent).
    #[serde(default = "default_hazard_chance_bp")]
    pub chance_bp: u32,

    /// Seconds between rolls.
    #[serde(default = "default_hazard_interval_secs")]
    pub interval_secs: u64,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            seed: default_seed(),
            chance_bp: default_hazard_chance_bp(),
            interval_secs: default_hazard_interval_secs(),
        }
    }
}

/// Save file location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Path of the JSON save file.
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,
}

impl PersistenceConfig {
    /// Apply environment variable overrides.
    ///
    /// - `HOMESTEAD_SAVE_PATH` overrides `save_path`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SAVE_PATH_ENV)
            && !val.is_empty()
        {
            self.save_path = PathBuf::from(val);
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
        }
    }
}

/// Display refresh settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Seconds between advisory progress redraws; 0 disables them.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Catalog override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Crop definitions, in display order.
    pub crops: Vec<CropDefinition>,
    /// Farmhouse tiers, starting at level 1.
    pub upgrades: Vec<UpgradeTier>,
    /// Decorations for sale.
    #[serde(default)]
    pub decorations: Vec<DecorationItem>,
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_plot_count() -> u32 {
    6
}

const fn default_starting_currency() -> u64 {
    100
}

const fn default_energy() -> u32 {
    100
}

const fn default_experience_to_next_level() -> u64 {
    100
}

const fn default_level_up_increment() -> u64 {
    25
}

const fn default_plant_energy_cost() -> u32 {
    5
}

const fn default_tend_energy_cost() -> u32 {
    2
}

const fn default_regen_points() -> u32 {
    1
}

const fn default_regen_interval_secs() -> u64 {
    60
}

const fn default_seed() -> u64 {
    42
}

const fn default_hazard_chance_bp() -> u32 {
    500
}

const fn default_hazard_interval_secs() -> u64 {
    30
}

fn default_save_path() -> PathBuf {
    PathBuf::from("homestead-save.json")
}

const fn default_refresh_interval_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_rules_default() {
        let config = GameConfig::default();
        assert_eq!(config.rules(), GameRules::default());
        assert!(config.catalog.is_none());
        assert!(!config.hazards.enabled);
        assert_eq!(config.display.refresh_interval_secs, 5);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
farm:
  plot_count: 9

economy:
  starting_currency: 250
  starting_energy: 80
  max_energy: 120
  experience_to_next_level: 50
  level_up_increment: 10
  plant_energy_cost: 4
  tend_energy_cost: 1

energy_regen:
  enabled: true
  points_per_interval: 3
  interval_secs: 30

hazards:
  enabled: true
  seed: 7
  chance_bp: 1000
  interval_secs: 15

persistence:
  save_path: "/tmp/farm.json"

display:
  refresh_interval_secs: 2

logging:
  level: "debug"
  json: true

catalog:
  crops:
    - id: turnip
      name: Turnip
      growth_duration_seconds: 10
      buy_price: 2
      sell_price: 5
      xp_reward: 1
  upgrades:
    - level: 1
      cost: 0
      energy_bonus: 0
      label: Shack
"#;
        let config = GameConfig::parse_without_env(yaml).unwrap();
        let rules = config.rules();
        assert_eq!(rules.plot_count, 9);
        assert_eq!(rules.ledger.starting_currency, 250);
        assert_eq!(rules.ledger.max_energy, 120);
        assert_eq!(rules.level_up_increment, 10);
        assert_eq!(
            rules.energy_regen,
            Some(EnergyRegen {
                points_per_interval: 3,
                interval_ms: 30_000,
            })
        );
        assert_eq!(config.hazards.chance_bp, 1000);
        assert_eq!(config.persistence.save_path, PathBuf::from("/tmp/farm.json"));
        assert!(config.logging.json);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.crops().len(), 1);
        assert!(catalog.decorations().is_empty());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = GameConfig::parse_without_env("economy:\n  starting_currency: 5\n").unwrap();
        assert_eq!(config.economy.starting_currency, 5);
        assert_eq!(config.economy.plant_energy_cost, 5);
        assert_eq!(config.farm.plot_count, 6);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(GameConfig::parse_without_env("").is_ok());
    }

    #[test]
    fn invalid_catalog_override_is_an_error() {
        let yaml = "catalog:\n  crops: []\n  upgrades: []\n";
        let config = GameConfig::parse_without_env(yaml).unwrap();
        assert!(matches!(config.catalog(), Err(ConfigError::Catalog { .. })));
    }

    #[test]
    fn disabled_regen_yields_none() {
        assert!(EnergyRegenConfig::default().regen().is_none());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("homestead-config.yaml");
        if path.exists() {
            let config = GameConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
