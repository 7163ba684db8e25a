//! Configuration loading and typed config structures for the Hominids
//! simulation.
//!
//! Configuration is read from a YAML file whose sections mirror the structs
//! below. Every section and every field has a default, so an empty document
//! is a valid configuration: a one-year run on the `voi` landscape with five
//! agents of each species.

use std::path::Path;

use hominids_agents::{AgentError, Capabilities, ForagingConfig};
use hominids_types::HominidSpecies;
use hominids_world::{CarcassConfig, WorldError};
use serde::Deserialize;
use tracing::warn;

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV_VAR: &str = "HOMINIDS_SEED";

/// Errors that can occur when loading or validating configuration.
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

    /// A field holds a value outside its permitted range.
    #[error("invalid config field {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Explanation of what is wrong.
        reason: String,
    },

    /// A species' capability string could not be parsed.
    #[error("invalid capabilities for {species}: {source}")]
    Capabilities {
        /// The species whose capability string is malformed.
        species: HominidSpecies,
        /// The underlying parse error.
        source: AgentError,
    },

    /// The foraging section failed validation.
    #[error("invalid foraging config: {source}")]
    Foraging {
        /// The underlying agent configuration error.
        #[from]
        source: AgentError,
    },

    /// The carcass section failed validation.
    #[error("invalid carcass config: {source}")]
    Carcasses {
        /// The underlying world configuration error.
        #[from]
        source: WorldError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, landscape, duration, grid size).
    #[serde(default)]
    pub world: WorldConfig,

    /// Day length and season calendar.
    #[serde(default)]
    pub time: TimeConfig,

    /// Agent counts and capabilities per species.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Plant resource field parameters.
    #[serde(default)]
    pub plants: PlantConfig,

    /// Carcass appearance, sizes, and expiry.
    #[serde(default)]
    pub carcasses: CarcassConfig,

    /// Forager behaviour and species traits.
    #[serde(default)]
    pub foraging: ForagingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `HOMINIDS_SEED` overrides `world.seed` when set to a valid integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.world.apply_env_overrides();
        Ok(config)
    }

    /// Check every section for values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.population.validate()?;
        self.plants.validate()?;
        self.carcasses.validate()?;
        self.foraging.validate()?;
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Named landscape selecting the plant catalog (`voi` or `turkana`).
    #[serde(default = "default_landscape")]
    pub landscape: String,

    /// Number of years to simulate.
    #[serde(default = "default_years")]
    pub years: u32,

    /// Grid width in cells.
    #[serde(default = "default_width")]
    pub width: i32,

    /// Grid height in cells.
    #[serde(default = "default_height")]
    pub height: i32,
}

impl WorldConfig {
    /// Replace the seed with `HOMINIDS_SEED` when it is set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SEED_ENV_VAR) {
            match val.trim().parse::<u64>() {
                Ok(seed) => self.seed = seed,
                Err(err) => warn!(value = %val, error = %err, "Ignoring malformed HOMINIDS_SEED"),
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::Invalid {
                field: "world.width",
                reason: format!(
                    "grid must have positive area (got {}x{})",
                    self.width, self.height
                ),
            });
        }
        if self.years == 0 {
            return Err(ConfigError::Invalid {
                field: "world.years",
                reason: "must simulate at least one year".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            landscape: default_landscape(),
            years: default_years(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Day length and season calendar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// Active minutes per day; one tick per minute.
    #[serde(default = "default_minutes_per_day")]
    pub minutes_per_day: u32,

    /// Days per simulated year.
    #[serde(default = "default_days_per_year")]
    pub days_per_year: u32,

    /// Cumulative day-of-year at which each of the four seasons ends.
    #[serde(default = "default_season_end_days")]
    pub season_end_days: [u32; 4],
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            minutes_per_day: default_minutes_per_day(),
            days_per_year: default_days_per_year(),
            season_end_days: default_season_end_days(),
        }
    }
}

/// Count and capability string for one species.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpeciesPopulation {
    /// Number of agents created at the start of the run.
    #[serde(default = "default_species_count")]
    pub count: u32,

    /// Capability string (`i`/`g`, `d`, `m`, `c`).
    #[serde(default = "default_capabilities")]
    pub capabilities: String,
}

impl SpeciesPopulation {
    /// Parse the capability string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Capabilities`] naming the species when the
    /// string is malformed.
    pub fn parsed_capabilities(&self, species: HominidSpecies) -> Result<Capabilities, ConfigError> {
        Capabilities::parse(&self.capabilities)
            .map_err(|source| ConfigError::Capabilities { species, source })
    }
}

impl Default for SpeciesPopulation {
    fn default() -> Self {
        Self {
            count: default_species_count(),
            capabilities: default_capabilities(),
        }
    }
}

/// Agent population per species.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Paranthropus boisei agents.
    #[serde(default)]
    pub boisei: SpeciesPopulation,

    /// Homo ergaster agents.
    #[serde(default = "default_ergaster_population")]
    pub ergaster: SpeciesPopulation,
}

impl PopulationConfig {
    /// Population entry for a species.
    pub const fn species(&self, species: HominidSpecies) -> &SpeciesPopulation {
        match species {
            HominidSpecies::Boisei => &self.boisei,
            HominidSpecies::Ergaster => &self.ergaster,
        }
    }

    /// Total number of agents across both species.
    pub const fn total(&self) -> u32 {
        self.boisei.count.saturating_add(self.ergaster.count)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.total() == 0 {
            return Err(ConfigError::Invalid {
                field: "population",
                reason: "at least one agent is required".to_owned(),
            });
        }
        for species in HominidSpecies::ALL {
            self.species(species).parsed_capabilities(species)?;
        }
        Ok(())
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            boisei: SpeciesPopulation::default(),
            ergaster: default_ergaster_population(),
        }
    }
}

/// Plant resource field parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlantConfig {
    /// Fraction of capacity each entry starts the run with.
    #[serde(default = "default_plant_fraction")]
    pub initial_fraction: f64,

    /// Fraction of capacity an exhausted fruiting species regrows from.
    #[serde(default = "default_plant_fraction")]
    pub reseed_fraction: f64,
}

impl PlantConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("plants.initial_fraction", self.initial_fraction),
            ("plants.reseed_fraction", self.reseed_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be within [0, 1] (got {value})"),
                });
            }
        }
        Ok(())
    }
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            initial_fraction: default_plant_fraction(),
            reseed_fraction: default_plant_fraction(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Hominids".to_owned()
}

const fn default_seed() -> u64 {
    42
}

fn default_landscape() -> String {
    "voi".to_owned()
}

const fn default_years() -> u32 {
    1
}

const fn default_width() -> i32 {
    81
}

const fn default_height() -> i32 {
    101
}

const fn default_minutes_per_day() -> u32 {
    720
}

const fn default_days_per_year() -> u32 {
    365
}

const fn default_season_end_days() -> [u32; 4] {
    [90, 273, 334, 365]
}

const fn default_species_count() -> u32 {
    5
}

fn default_capabilities() -> String {
    "idm".to_owned()
}

fn default_ergaster_population() -> SpeciesPopulation {
    SpeciesPopulation {
        count: default_species_count(),
        capabilities: "gdmc".to_owned(),
    }
}

const fn default_plant_fraction() -> f64 {
    0.01
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hominids_world::ExpiryPolicy;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.landscape, "voi");
        assert_eq!(config.world.width, 81);
        assert_eq!(config.time.minutes_per_day, 720);
        assert_eq!(config.time.season_end_days, [90, 273, 334, 365]);
        assert_eq!(config.population.total(), 10);
        assert_eq!(config.population.ergaster.capabilities, "gdmc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  name: Test Run
  seed: 7
  landscape: turkana
  years: 2
  width: 20
  height: 30

time:
  minutes_per_day: 60
  days_per_year: 12
  season_end_days: [3, 6, 9, 12]

population:
  boisei:
    count: 3
    capabilities: id
  ergaster:
    count: 0
    capabilities: gmc

plants:
  initial_fraction: 0.5
  reseed_fraction: 0.02

carcasses:
  expiry: day_rollover

foraging:
  earshot_distance: 12

logging:
  level: debug
  format: json
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Test Run");
        assert_eq!(config.world.landscape, "turkana");
        assert_eq!(config.world.years, 2);
        assert_eq!(config.time.days_per_year, 12);
        assert_eq!(config.population.boisei.count, 3);
        assert_eq!(config.population.ergaster.count, 0);
        assert!((config.plants.initial_fraction - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.carcasses.expiry, ExpiryPolicy::DayRollover);
        assert_eq!(config.foraging.earshot_distance, 12);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_yaml_uses_defaults() {
        let config = SimulationConfig::parse("world:\n  years: 3\n").unwrap();
        assert_eq!(config.world.years, 3);
        assert_eq!(config.world.height, 101);
        assert_eq!(config.population.boisei.capabilities, "idm");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_yaml_returns_error() {
        let result = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn rejects_empty_population() {
        let mut config = SimulationConfig::default();
        config.population.boisei.count = 0;
        config.population.ergaster.count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "population", .. })
        ));
    }

    #[test]
    fn rejects_zero_area() {
        let mut config = SimulationConfig::default();
        config.world.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_malformed_capabilities() {
        let mut config = SimulationConfig::default();
        config.population.ergaster.capabilities = "igx".to_owned();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Capabilities {
                species: HominidSpecies::Ergaster,
                ..
            })
        ));
    }

    #[test]
    fn rejects_out_of_range_fraction() {
        let mut config = SimulationConfig::default();
        config.plants.reseed_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let yaml = include_str!("../../../hominids-config.yaml");
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SimulationConfig::from_file(Path::new("/nonexistent/hominids.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
