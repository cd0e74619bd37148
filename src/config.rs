use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::baseline::BaselineInputs;
use crate::constants::intervention::LOW_INTAKE_WARNING;
use crate::error::BwsError;
use crate::export::{EnergyUnit, Units};
use crate::goal::GoalRequest;
use crate::intervention::Intervention;
use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Default subject profile
    #[serde(default)]
    pub profile: BaselineInputs,

    /// Simulation run settings
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Goal search defaults
    #[serde(default)]
    pub goal: GoalSettings,

    /// Output units
    #[serde(default)]
    pub display: DisplaySettings,

    /// Logging setup
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Simulation run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Days to simulate
    pub sim_length: usize,

    /// Spread of the uncertainty bands, as a percentage of maintenance
    pub uncertainty_percent: f64,
}

/// Goal search defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalSettings {
    /// Horizon when none is given (days)
    pub goal_days: u32,

    /// Lowest intake the search may propose (kcal/day)
    pub min_calories: f64,

    /// Accepted distance from the goal weight (kg)
    pub tolerance: f64,
}

/// Output units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub units: Units,
    pub energy_unit: EnergyUnit,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            profile: BaselineInputs::default(),
            simulation: SimulationSettings::default(),
            goal: GoalSettings::default(),
            display: DisplaySettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            sim_length: 360,
            uncertainty_percent: 10.0,
        }
    }
}

impl Default for GoalSettings {
    fn default() -> Self {
        GoalSettings {
            goal_days: 180,
            min_calories: LOW_INTAKE_WARNING,
            tolerance: 0.01,
        }
    }
}

impl GoalSettings {
    /// Goal request for `goal_weight` using these defaults
    pub fn request(&self, goal_weight: f64, goal_days: Option<u32>) -> GoalRequest {
        GoalRequest::new(goal_weight, goal_days.unwrap_or(self.goal_days))
            .with_min_calories(self.min_calories)
            .with_tolerance(self.tolerance)
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bwsim")
            .join("config.toml")
    }

    /// Load the configuration for a run
    ///
    /// An explicit path must exist and parse. Without one, the default path is
    /// read when present and the defaults are used otherwise.
    pub fn load_or_default(path: Option<&Path>) -> crate::Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = Self::default_config_path();
                if !default_path.exists() {
                    tracing::debug!(path = %default_path.display(), "Using default configuration");
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let config = Self::load_from_file(&config_path)
            .map_err(|err| BwsError::Configuration(format!("{:#}", err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run can use
    pub fn validate(&self) -> crate::Result<()> {
        let uncertainty = self.simulation.uncertainty_percent;
        if !(0.0..=100.0).contains(&uncertainty) {
            return Err(BwsError::Validation(format!(
                "uncertainty_percent must be between 0 and 100, got {}",
                uncertainty
            )));
        }
        if !self.goal.tolerance.is_finite() || self.goal.tolerance <= 0.0 {
            return Err(BwsError::Validation(format!(
                "goal tolerance must be positive, got {}",
                self.goal.tolerance
            )));
        }
        if !self.goal.min_calories.is_finite() || self.goal.min_calories < 0.0 {
            return Err(BwsError::Validation(format!(
                "goal min_calories must be non-negative, got {}",
                self.goal.min_calories
            )));
        }
        Ok(())
    }
}

/// A schedule of phases stored in TOML, with an optional profile override
///
/// ```toml
/// [profile]
/// sex = "female"
/// weight = 82.0
///
/// [[phases]]
/// day = 0
/// calories = 1900.0
///
/// [[phases]]
/// day = 120
/// calories = 2300.0
/// ramp = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFile {
    pub profile: Option<BaselineInputs>,
    pub phases: Vec<Intervention>,
}

impl ScenarioFile {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).with_context(|| {
            format!("Failed to read scenario file: {}", path.as_ref().display())
        })?;

        toml::from_str(&content).with_context(|| {
            format!("Failed to parse scenario file: {}", path.as_ref().display())
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize scenario to TOML")?;
        fs::write(&path, content).with_context(|| {
            format!("Failed to write scenario file: {}", path.as_ref().display())
        })
    }
}
