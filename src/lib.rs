// Library interface for bwsim modules
// This allows integration tests and benches to access the core functionality

pub mod baseline;
pub mod body_model;
pub mod config;
pub mod constants;
pub mod daily_params;
pub mod error;
pub mod export;
pub mod goal;
pub mod intervention;
pub mod logging;
pub mod reference;
pub mod simulation;
pub mod trajectory;

// Re-export commonly used types for convenience
pub use baseline::{Baseline, BaselineInputs, BodyComposition, HealthyWeightRange, Sex};
pub use body_model::{BodyChange, BodyState};
pub use config::{AppConfig, ScenarioFile};
pub use daily_params::DailyParams;
pub use error::{BwsError, ErrorSeverity, Result};
pub use export::{EnergyUnit, ExportFormat, ExportOptions, Units};
pub use goal::{GoalError, GoalPlan, GoalRequest, GoalSearch, UnachievableReason};
pub use intervention::Intervention;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use simulation::{Scenario, SimulationBands, SimulationRow};
pub use trajectory::build_trajectory;
