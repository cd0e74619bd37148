//! Unified error hierarchy for bwsim
//!
//! Module-level errors roll up into [`BwsError`], which carries a severity
//! for logging and a message suitable for showing to the user.

use thiserror::Error;

use crate::export::ExportError;
use crate::goal::{GoalError, UnachievableReason};

/// Top-level error type for all bwsim operations
#[derive(Debug, Error)]
pub enum BwsError {
    /// Goal search failures
    #[error("Goal error: {0}")]
    Goal(#[from] GoalError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Rejected input values
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bwsim operations
pub type Result<T> = std::result::Result<T, BwsError>;

impl BwsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BwsError::Goal(GoalError::Unachievable { .. }) => ErrorSeverity::Warning,
            BwsError::Goal(GoalError::InvalidRequest(_)) => ErrorSeverity::Warning,
            BwsError::Validation(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            BwsError::Goal(GoalError::Unachievable {
                reason: UnachievableReason::StarvationInfeasible,
                goal_weight,
                goal_days,
            }) => {
                format!(
                    "Reaching {:.1} kg in {} days would need less food than the minimum intake allows. Try a longer time frame or a higher goal weight.",
                    goal_weight, goal_days
                )
            }
            BwsError::Goal(GoalError::Unachievable {
                goal_weight,
                goal_days,
                ..
            }) => {
                format!(
                    "Could not find a stable daily intake that reaches {:.1} kg in {} days.",
                    goal_weight, goal_days
                )
            }
            BwsError::Export(ExportError::Io(err)) => {
                format!("Could not write the export file: {}", err)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Rejected request that the user can correct
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
