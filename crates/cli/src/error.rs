//! Error types for CLI operations.

use contracts::ContractError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Command-line override produced an invalid engine configuration
    #[error("Invalid override")]
    InvalidOverride(#[source] ContractError),

    /// Estimation loop failed
    #[error("Engine run failed")]
    Engine(#[source] ContractError),

    /// Worker thread panicked or was cancelled
    #[error("Engine worker terminated abnormally: {message}")]
    Worker { message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }
}
