//! Error type for the headless runner.

use moba_core::error::GameError;
use thiserror::Error;

use crate::scenario::ScenarioError;

/// Anything that can stop a headless command.
#[derive(Error, Debug)]
pub enum HeadlessError {
    /// Scenario could not be loaded or bound.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    /// Draft or match failed.
    #[error("Simulation failed: {0}")]
    Game(#[from] GameError),
    /// Output file could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// RON output failed.
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),
}

/// Result alias for headless commands.
pub type Result<T> = std::result::Result<T, HeadlessError>;
