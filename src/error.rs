//! Error types for bandit-engine
//!
//! Every variant carries enough context to act on without a debugger.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// bandit-engine error types
#[derive(Error, Debug)]
pub enum Error {
    /// Arm statistics violate `rewards <= turns`
    #[error("Invalid arm stats for '{arm_id}': rewards ({rewards}) exceed turns ({turns})")]
    InvalidArmStats {
        /// Offending arm
        arm_id: String,
        /// Recorded trial count
        turns: u64,
        /// Recorded success count
        rewards: u64,
    },

    /// Distribution parameter, policy constant or identifier out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Random number source failed; scoring cannot proceed without randomness
    #[error("Entropy source failed: {0}\nScoring aborted; retry policy belongs to the caller")]
    Entropy(String),

    /// Counter store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Experiment has neither counters nor a registry record
    #[error("Experiment \"{0}\" not found.")]
    ExperimentNotFound(String),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<rand::Error> for Error {
    fn from(err: rand::Error) -> Self {
        Self::Entropy(err.to_string())
    }
}
