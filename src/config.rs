//! Coordinator configuration
//!
//! Plain serde struct so it can live in any JSON settings document:
//!
//! ```json
//! {
//!   "policy": { "ucb1": { "alpha": 1.5 } },
//!   "debug_mode": true,
//!   "default_time_window_secs": 86400
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::scorer::ScoringPolicy;
use crate::{Error, Result};

/// Settings for an `ExperimentCoordinator`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Scoring policy (Thompson Sampling unless configured otherwise)
    pub policy: ScoringPolicy,
    /// Emit score events at `info` instead of `debug`
    pub debug_mode: bool,
    /// Recency window applied when a call passes no window of its own
    pub default_time_window_secs: Option<u64>,
}

impl CoordinatorConfig {
    /// Create a builder starting from defaults.
    #[must_use]
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::default()
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// - `Error::Config` for malformed JSON
    /// - `Error::InvalidArgument` for invalid policy constants
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`CoordinatorConfig::from_json_str`].
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check policy constants and window.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` for an invalid policy or a zero
    /// default window (use `None` to disable windowing).
    pub fn validate(&self) -> Result<()> {
        self.policy.validate()?;
        if self.default_time_window_secs == Some(0) {
            return Err(Error::InvalidArgument(
                "default_time_window_secs must be positive; omit it to disable windowing".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for `CoordinatorConfig`.
#[derive(Debug, Default)]
pub struct CoordinatorConfigBuilder {
    config: CoordinatorConfig,
}

impl CoordinatorConfigBuilder {
    /// Set the scoring policy.
    #[must_use]
    pub const fn policy(mut self, policy: ScoringPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Enable or disable info-level score events.
    #[must_use]
    pub const fn debug_mode(mut self, enabled: bool) -> Self {
        self.config.debug_mode = enabled;
        self
    }

    /// Set the default recency window in seconds.
    #[must_use]
    pub const fn default_time_window_secs(mut self, secs: u64) -> Self {
        self.config.default_time_window_secs = Some(secs);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Same as [`CoordinatorConfig::validate`].
    pub fn build(self) -> Result<CoordinatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
