//! Bandit scoring policies
//!
//! Converts per-arm `(turns, rewards)` counters into a [`ScoreSet`] under one
//! of two independently selectable policies:
//!
//! - [`ScoringPolicy::ThompsonSampling`] (default): one posterior draw per
//!   arm; stochastic.
//! - [`ScoringPolicy::Ucb1`]: optimistic mean plus exploration bonus;
//!   deterministic apart from a `< 1e-6` tie-breaking jitter.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use bandit_engine::sampling::RandomSource;
//! use bandit_engine::scorer::{select_best, ArmCounts, BanditScorer, ScoringPolicy};
//!
//! # fn example() -> bandit_engine::Result<()> {
//! let scorer = BanditScorer::new(ScoringPolicy::ThompsonSampling)?;
//!
//! let mut arms = BTreeMap::new();
//! arms.insert("blue-button".to_string(), ArmCounts::new(120, 30));
//! arms.insert("green-button".to_string(), ArmCounts::new(80, 12));
//!
//! let mut rng = RandomSource::seeded(1);
//! let scores = scorer.score(&arms, 200, &mut rng)?;
//! assert!(select_best(&scores).is_some());
//! # Ok(())
//! # }
//! ```

mod score_set;
mod thompson;
mod ucb1;

pub use score_set::ScoreSet;
pub use thompson::thompson_score;
pub use ucb1::{ucb1_base_score, ucb1_score, UCB1_JITTER};

use std::collections::BTreeMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::sampling::RandomSource;
use crate::{Error, Result};

/// Default UCB1 exploration constant.
pub const DEFAULT_UCB1_ALPHA: f64 = 2.0;

/// Scoring policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Beta-Bernoulli posterior sampling (default)
    #[default]
    ThompsonSampling,
    /// Upper Confidence Bound with exploration constant `alpha`
    Ucb1 {
        /// Exploration constant (default 2.0)
        alpha: f64,
    },
}

impl ScoringPolicy {
    /// UCB1 with the default exploration constant.
    #[must_use]
    pub const fn ucb1() -> Self {
        Self::Ucb1 {
            alpha: DEFAULT_UCB1_ALPHA,
        }
    }

    /// Policy name as string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ThompsonSampling => "thompson_sampling",
            Self::Ucb1 { .. } => "ucb1",
        }
    }

    /// Check policy constants.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` for a UCB1 alpha that is negative or
    /// not finite.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::ThompsonSampling => Ok(()),
            Self::Ucb1 { alpha } if alpha.is_finite() && *alpha >= 0.0 => Ok(()),
            Self::Ucb1 { alpha } => Err(Error::InvalidArgument(format!(
                "UCB1 alpha must be finite and non-negative, got {alpha}"
            ))),
        }
    }
}

/// Trial and success counters for one arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArmCounts {
    turns: u64,
    rewards: u64,
}

impl ArmCounts {
    /// Create counters. Validity (`rewards <= turns`) is checked by
    /// [`ArmCounts::validate`], not here, so stored data can be inspected
    /// before it is rejected.
    #[must_use]
    pub const fn new(turns: u64, rewards: u64) -> Self {
        Self { turns, rewards }
    }

    /// Number of trials.
    #[must_use]
    pub const fn turns(&self) -> u64 {
        self.turns
    }

    /// Number of successes.
    #[must_use]
    pub const fn rewards(&self) -> u64 {
        self.rewards
    }

    /// Reject `rewards > turns`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArmStats` naming the arm.
    pub fn validate(&self, arm_id: &str) -> Result<()> {
        if self.rewards > self.turns {
            return Err(Error::InvalidArmStats {
                arm_id: arm_id.to_string(),
                turns: self.turns,
                rewards: self.rewards,
            });
        }
        Ok(())
    }

    /// Posterior Beta parameters `(rewards + 1, failures + 1)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn beta_parameters(&self) -> (f64, f64) {
        let failures = self.turns.saturating_sub(self.rewards);
        (self.rewards as f64 + 1.0, failures as f64 + 1.0)
    }
}

/// Scores arms under a fixed policy.
///
/// Stateless apart from the policy; all randomness comes from the
/// `RandomSource` passed to each call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BanditScorer {
    policy: ScoringPolicy,
}

impl BanditScorer {
    /// Create a scorer.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the policy constants are invalid.
    pub fn new(policy: ScoringPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Active policy.
    #[must_use]
    pub const fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Score every arm.
    ///
    /// All arms are validated before any randomness is consumed. UCB1 uses
    /// `total_turns`; Thompson Sampling ignores it.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArmStats` if any arm has `rewards > turns`
    /// - `Error::Entropy` if the random source fails
    pub fn score<R: RngCore>(
        &self,
        arms: &BTreeMap<String, ArmCounts>,
        total_turns: u64,
        rng: &mut RandomSource<R>,
    ) -> Result<ScoreSet> {
        for (arm_id, counts) in arms {
            counts.validate(arm_id)?;
        }

        match self.policy {
            ScoringPolicy::ThompsonSampling => thompson::score_all(arms, rng),
            ScoringPolicy::Ucb1 { alpha } => ucb1::score_all(arms, total_turns, alpha, rng),
        }
    }
}

/// Arm with the highest score, or `None` for an empty set.
#[must_use]
pub fn select_best(scores: &ScoreSet) -> Option<&str> {
    scores.best()
}
