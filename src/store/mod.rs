//! Arm Statistics Store
//!
//! Counter storage consumed by the coordinator. Production deployments put a
//! relational or key-value backend behind [`ArmStatsStore`]; the crate ships
//! [`MemoryArmStatsStore`] for tests and embedders that do not need
//! durability.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentTotals (1) ──< ArmStats (N)
//!   total_turns == Σ arm.turns
//! ```
//!
//! # Example
//!
//! ```rust
//! use bandit_engine::store::{ArmStatsStore, MemoryArmStatsStore};
//!
//! # async fn example() -> bandit_engine::Result<()> {
//! let store = MemoryArmStatsStore::new();
//!
//! store.increment_turns("exp-1", &["a", "b"]).await?;
//! store.increment_reward("exp-1", "b").await?;
//!
//! let b = store.arm("exp-1", "b").await?.unwrap();
//! assert_eq!((b.turns(), b.rewards()), (1, 1));
//! assert_eq!(store.total_turns("exp-1").await?, 2);
//! # Ok(())
//! # }
//! ```

mod memory;

pub use memory::MemoryArmStatsStore;

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::scorer::ArmCounts;
use crate::Result;

/// Counters for one arm of one experiment.
///
/// Timestamps serialize as unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmStats {
    arm_id: String,
    turns: u64,
    rewards: u64,
    #[serde(with = "chrono::serde::ts_seconds")]
    created: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    updated: DateTime<Utc>,
}

impl ArmStats {
    /// Create a counter row.
    #[must_use]
    pub fn new(
        arm_id: impl Into<String>,
        turns: u64,
        rewards: u64,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            arm_id: arm_id.into(),
            turns,
            rewards,
            created,
            updated,
        }
    }

    /// Arm identifier.
    #[must_use]
    pub fn arm_id(&self) -> &str {
        &self.arm_id
    }

    /// Trial count.
    #[must_use]
    pub const fn turns(&self) -> u64 {
        self.turns
    }

    /// Success count.
    #[must_use]
    pub const fn rewards(&self) -> u64 {
        self.rewards
    }

    /// First time the arm was seen.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Last counter mutation.
    #[must_use]
    pub const fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Counters as scorer input.
    #[must_use]
    pub const fn counts(&self) -> ArmCounts {
        ArmCounts::new(self.turns, self.rewards)
    }

    pub(crate) fn add_turns(&mut self, count: u64, now: DateTime<Utc>) {
        self.turns = self.turns.saturating_add(count);
        self.updated = now;
    }

    pub(crate) fn add_reward(&mut self, now: DateTime<Utc>) {
        self.rewards = self.rewards.saturating_add(1);
        self.updated = now;
    }
}

/// Aggregate counters for one experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentTotals {
    total_turns: u64,
    #[serde(with = "chrono::serde::ts_seconds")]
    created: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    updated: DateTime<Utc>,
}

impl ExperimentTotals {
    /// Create a totals row.
    #[must_use]
    pub const fn new(total_turns: u64, created: DateTime<Utc>, updated: DateTime<Utc>) -> Self {
        Self {
            total_turns,
            created,
            updated,
        }
    }

    /// Sum of all arms' turns.
    #[must_use]
    pub const fn total_turns(&self) -> u64 {
        self.total_turns
    }

    /// First recorded activity.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Last recorded activity (turns or rewards).
    #[must_use]
    pub const fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    pub(crate) fn add_turns(&mut self, count: u64, now: DateTime<Utc>) {
        self.total_turns = self.total_turns.saturating_add(count);
        self.updated = now;
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated = now;
    }
}

/// Oldest `updated` timestamp admitted by a recency window.
///
/// `None` (no filtering) when the window is absent, zero, or too large to
/// represent.
#[must_use]
pub fn window_cutoff(now: DateTime<Utc>, time_window_secs: Option<u64>) -> Option<DateTime<Utc>> {
    let secs = time_window_secs.filter(|secs| *secs > 0)?;
    let delta = i64::try_from(secs).ok().and_then(Duration::try_seconds)?;
    now.checked_sub_signed(delta)
}

/// Counter store for bandit experiments.
///
/// Implementations must make every increment atomic: concurrent writers
/// never lose an increment, and each turn-recording call bumps both the arm
/// row and the experiment total. Rows are upserted (first write creates,
/// later writes increment).
pub trait ArmStatsStore: Send + Sync {
    /// Counters for every arm of an experiment, ordered by arm id.
    ///
    /// With a positive `time_window_secs`, only arms whose `updated`
    /// timestamp is within that many seconds of now are returned.
    fn arm_stats(
        &self,
        experiment_id: &str,
        time_window_secs: Option<u64>,
    ) -> impl Future<Output = Result<Vec<ArmStats>>> + Send;

    /// Counters for one arm, `None` if never recorded.
    fn arm(
        &self,
        experiment_id: &str,
        arm_id: &str,
    ) -> impl Future<Output = Result<Option<ArmStats>>> + Send;

    /// Aggregate row, `None` if nothing was recorded.
    fn totals(
        &self,
        experiment_id: &str,
    ) -> impl Future<Output = Result<Option<ExperimentTotals>>> + Send;

    /// Total turns across all arms (0 for unknown experiments).
    fn total_turns(&self, experiment_id: &str) -> impl Future<Output = Result<u64>> + Send {
        async move {
            Ok(self
                .totals(experiment_id)
                .await?
                .map_or(0, |totals| totals.total_turns()))
        }
    }

    /// Record one exposure of an arm.
    fn increment_turn(
        &self,
        experiment_id: &str,
        arm_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Record one exposure for each listed arm (e.g. several arms shown on
    /// one page). The experiment total grows by `arm_ids.len()`.
    fn increment_turns(
        &self,
        experiment_id: &str,
        arm_ids: &[&str],
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            for arm_id in arm_ids {
                self.increment_turn(experiment_id, arm_id).await?;
            }
            Ok(())
        }
    }

    /// Record one success for an arm.
    ///
    /// Creates the arm row if needed and refreshes the experiment's
    /// `updated` timestamp without changing `total_turns`.
    fn increment_reward(
        &self,
        experiment_id: &str,
        arm_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove every arm row and the totals row of an experiment.
    fn delete_experiment(&self, experiment_id: &str) -> impl Future<Output = Result<()>> + Send;
}
