//! Per-experiment summaries for reporting surfaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::ExperimentRecord;
use crate::scorer::ucb1_base_score;
use crate::store::{ArmStats, ExperimentTotals};

/// Summary of one arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmReport {
    /// Arm identifier
    pub arm_id: String,
    /// Trials
    pub turns: u64,
    /// Successes
    pub rewards: u64,
    /// `rewards / turns`, 0 when the arm has no turns
    pub success_rate: f64,
    /// Posterior mean `(rewards + 1) / (turns + 2)` under a uniform prior
    pub posterior_mean: f64,
    /// Jitter-free UCB1 score against the experiment total
    pub ucb1_score: f64,
    /// First seen
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Last counter mutation
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated: DateTime<Utc>,
}

impl ArmReport {
    /// Summarize stored counters.
    ///
    /// `total_turns` and `ucb1_alpha` feed the UCB1 column, which is
    /// reported whatever policy the experiment is scored with.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_stats(stats: &ArmStats, total_turns: u64, ucb1_alpha: f64) -> Self {
        let turns = stats.turns();
        let rewards = stats.rewards();
        let success_rate = if turns > 0 {
            rewards as f64 / turns as f64
        } else {
            0.0
        };

        Self {
            arm_id: stats.arm_id().to_string(),
            turns,
            rewards,
            success_rate,
            posterior_mean: (rewards as f64 + 1.0) / (turns as f64 + 2.0),
            ucb1_score: ucb1_base_score(stats.counts(), total_turns, ucb1_alpha),
            created: stats.created(),
            updated: stats.updated(),
        }
    }
}

/// Summary of one experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Experiment identifier
    pub experiment_id: String,
    /// Registered display name
    pub name: Option<String>,
    /// Experiment total as maintained by the store
    pub total_turns: u64,
    /// Sum of arm rewards
    pub total_rewards: u64,
    /// First recorded activity, `None` before any counter was written
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Last recorded activity, `None` before any counter was written
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub updated: Option<DateTime<Utc>>,
    /// Arms, most-played first (ties by arm id)
    pub arms: Vec<ArmReport>,
}

impl ExperimentReport {
    /// Build a report, ordering arms by turns descending then arm id.
    #[must_use]
    pub fn new(
        experiment_id: impl Into<String>,
        name: Option<String>,
        totals: Option<ExperimentTotals>,
        stats: &[ArmStats],
        ucb1_alpha: f64,
    ) -> Self {
        let total_turns = totals.map_or(0, |totals| totals.total_turns());
        let mut arms: Vec<ArmReport> = stats
            .iter()
            .map(|stats| ArmReport::from_stats(stats, total_turns, ucb1_alpha))
            .collect();
        arms.sort_by(|a, b| b.turns.cmp(&a.turns).then_with(|| a.arm_id.cmp(&b.arm_id)));

        Self {
            experiment_id: experiment_id.into(),
            name,
            total_turns,
            total_rewards: arms.iter().map(|arm| arm.rewards).sum(),
            created: totals.map(|totals| totals.created()),
            updated: totals.map(|totals| totals.updated()),
            arms,
        }
    }

    /// Arm with the highest observed success rate among arms with turns.
    #[must_use]
    pub fn leader(&self) -> Option<&ArmReport> {
        self.arms
            .iter()
            .filter(|arm| arm.turns > 0)
            .fold(None, |best: Option<&ArmReport>, arm| match best {
                Some(top) if top.success_rate >= arm.success_rate => Some(top),
                _ => Some(arm),
            })
    }
}

/// One row of the experiments overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Experiment identifier
    pub experiment_id: String,
    /// Owning namespace
    pub namespace: String,
    /// Registered display name
    pub name: Option<String>,
    /// Experiment total, 0 before the first turn
    pub total_turns: u64,
    /// Number of arms with counters
    pub arm_count: usize,
    /// Registration time
    #[serde(with = "chrono::serde::ts_seconds")]
    pub registered_at: DateTime<Utc>,
    /// Last counter activity, or the registration time if there was none
    #[serde(with = "chrono::serde::ts_seconds")]
    pub last_activity: DateTime<Utc>,
}

impl ExperimentSummary {
    /// Combine a registry record with its stored counters.
    #[must_use]
    pub fn new(
        record: &ExperimentRecord,
        totals: Option<ExperimentTotals>,
        arm_count: usize,
    ) -> Self {
        Self {
            experiment_id: record.experiment_id().to_string(),
            namespace: record.namespace().to_string(),
            name: record.name().map(str::to_string),
            total_turns: totals.map_or(0, |totals| totals.total_turns()),
            arm_count,
            registered_at: record.registered_at(),
            last_activity: totals.map_or(record.registered_at(), |totals| totals.updated()),
        }
    }
}
