//! Experiment coordinator
//!
//! Bridges an [`ArmStatsStore`] and the [`BanditScorer`]:
//!
//! 1. fetch arm counters (optionally only recently updated arms)
//! 2. give every requested-but-unseen arm zero counters (cold start)
//! 3. score with the configured policy
//! 4. emit one structured `tracing` event with the scores
//!
//! The coordinator holds no mutable state; every call is a function of the
//! store contents and its arguments.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::config::CoordinatorConfig;
use crate::registry::ExperimentRegistry;
use crate::report::{ExperimentReport, ExperimentSummary};
use crate::sampling::RandomSource;
use crate::scorer::{
    select_best, ArmCounts, BanditScorer, ScoreSet, ScoringPolicy, DEFAULT_UCB1_ALPHA,
};
use crate::store::{ArmStats, ArmStatsStore};
use crate::{Error, Result};

/// `tracing` target of the per-call score event.
pub const SCORE_EVENT_TARGET: &str = "bandit_engine::scores";

/// Arms gathered for one scoring call.
struct ArmSnapshot {
    arms: BTreeMap<String, ArmCounts>,
    total_turns: u64,
    window: Option<u64>,
}

/// Orchestrates scoring over an experiment's arms.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use bandit_engine::{CoordinatorConfig, ExperimentCoordinator};
/// use bandit_engine::store::MemoryArmStatsStore;
///
/// # async fn example() -> bandit_engine::Result<()> {
/// let store = Arc::new(MemoryArmStatsStore::new());
/// let coordinator = ExperimentCoordinator::new(store, CoordinatorConfig::default())?;
///
/// let scores = coordinator.score_arms("signup-cta", &["join", "subscribe"], None).await?;
/// let shown = coordinator.select_best(&scores).unwrap();
/// coordinator.record_turn("signup-cta", shown).await?;
/// # Ok(())
/// # }
/// ```
pub struct ExperimentCoordinator<S> {
    store: Arc<S>,
    registry: Option<Arc<ExperimentRegistry>>,
    scorer: BanditScorer,
    config: CoordinatorConfig,
}

impl<S: ArmStatsStore> ExperimentCoordinator<S> {
    /// Create a coordinator over a counter store.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the configuration is invalid.
    pub fn new(store: Arc<S>, config: CoordinatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            registry: None,
            scorer: BanditScorer::new(config.policy)?,
            config,
        })
    }

    /// Attach a registry used for experiment names in events and reports,
    /// and cleaned up by [`ExperimentCoordinator::delete_experiment`].
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ExperimentRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Underlying counter store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Attached registry, if any.
    #[must_use]
    pub fn registry(&self) -> Option<&ExperimentRegistry> {
        self.registry.as_deref()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Active scoring policy.
    #[must_use]
    pub const fn policy(&self) -> ScoringPolicy {
        self.scorer.policy()
    }

    /// Score an experiment's arms using OS entropy.
    ///
    /// `time_window_secs`: `None` falls back to the configured default
    /// window; `Some(0)` disables windowing for this call.
    ///
    /// Every id in `candidate_arm_ids` gets a score, with zero counters if
    /// it has no history. Returns an empty set only when there are neither
    /// candidates nor (windowed) historical arms.
    ///
    /// Every historical arm in the window is validated, candidate or not.
    /// The store does not order turns before rewards, so a reward recorded
    /// ahead of its turn (`rewards > turns` on any arm) fails the whole call
    /// until the turn lands.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` for an empty experiment id
    /// - `Error::InvalidArmStats` if the store returns `rewards > turns`
    /// - `Error::Entropy` / `Error::Storage` from the collaborators
    pub async fn score_arms<A: AsRef<str>>(
        &self,
        experiment_id: &str,
        candidate_arm_ids: &[A],
        time_window_secs: Option<u64>,
    ) -> Result<ScoreSet> {
        let snapshot = self
            .snapshot(experiment_id, candidate_arm_ids, time_window_secs)
            .await?;
        self.score_snapshot(experiment_id, &snapshot, &mut RandomSource::os())
    }

    /// Same as [`ExperimentCoordinator::score_arms`] with a caller-supplied
    /// random source (seeded replays, tests).
    ///
    /// # Errors
    ///
    /// Same as [`ExperimentCoordinator::score_arms`].
    pub async fn score_arms_with<A: AsRef<str>, R: RngCore>(
        &self,
        experiment_id: &str,
        candidate_arm_ids: &[A],
        time_window_secs: Option<u64>,
        rng: &mut RandomSource<R>,
    ) -> Result<ScoreSet> {
        let snapshot = self
            .snapshot(experiment_id, candidate_arm_ids, time_window_secs)
            .await?;
        self.score_snapshot(experiment_id, &snapshot, rng)
    }

    /// Arm with the maximal score, `None` for an empty set.
    #[must_use]
    pub fn select_best<'a>(&self, scores: &'a ScoreSet) -> Option<&'a str> {
        select_best(scores)
    }

    /// Record one exposure of an arm.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` for empty ids; store errors otherwise.
    pub async fn record_turn(&self, experiment_id: &str, arm_id: &str) -> Result<()> {
        require_id("experiment id", experiment_id)?;
        require_id("arm id", arm_id)?;
        self.store.increment_turn(experiment_id, arm_id).await
    }

    /// Record one exposure for each listed arm. No-op for an empty list.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` for empty ids; store errors otherwise.
    pub async fn record_turns<A: AsRef<str>>(
        &self,
        experiment_id: &str,
        arm_ids: &[A],
    ) -> Result<()> {
        require_id("experiment id", experiment_id)?;
        if arm_ids.is_empty() {
            return Ok(());
        }

        let arm_ids: Vec<&str> = arm_ids.iter().map(|arm_id| arm_id.as_ref()).collect();
        for arm_id in &arm_ids {
            require_id("arm id", arm_id)?;
        }
        self.store.increment_turns(experiment_id, &arm_ids).await
    }

    /// Record one success for an arm.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` for empty ids; store errors otherwise.
    pub async fn record_reward(&self, experiment_id: &str, arm_id: &str) -> Result<()> {
        require_id("experiment id", experiment_id)?;
        require_id("arm id", arm_id)?;
        self.store.increment_reward(experiment_id, arm_id).await
    }

    /// Counters for one arm.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn arm_stats(&self, experiment_id: &str, arm_id: &str) -> Result<Option<ArmStats>> {
        self.store.arm(experiment_id, arm_id).await
    }

    /// Counters for every arm of an experiment.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn all_arm_stats(&self, experiment_id: &str) -> Result<Vec<ArmStats>> {
        self.store.arm_stats(experiment_id, None).await
    }

    /// Total turns across all arms.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn total_turns(&self, experiment_id: &str) -> Result<u64> {
        self.store.total_turns(experiment_id).await
    }

    /// Summarize an experiment's counters.
    ///
    /// # Errors
    ///
    /// `Error::ExperimentNotFound` when the experiment has no counters and
    /// no registry record; store errors otherwise.
    pub async fn report(&self, experiment_id: &str) -> Result<ExperimentReport> {
        let arms = self.store.arm_stats(experiment_id, None).await?;
        let totals = self.store.totals(experiment_id).await?;
        let registered = self
            .registry
            .as_ref()
            .is_some_and(|registry| registry.is_registered(experiment_id));

        if arms.is_empty() && totals.is_none() && !registered {
            return Err(Error::ExperimentNotFound(experiment_id.to_string()));
        }

        Ok(ExperimentReport::new(
            experiment_id,
            self.experiment_name(experiment_id),
            totals,
            &arms,
            self.ucb1_alpha(),
        ))
    }

    /// One summary per registered experiment, most recently registered
    /// first. Empty when no registry is attached.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn overview(&self) -> Result<Vec<ExperimentSummary>> {
        let Some(registry) = &self.registry else {
            return Ok(Vec::new());
        };

        let records = registry.records();
        let mut summaries = Vec::with_capacity(records.len());
        for record in &records {
            let totals = self.store.totals(record.experiment_id()).await?;
            let arm_count = self.store.arm_stats(record.experiment_id(), None).await?.len();
            summaries.push(ExperimentSummary::new(record, totals, arm_count));
        }
        Ok(summaries)
    }

    /// Delete an experiment's counters and registry record.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` for an empty id; store errors otherwise.
    pub async fn delete_experiment(&self, experiment_id: &str) -> Result<()> {
        require_id("experiment id", experiment_id)?;
        self.store.delete_experiment(experiment_id).await?;
        if let Some(registry) = &self.registry {
            registry.unregister(experiment_id);
        }
        info!(experiment_id, "experiment deleted");
        Ok(())
    }

    async fn snapshot<A: AsRef<str>>(
        &self,
        experiment_id: &str,
        candidate_arm_ids: &[A],
        time_window_secs: Option<u64>,
    ) -> Result<ArmSnapshot> {
        require_id("experiment id", experiment_id)?;

        let window = time_window_secs
            .or(self.config.default_time_window_secs)
            .filter(|secs| *secs > 0);

        let history = self.store.arm_stats(experiment_id, window).await?;
        let windowed_turns = history
            .iter()
            .fold(0u64, |sum, stats| sum.saturating_add(stats.turns()));

        let mut arms: BTreeMap<String, ArmCounts> = history
            .into_iter()
            .map(|stats| {
                let counts = stats.counts();
                (stats.arm_id().to_string(), counts)
            })
            .collect();

        for arm_id in candidate_arm_ids {
            let arm_id: &str = arm_id.as_ref();
            arms.entry(arm_id.to_string()).or_default();
        }

        // UCB1 normalizes against the experiment total; inside a window only
        // the windowed arms count.
        let total_turns = match (self.scorer.policy(), window) {
            (ScoringPolicy::ThompsonSampling, _) => 0,
            (ScoringPolicy::Ucb1 { .. }, Some(_)) => windowed_turns,
            (ScoringPolicy::Ucb1 { .. }, None) => self.store.total_turns(experiment_id).await?,
        };

        Ok(ArmSnapshot {
            arms,
            total_turns,
            window,
        })
    }

    fn score_snapshot<R: RngCore>(
        &self,
        experiment_id: &str,
        snapshot: &ArmSnapshot,
        rng: &mut RandomSource<R>,
    ) -> Result<ScoreSet> {
        if snapshot.arms.is_empty() {
            debug!(experiment_id, "no arms to score");
            return Ok(ScoreSet::new());
        }

        let scores = match self.scorer.score(&snapshot.arms, snapshot.total_turns, rng) {
            Ok(scores) => scores,
            Err(err) => {
                warn!(experiment_id, error = %err, "scoring rejected");
                return Err(err);
            }
        };

        self.emit_scores(experiment_id, &scores, snapshot.window);
        Ok(scores)
    }

    fn emit_scores(&self, experiment_id: &str, scores: &ScoreSet, window: Option<u64>) {
        let name = self.experiment_name(experiment_id);
        let experiment_name = name.as_deref().unwrap_or("Unknown");
        let policy = self.scorer.policy().as_str();
        let best = scores.best().unwrap_or_default();

        if self.config.debug_mode {
            info!(
                target: SCORE_EVENT_TARGET,
                experiment_id,
                experiment_name,
                policy,
                arms = scores.len(),
                best,
                window_secs = window,
                scores = %scores,
                "bandit scores calculated"
            );
        } else {
            debug!(
                target: SCORE_EVENT_TARGET,
                experiment_id,
                experiment_name,
                policy,
                arms = scores.len(),
                best,
                window_secs = window,
                scores = %scores,
                "bandit scores calculated"
            );
        }
    }

    /// Exploration constant for report UCB1 columns.
    const fn ucb1_alpha(&self) -> f64 {
        match self.scorer.policy() {
            ScoringPolicy::Ucb1 { alpha } => alpha,
            ScoringPolicy::ThompsonSampling => DEFAULT_UCB1_ALPHA,
        }
    }

    fn experiment_name(&self, experiment_id: &str) -> Option<String> {
        self.registry
            .as_ref()
            .and_then(|registry| registry.experiment_name(experiment_id))
    }
}

impl<S> std::fmt::Debug for ExperimentCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperimentCoordinator")
            .field("scorer", &self.scorer)
            .field("config", &self.config)
            .field("has_registry", &self.registry.is_some())
            .finish_non_exhaustive()
    }
}

fn require_id(what: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidArgument(format!("{what} must not be empty")));
    }
    Ok(())
}
