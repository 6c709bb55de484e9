//! In-memory arm statistics store using `DashMap`.
//!
//! Data is lost on process restart.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use super::{window_cutoff, ArmStats, ArmStatsStore, ExperimentTotals};
use crate::clock::{Clock, SystemClock};
use crate::Result;

type ArmKey = (String, String);

/// In-memory counter store using lock-free concurrent hashmaps.
///
/// Upserts go through `DashMap::entry`, which holds the shard lock for the
/// whole read-modify-write, so concurrent increments are never lost.
///
/// # Example
///
/// ```rust
/// use bandit_engine::store::{ArmStatsStore, MemoryArmStatsStore};
///
/// # async fn example() -> bandit_engine::Result<()> {
/// let store = MemoryArmStatsStore::new();
/// store.increment_turn("exp", "a").await?;
/// assert_eq!(store.arm("exp", "a").await?.map(|a| a.turns()), Some(1));
/// # Ok(())
/// # }
/// ```
pub struct MemoryArmStatsStore {
    arms: DashMap<ArmKey, ArmStats, FxBuildHasher>,
    totals: DashMap<String, ExperimentTotals, FxBuildHasher>,
    clock: Arc<dyn Clock>,
}

impl MemoryArmStatsStore {
    /// Create a store on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store with an explicit time source.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            arms: DashMap::with_hasher(FxBuildHasher),
            totals: DashMap::with_hasher(FxBuildHasher),
            clock,
        }
    }

    /// Number of arm rows across all experiments.
    #[must_use]
    pub fn arm_count(&self) -> usize {
        self.arms.len()
    }

    /// Check if the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arms.is_empty() && self.totals.is_empty()
    }

    /// Clear all rows.
    pub fn clear(&self) {
        self.arms.clear();
        self.totals.clear();
    }

    fn add_turns(&self, experiment_id: &str, arm_ids: &[&str]) {
        let now = self.clock.now();
        for arm_id in arm_ids {
            self.arms
                .entry((experiment_id.to_string(), (*arm_id).to_string()))
                .and_modify(|stats| stats.add_turns(1, now))
                .or_insert_with(|| ArmStats::new(*arm_id, 1, 0, now, now));
        }

        let count = arm_ids.len() as u64;
        self.totals
            .entry(experiment_id.to_string())
            .and_modify(|totals| totals.add_turns(count, now))
            .or_insert_with(|| ExperimentTotals::new(count, now, now));
    }
}

impl Default for MemoryArmStatsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryArmStatsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryArmStatsStore")
            .field("arms", &self.arms.len())
            .field("experiments", &self.totals.len())
            .finish_non_exhaustive()
    }
}

impl ArmStatsStore for MemoryArmStatsStore {
    async fn arm_stats(
        &self,
        experiment_id: &str,
        time_window_secs: Option<u64>,
    ) -> Result<Vec<ArmStats>> {
        let cutoff = window_cutoff(self.clock.now(), time_window_secs);

        let mut stats: Vec<ArmStats> = self
            .arms
            .iter()
            .filter(|entry| entry.key().0 == experiment_id)
            .filter(|entry| cutoff.map_or(true, |cutoff| entry.value().updated() >= cutoff))
            .map(|entry| entry.value().clone())
            .collect();

        stats.sort_by(|a, b| a.arm_id().cmp(b.arm_id()));
        Ok(stats)
    }

    async fn arm(&self, experiment_id: &str, arm_id: &str) -> Result<Option<ArmStats>> {
        let key = (experiment_id.to_string(), arm_id.to_string());
        Ok(self.arms.get(&key).map(|entry| entry.value().clone()))
    }

    async fn totals(&self, experiment_id: &str) -> Result<Option<ExperimentTotals>> {
        Ok(self.totals.get(experiment_id).map(|entry| *entry.value()))
    }

    async fn increment_turn(&self, experiment_id: &str, arm_id: &str) -> Result<()> {
        self.add_turns(experiment_id, &[arm_id]);
        Ok(())
    }

    async fn increment_turns(&self, experiment_id: &str, arm_ids: &[&str]) -> Result<()> {
        if !arm_ids.is_empty() {
            self.add_turns(experiment_id, arm_ids);
        }
        Ok(())
    }

    async fn increment_reward(&self, experiment_id: &str, arm_id: &str) -> Result<()> {
        let now = self.clock.now();
        self.arms
            .entry((experiment_id.to_string(), arm_id.to_string()))
            .and_modify(|stats| stats.add_reward(now))
            .or_insert_with(|| ArmStats::new(arm_id, 0, 1, now, now));

        self.totals
            .entry(experiment_id.to_string())
            .and_modify(|totals| totals.touch(now))
            .or_insert_with(|| ExperimentTotals::new(0, now, now));
        Ok(())
    }

    async fn delete_experiment(&self, experiment_id: &str) -> Result<()> {
        self.arms.retain(|(experiment, _), _| experiment != experiment_id);
        self.totals.remove(experiment_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn store_at(secs: i64) -> (Arc<ManualClock>, MemoryArmStatsStore) {
        let clock = Arc::new(ManualClock::from_unix_secs(secs));
        let store = MemoryArmStatsStore::with_clock(clock.clone());
        (clock, store)
    }

    #[tokio::test]
    async fn test_turns_and_rewards_round_trip() {
        let store = MemoryArmStatsStore::new();

        for _ in 0..7 {
            store.increment_turn("exp", "a").await.unwrap();
        }
        for _ in 0..3 {
            store.increment_reward("exp", "a").await.unwrap();
        }

        let stats = store.arm("exp", "a").await.unwrap().unwrap();
        assert_eq!(stats.turns(), 7);
        assert_eq!(stats.rewards(), 3);
        assert_eq!(store.total_turns("exp").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_unknown_experiment() {
        let store = MemoryArmStatsStore::new();

        assert!(store.arm_stats("missing", None).await.unwrap().is_empty());
        assert!(store.arm("missing", "a").await.unwrap().is_none());
        assert!(store.totals("missing").await.unwrap().is_none());
        assert_eq!(store.total_turns("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_increment_turns_bumps_total_by_arm_count() {
        let store = MemoryArmStatsStore::new();

        store.increment_turns("exp", &["a", "b", "c"]).await.unwrap();
        store.increment_turns("exp", &["a"]).await.unwrap();
        store.increment_turns("exp", &[]).await.unwrap();

        assert_eq!(store.total_turns("exp").await.unwrap(), 4);
        let turns: Vec<u64> = store
            .arm_stats("exp", None)
            .await
            .unwrap()
            .iter()
            .map(ArmStats::turns)
            .collect();
        assert_eq!(turns, vec![2, 1, 1]);
    }

    #[tokio::test]
    async fn test_reward_for_unseen_arm_upserts() {
        let (_clock, store) = store_at(1_000);

        store.increment_reward("exp", "ghost").await.unwrap();

        let stats = store.arm("exp", "ghost").await.unwrap().unwrap();
        assert_eq!((stats.turns(), stats.rewards()), (0, 1));

        let totals = store.totals("exp").await.unwrap().unwrap();
        assert_eq!(totals.total_turns(), 0);
        assert_eq!(totals.updated().timestamp(), 1_000);
    }

    #[tokio::test]
    async fn test_timestamps_track_first_and_last_write() {
        let (clock, store) = store_at(1_000);

        store.increment_turn("exp", "a").await.unwrap();
        clock.advance_secs(50);
        store.increment_reward("exp", "a").await.unwrap();

        let stats = store.arm("exp", "a").await.unwrap().unwrap();
        assert_eq!(stats.created().timestamp(), 1_000);
        assert_eq!(stats.updated().timestamp(), 1_050);

        let totals = store.totals("exp").await.unwrap().unwrap();
        assert_eq!(totals.created().timestamp(), 1_000);
        assert_eq!(totals.updated().timestamp(), 1_050);
    }

    #[tokio::test]
    async fn test_time_window_filters_stale_arms() {
        let (clock, store) = store_at(10_000);

        store.increment_turn("exp", "old").await.unwrap();
        clock.advance_secs(3_600);
        store.increment_turn("exp", "fresh").await.unwrap();
        clock.advance_secs(60);

        let recent = store.arm_stats("exp", Some(600)).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].arm_id(), "fresh");

        // Boundary is inclusive
        let boundary = store.arm_stats("exp", Some(3_660)).await.unwrap();
        assert_eq!(boundary.len(), 2);

        assert_eq!(store.arm_stats("exp", Some(0)).await.unwrap().len(), 2);
        assert_eq!(store.arm_stats("exp", None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_experiments_are_isolated() {
        let store = MemoryArmStatsStore::new();

        store.increment_turn("exp-1", "a").await.unwrap();
        store.increment_turn("exp-2", "a").await.unwrap();
        store.increment_turn("exp-2", "b").await.unwrap();

        assert_eq!(store.arm_stats("exp-1", None).await.unwrap().len(), 1);
        assert_eq!(store.arm_stats("exp-2", None).await.unwrap().len(), 2);
        assert_eq!(store.arm_count(), 3);
    }

    #[tokio::test]
    async fn test_delete_experiment() {
        let store = MemoryArmStatsStore::new();

        store.increment_turns("exp-1", &["a", "b"]).await.unwrap();
        store.increment_turn("exp-2", "a").await.unwrap();
        store.delete_experiment("exp-1").await.unwrap();

        assert!(store.arm_stats("exp-1", None).await.unwrap().is_empty());
        assert!(store.totals("exp-1").await.unwrap().is_none());
        assert_eq!(store.total_turns("exp-2").await.unwrap(), 1);

        // Deleting twice is fine
        store.delete_experiment("exp-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(MemoryArmStatsStore::new());
        let mut handles = vec![];

        for i in 0..100 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let arm = if i % 2 == 0 { "even" } else { "odd" };
                for _ in 0..10 {
                    store.increment_turn("exp", arm).await.unwrap();
                }
                store.increment_reward("exp", arm).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let stats = store.arm_stats("exp", None).await.unwrap();
        let turn_sum: u64 = stats.iter().map(ArmStats::turns).sum();
        assert_eq!(turn_sum, 1_000);
        assert_eq!(store.total_turns("exp").await.unwrap(), 1_000);
        for arm in &stats {
            assert_eq!(arm.turns(), 500);
            assert_eq!(arm.rewards(), 50);
        }
    }

    #[tokio::test]
    async fn test_clear_and_default() {
        let store = MemoryArmStatsStore::default();
        assert!(store.is_empty());

        store.increment_turn("exp", "a").await.unwrap();
        assert!(!store.is_empty());

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.arm_count(), 0);
    }
}
