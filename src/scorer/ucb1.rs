//! UCB1 (Auer et al., 2002) with a configurable exploration constant.

use std::collections::BTreeMap;

use rand::RngCore;

use super::{ArmCounts, ScoreSet};
use crate::sampling::RandomSource;
use crate::Result;

/// Upper bound of the tie-breaking jitter added to each UCB1 score.
pub const UCB1_JITTER: f64 = 1e-6;

/// Jitter-free UCB1 score.
///
/// `rewards / n + sqrt(alpha * ln(total) / n)` with both `n` (arm turns) and
/// `total` clamped to at least 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ucb1_base_score(counts: ArmCounts, total_turns: u64, alpha: f64) -> f64 {
    let arm_turns = counts.turns().max(1) as f64;
    let total_turns = total_turns.max(1) as f64;

    let exploitation = counts.rewards() as f64 / arm_turns;
    let exploration = (alpha * total_turns.ln() / arm_turns).sqrt();

    exploitation + exploration
}

/// UCB1 score plus a uniform jitter in `[0, UCB1_JITTER)`.
///
/// # Errors
///
/// Propagates entropy failures from `rng`.
pub fn ucb1_score<R: RngCore>(
    counts: ArmCounts,
    total_turns: u64,
    alpha: f64,
    rng: &mut RandomSource<R>,
) -> Result<f64> {
    Ok(ucb1_base_score(counts, total_turns, alpha) + rng.uniform()? * UCB1_JITTER)
}

pub(super) fn score_all<R: RngCore>(
    arms: &BTreeMap<String, ArmCounts>,
    total_turns: u64,
    alpha: f64,
    rng: &mut RandomSource<R>,
) -> Result<ScoreSet> {
    let mut scores = ScoreSet::new();
    for (arm_id, counts) in arms {
        scores.insert(arm_id.clone(), ucb1_score(*counts, total_turns, alpha, rng)?);
    }
    Ok(scores)
}
