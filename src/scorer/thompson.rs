//! Thompson Sampling over a Beta-Bernoulli posterior.
//!
//! Each arm's success rate has a uniform Beta(1,1) prior; after `turns`
//! trials with `rewards` successes the posterior is
//! `Beta(rewards + 1, turns - rewards + 1)`. The score is one fresh draw from
//! that posterior, so repeated calls disagree by design.

use std::collections::BTreeMap;

use rand::RngCore;

use super::{ArmCounts, ScoreSet};
use crate::sampling::{Beta, RandomSource};
use crate::Result;

/// Sample one Thompson score for a single arm.
///
/// Counts must already satisfy `rewards <= turns`.
///
/// # Errors
///
/// Propagates entropy failures from `rng`.
pub fn thompson_score<R: RngCore>(counts: ArmCounts, rng: &mut RandomSource<R>) -> Result<f64> {
    let (alpha, beta) = counts.beta_parameters();
    Beta::new(alpha, beta)?.sample(rng)
}

pub(super) fn score_all<R: RngCore>(
    arms: &BTreeMap<String, ArmCounts>,
    rng: &mut RandomSource<R>,
) -> Result<ScoreSet> {
    let mut scores = ScoreSet::new();
    for (arm_id, counts) in arms {
        scores.insert(arm_id.clone(), thompson_score(*counts, rng)?);
    }
    Ok(scores)
}
