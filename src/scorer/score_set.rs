//! Ephemeral per-arm scores produced by a scoring call.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mapping from arm id to score.
///
/// Iteration is in ascending arm-id order, so `best()` is deterministic for a
/// fixed set of scores. Produced fresh on every scoring call and never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSet {
    scores: BTreeMap<String, f64>,
}

impl ScoreSet {
    /// Create an empty score set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score for an arm, replacing any previous value.
    pub fn insert(&mut self, arm_id: impl Into<String>, score: f64) {
        self.scores.insert(arm_id.into(), score);
    }

    /// Score for an arm, if present.
    #[must_use]
    pub fn get(&self, arm_id: &str) -> Option<f64> {
        self.scores.get(arm_id).copied()
    }

    /// Check whether an arm has a score.
    #[must_use]
    pub fn contains(&self, arm_id: &str) -> bool {
        self.scores.contains_key(arm_id)
    }

    /// Number of scored arms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when nothing could be scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate `(arm_id, score)` in ascending arm-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(id, score)| (id.as_str(), *score))
    }

    /// Scored arm ids in ascending order.
    pub fn arm_ids(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    /// Arm with the maximal score.
    ///
    /// Ties go to the first maximal arm in iteration order. Returns `None`
    /// for an empty set.
    #[must_use]
    pub fn best(&self) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for (arm_id, score) in self.iter() {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((arm_id, score));
            }
        }
        best.map(|(arm_id, _)| arm_id)
    }

    /// Consume into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.scores
    }
}

impl FromIterator<(String, f64)> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(id, score)| (id.to_string(), score))
            .collect()
    }
}

/// Renders `arm:score` pairs with four decimals, comma separated.
impl fmt::Display for ScoreSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (arm_id, score)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arm_id}:{score:.4}")?;
        }
        Ok(())
    }
}
