//! Property-based tests for bandit-engine
//!
//! - Samplers stay inside their supports
//! - UCB1 orders arms the way its formula promises
//! - Validation accepts exactly `rewards <= turns`
//! - Run with ProptestConfig::with_cases(100)

use std::collections::BTreeMap;

use bandit_engine::sampling::{Beta, Gamma, RandomSource};
use bandit_engine::scorer::{ucb1_base_score, ArmCounts, BanditScorer, ScoreSet};
use bandit_engine::ScoringPolicy;
use proptest::prelude::*;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Valid counters: rewards never exceed turns
fn arb_counts() -> impl Strategy<Value = ArmCounts> {
    (0u64..10_000).prop_flat_map(|turns| {
        (Just(turns), 0..=turns).prop_map(|(t, r)| ArmCounts::new(t, r))
    })
}

/// Up to eight arms with valid counters
fn arb_arms() -> impl Strategy<Value = BTreeMap<String, ArmCounts>> {
    proptest::collection::btree_map("[a-h]{1,3}", arb_counts(), 0..8)
}

fn arb_policy() -> impl Strategy<Value = ScoringPolicy> {
    prop_oneof![
        Just(ScoringPolicy::ThompsonSampling),
        (0.0f64..10.0).prop_map(|alpha| ScoringPolicy::Ucb1 { alpha }),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Sampler Properties
    // ========================================================================

    /// Property: Beta draws lie strictly inside (0, 1), even for tiny shapes
    #[test]
    fn prop_beta_in_unit_interval(
        alpha in 0.0001f64..500.0,
        beta in 0.0001f64..500.0,
        seed in any::<u64>()
    ) {
        let dist = Beta::new(alpha, beta).unwrap();
        let mut rng = RandomSource::seeded(seed);
        for _ in 0..20 {
            let x = dist.sample(&mut rng).unwrap();
            prop_assert!(x > 0.0 && x < 1.0, "Beta({}, {}) gave {}", alpha, beta, x);
        }
    }

    /// Property: Gamma draws are finite and strictly positive
    #[test]
    fn prop_gamma_positive(shape in 0.1f64..1_000.0, seed in any::<u64>()) {
        let gamma = Gamma::new(shape).unwrap();
        let mut rng = RandomSource::seeded(seed);
        for _ in 0..20 {
            let x = gamma.sample(&mut rng).unwrap();
            prop_assert!(x.is_finite() && x > 0.0, "Gamma({}) gave {}", shape, x);
        }
    }

    /// Property: Non-positive or non-finite parameters are rejected
    #[test]
    fn prop_invalid_shapes_rejected(shape in prop_oneof![
        -1_000.0f64..=0.0,
        Just(f64::NAN),
        Just(f64::INFINITY),
    ]) {
        prop_assert!(Gamma::new(shape).is_err());
        prop_assert!(Beta::new(shape, 1.0).is_err());
        prop_assert!(Beta::new(1.0, shape).is_err());
    }

    /// Property: Uniform draws lie in the open interval (0, 1)
    #[test]
    fn prop_uniform_open_interval(seed in any::<u64>()) {
        let mut rng = RandomSource::seeded(seed);
        for _ in 0..100 {
            let u = rng.uniform().unwrap();
            prop_assert!(u > 0.0 && u < 1.0);
        }
    }

    // ========================================================================
    // UCB1 Properties
    // ========================================================================

    /// Property: More rewards at fixed turns never lowers the UCB1 score
    #[test]
    fn prop_ucb1_monotonic_in_rewards(
        counts in arb_counts(),
        extra_total in 0u64..10_000,
        alpha in 0.0f64..10.0
    ) {
        prop_assume!(counts.rewards() < counts.turns());
        let total = counts.turns() + extra_total;
        let better = ArmCounts::new(counts.turns(), counts.rewards() + 1);

        let before = ucb1_base_score(counts, total, alpha);
        prop_assert!(ucb1_base_score(better, total, alpha) >= before);
    }

    /// Property: Among arms with equal success rate, the less-played arm
    /// gets the larger exploration bonus
    #[test]
    fn prop_ucb1_favors_less_played(
        turns in 1u64..1_000,
        factor in 2u64..10,
        alpha in 0.1f64..10.0
    ) {
        let total = turns * factor * 2;
        let rare = ArmCounts::new(turns, 0);
        let common = ArmCounts::new(turns * factor, 0);

        prop_assert!(ucb1_base_score(rare, total, alpha) > ucb1_base_score(common, total, alpha));
    }

    /// Property: UCB1 scores are finite even with zero totals
    #[test]
    fn prop_ucb1_finite(counts in arb_counts(), total in 0u64..100_000, alpha in 0.0f64..10.0) {
        prop_assert!(ucb1_base_score(counts, total, alpha).is_finite());
    }

    // ========================================================================
    // Scorer Properties
    // ========================================================================

    /// Property: Scores cover exactly the input arms
    #[test]
    fn prop_scores_cover_all_arms(
        arms in arb_arms(),
        policy in arb_policy(),
        seed in any::<u64>()
    ) {
        let scorer = BanditScorer::new(policy).unwrap();
        let total = arms.values().map(ArmCounts::turns).sum();
        let scores = scorer.score(&arms, total, &mut RandomSource::seeded(seed)).unwrap();

        prop_assert_eq!(scores.len(), arms.len());
        for arm_id in arms.keys() {
            prop_assert!(scores.contains(arm_id));
        }
        prop_assert_eq!(scores.best().is_some(), !arms.is_empty());
    }

    /// Property: Thompson scores are valid probabilities
    #[test]
    fn prop_thompson_scores_are_probabilities(arms in arb_arms(), seed in any::<u64>()) {
        let scorer = BanditScorer::new(ScoringPolicy::ThompsonSampling).unwrap();
        let scores = scorer.score(&arms, 0, &mut RandomSource::seeded(seed)).unwrap();
        for (_, score) in scores.iter() {
            prop_assert!(score > 0.0 && score < 1.0);
        }
    }

    /// Property: Validation accepts exactly rewards <= turns
    #[test]
    fn prop_validation_boundary(turns in 0u64..1_000, rewards in 0u64..1_000) {
        let counts = ArmCounts::new(turns, rewards);
        prop_assert_eq!(counts.validate("arm").is_ok(), rewards <= turns);
    }

    /// Property: The best arm holds the maximal score
    #[test]
    fn prop_best_is_maximal(
        scores in proptest::collection::btree_map("[a-z]{1,4}", 0.0f64..1.0, 1..16)
    ) {
        let set: ScoreSet = scores.clone().into_iter().collect();
        let best = set.best().unwrap();
        let best_score = scores[best];
        prop_assert!(scores.values().all(|score| *score <= best_score));
    }
}
