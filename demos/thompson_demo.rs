//! Simulated button-copy experiment
//!
//! Three arms with hidden conversion rates; each round the coordinator picks
//! an arm, the simulated visitor converts with that arm's true probability,
//! and the outcome is recorded. Traffic should concentrate on the best arm.
//!
//! Run with: RUST_LOG=bandit_engine=info cargo run --example thompson_demo

use std::sync::Arc;

use anyhow::Context;
use bandit_engine::registry::ExperimentRegistry;
use bandit_engine::store::MemoryArmStatsStore;
use bandit_engine::{CoordinatorConfig, ExperimentCoordinator, ScoringPolicy};
use rand::Rng;
use tracing_subscriber::EnvFilter;

const EXPERIMENT: &str = "signup-button";
const ROUNDS: usize = 2_000;
const ARMS: [(&str, f64); 3] = [("join", 0.04), ("subscribe", 0.06), ("get-started", 0.09)];

async fn run(policy: ScoringPolicy) -> anyhow::Result<()> {
    let registry = Arc::new(ExperimentRegistry::new());
    registry.register(EXPERIMENT, "growth", Some("Signup button copy"))?;

    let config = CoordinatorConfig::builder().policy(policy).build()?;
    let coordinator = ExperimentCoordinator::new(Arc::new(MemoryArmStatsStore::new()), config)?
        .with_registry(registry);

    let arm_ids: Vec<&str> = ARMS.iter().map(|(arm_id, _)| *arm_id).collect();
    let mut visitors = rand::thread_rng();

    for _ in 0..ROUNDS {
        let scores = coordinator.score_arms(EXPERIMENT, &arm_ids, None).await?;
        let shown = coordinator
            .select_best(&scores)
            .context("no arm to show")?
            .to_string();
        coordinator.record_turn(EXPERIMENT, &shown).await?;

        let rate = ARMS
            .iter()
            .find(|(arm_id, _)| *arm_id == shown)
            .map_or(0.0, |(_, rate)| *rate);
        if visitors.gen_bool(rate) {
            coordinator.record_reward(EXPERIMENT, &shown).await?;
        }
    }

    let report = coordinator.report(EXPERIMENT).await?;
    println!("\n=== {} ({}) ===", report.name.as_deref().unwrap_or(EXPERIMENT), policy.as_str());
    println!("{:<14} {:>6} {:>8} {:>8}", "arm", "turns", "rewards", "rate");
    for arm in &report.arms {
        println!(
            "{:<14} {:>6} {:>8} {:>8.4}",
            arm.arm_id, arm.turns, arm.rewards, arm.success_rate
        );
    }
    if let Some(leader) = report.leader() {
        println!("leader: {}", leader.arm_id);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    run(ScoringPolicy::ThompsonSampling).await?;
    run(ScoringPolicy::ucb1()).await?;
    Ok(())
}
