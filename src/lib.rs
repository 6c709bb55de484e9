//! # bandit-engine: Multi-Armed Bandit Scoring for A/B Experiments
//!
//! **Version**: 0.1.0
//!
//! bandit-engine turns per-arm turn/reward counters into scores and picks the
//! arm to show next. Two policies are available:
//!
//! - **Thompson Sampling** (default): one draw per arm from its
//!   Beta(rewards + 1, failures + 1) posterior. Beta draws are built from two
//!   Marsaglia-Tsang Gamma draws.
//! - **UCB1**: mean reward plus a `sqrt(alpha * ln(N) / n)` exploration bonus.
//!
//! ## Layers
//!
//! - [`sampling`]: uniform / normal / Gamma / Beta variates
//! - [`scorer`]: policies, [`ScoreSet`], best-arm selection
//! - [`store`]: counter store trait and in-memory implementation
//! - [`registry`]: experiment ownership and display names
//! - [`ExperimentCoordinator`]: cold start, recency windows, score events
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bandit_engine::store::MemoryArmStatsStore;
//! use bandit_engine::{CoordinatorConfig, ExperimentCoordinator};
//!
//! # async fn example() -> bandit_engine::Result<()> {
//! let coordinator = ExperimentCoordinator::new(
//!     Arc::new(MemoryArmStatsStore::new()),
//!     CoordinatorConfig::default(),
//! )?;
//!
//! let scores = coordinator
//!     .score_arms("newsletter-cta", &["subscribe", "join", "sign-up"], None)
//!     .await?;
//! if let Some(arm) = coordinator.select_best(&scores) {
//!     coordinator.record_turn("newsletter-cta", arm).await?;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod registry;
pub mod report;
pub mod sampling;
pub mod scorer;
pub mod store;

pub use config::CoordinatorConfig;
pub use coordinator::ExperimentCoordinator;
pub use error::{Error, Result};
pub use scorer::{select_best, ScoreSet, ScoringPolicy};
