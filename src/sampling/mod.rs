//! Random variate generation for the bandit scorers
//!
//! ```text
//! RandomSource ──> Gamma (Marsaglia-Tsang) ──> Beta (Gamma ratio)
//! ```
//!
//! All samplers take `&mut RandomSource<R>` explicitly; nothing in this
//! module holds global state.
//!
//! ## Usage
//!
//! ```rust
//! use bandit_engine::sampling::{Beta, RandomSource};
//!
//! # fn example() -> bandit_engine::Result<()> {
//! let mut rng = RandomSource::seeded(7);
//! let posterior = Beta::new(4.0, 2.0)?;
//! let draw = posterior.sample(&mut rng)?;
//! assert!(draw > 0.0 && draw < 1.0);
//! # Ok(())
//! # }
//! ```

mod beta;
mod gamma;
mod random;

pub use beta::Beta;
pub use gamma::Gamma;
pub use random::RandomSource;
