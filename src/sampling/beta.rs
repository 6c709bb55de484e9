//! Beta(α, β) sampling from two Gamma draws.

use rand::RngCore;

use super::{Gamma, RandomSource};
use crate::{Error, Result};

/// Beta distribution, sampled as `X / (X + Y)` with `X ~ Gamma(α)` and
/// `Y ~ Gamma(β)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beta {
    x: Gamma,
    y: Gamma,
}

impl Beta {
    /// Create a Beta(α, β) distribution.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` unless both parameters are finite and
    /// positive.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        let x = Gamma::new(alpha).map_err(|_| {
            Error::InvalidArgument(format!("beta alpha must be finite and positive, got {alpha}"))
        })?;
        let y = Gamma::new(beta).map_err(|_| {
            Error::InvalidArgument(format!("beta beta must be finite and positive, got {beta}"))
        })?;
        Ok(Self { x, y })
    }

    /// α parameter.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.x.shape()
    }

    /// β parameter.
    #[must_use]
    pub const fn beta(&self) -> f64 {
        self.y.shape()
    }

    /// Distribution mean `α / (α + β)`.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.alpha() / (self.alpha() + self.beta())
    }

    /// Draw one sample in the open interval `(0, 1)`.
    ///
    /// `X / (X + Y)` is evaluated as `1 / (1 + exp(ln Y - ln X))` so tiny
    /// shapes cannot underflow both draws; results that still round to an
    /// endpoint are clamped to the nearest representable interior value.
    ///
    /// # Errors
    ///
    /// Propagates entropy failures from `rng`.
    pub fn sample<R: RngCore>(&self, rng: &mut RandomSource<R>) -> Result<f64> {
        let ln_x = self.x.ln_sample(rng)?;
        let ln_y = self.y.ln_sample(rng)?;
        let ratio = 1.0 / (1.0 + (ln_y - ln_x).exp());
        Ok(ratio.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON / 2.0))
    }
}
