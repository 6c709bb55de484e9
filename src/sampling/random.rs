//! Uniform and standard-normal draws on top of any `RngCore`.

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::Result;

/// Bits of randomness mapped into each uniform draw (f64 mantissa width).
const UNIFORM_BITS: u32 = 53;

/// `2^53`, exactly representable as f64.
#[allow(clippy::cast_precision_loss)]
const UNIFORM_SCALE: f64 = (1u64 << UNIFORM_BITS) as f64;

/// Random source for the samplers.
///
/// Produces Uniform(0,1) on the open interval and standard normals via the
/// polar Box-Muller method. Each accepted Box-Muller pair yields two normals;
/// the second one is kept in `spare_normal` and handed out on the next call.
///
/// The spare lives in the instance, so one `RandomSource` per call sequence
/// (or per task) keeps concurrent callers fully isolated.
///
/// # Example
///
/// ```rust
/// use bandit_engine::sampling::RandomSource;
///
/// # fn example() -> bandit_engine::Result<()> {
/// let mut rng = RandomSource::seeded(42);
/// let u = rng.uniform()?;
/// assert!(u > 0.0 && u < 1.0);
/// let _z = rng.standard_normal()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RandomSource<R = OsRng> {
    rng: R,
    spare_normal: Option<f64>,
}

impl RandomSource<OsRng> {
    /// Random source backed by operating-system entropy.
    #[must_use]
    pub const fn os() -> Self {
        Self::new(OsRng)
    }
}

impl RandomSource<StdRng> {
    /// Reproducible random source seeded from a 64-bit value.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RandomSource<R> {
    /// Wrap an arbitrary generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self {
            rng,
            spare_normal: None,
        }
    }

    /// Draw from Uniform(0,1), never returning exactly 0.0 or 1.0.
    ///
    /// # Errors
    ///
    /// Returns `Error::Entropy` if the underlying generator fails.
    pub fn uniform(&mut self) -> Result<f64> {
        loop {
            let mut buf = [0u8; 8];
            self.rng.try_fill_bytes(&mut buf)?;
            let bits = u64::from_le_bytes(buf) >> (64 - UNIFORM_BITS);
            if bits != 0 {
                #[allow(clippy::cast_precision_loss)]
                return Ok(bits as f64 / UNIFORM_SCALE);
            }
        }
    }

    /// Draw from the standard normal distribution N(0,1).
    ///
    /// # Errors
    ///
    /// Returns `Error::Entropy` if the underlying generator fails.
    pub fn standard_normal(&mut self) -> Result<f64> {
        if let Some(z) = self.spare_normal.take() {
            return Ok(z);
        }

        loop {
            let u1 = 2.0f64.mul_add(self.uniform()?, -1.0);
            let u2 = 2.0f64.mul_add(self.uniform()?, -1.0);
            let s = u1.mul_add(u1, u2 * u2);
            if s > 0.0 && s < 1.0 {
                let factor = (-2.0 * s.ln() / s).sqrt();
                self.spare_normal = Some(u1 * factor);
                return Ok(u2 * factor);
            }
        }
    }

    /// Whether a cached normal is waiting to be returned.
    #[must_use]
    pub const fn has_spare_normal(&self) -> bool {
        self.spare_normal.is_some()
    }

    /// Consume the source, returning the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}
