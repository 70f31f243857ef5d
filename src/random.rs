//! Randomness source
//!
//! Both populations consume randomness through [`RandomSource`], which is
//! implemented for every [`rand::Rng`]. Seed a [`StdRng`] for reproducible runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SamplingError;

/// Uniform source of randomness used by crossover and mutation
///
/// During crossover the caller's source supplies only the per-slot draws:
/// parents, cut points and one seed. The mutation coin flips for a slot come
/// from a [`StdRng`] seeded with that slot's seed, so a custom source
/// controls them only through the seeds it hands out.
pub trait RandomSource {
    /// Sample an index uniformly from `[0, n)`
    fn sample_index(&mut self, n: usize) -> Result<usize, SamplingError>;

    /// Sample a float uniformly from `[0, 1)`
    fn sample_unit(&mut self) -> f64;

    /// Sample a fresh seed for an independent sub-stream
    fn sample_seed(&mut self) -> u64;

    /// Bernoulli trial with success probability `p`
    fn sample_bool(&mut self, p: f64) -> Result<bool, SamplingError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(SamplingError::InvalidProbability(p));
        }
        Ok(self.sample_unit() < p)
    }
}

impl<R: Rng> RandomSource for R {
    fn sample_index(&mut self, n: usize) -> Result<usize, SamplingError> {
        if n == 0 {
            return Err(SamplingError::EmptyRange { upper: n });
        }
        Ok(self.gen_range(0..n))
    }

    fn sample_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn sample_seed(&mut self) -> u64 {
        self.gen::<u64>()
    }
}

/// Create a seeded RNG for reproducible runs
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derive the RNG for one sub-stream from a sampled seed
pub(crate) fn substream(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_index_in_range() {
        let mut rng = seeded_rng(7);
        for _ in 0..1000 {
            let i = rng.sample_index(5).unwrap();
            assert!(i < 5);
        }
    }

    #[test]
    fn test_sample_index_empty_range() {
        let mut rng = seeded_rng(7);
        assert_eq!(
            rng.sample_index(0),
            Err(SamplingError::EmptyRange { upper: 0 })
        );
    }

    #[test]
    fn test_sample_unit_in_range() {
        let mut rng = seeded_rng(11);
        for _ in 0..1000 {
            let u = rng.sample_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_sample_bool_extremes() {
        let mut rng = seeded_rng(3);
        assert!(!rng.sample_bool(0.0).unwrap());
        assert!(rng.sample_bool(1.0).unwrap());
        assert!(rng.sample_bool(1.5).is_err());
        assert!(rng.sample_bool(f64::NAN).is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = seeded_rng(42);
        let mut b = seeded_rng(42);
        let xs: Vec<u64> = (0..8).map(|_| a.sample_seed()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.sample_seed()).collect();
        assert_eq!(xs, ys);
    }
}
