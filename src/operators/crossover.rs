//! Crossover operators
//!
//! Two-point crossover over gene slots. The same splice serves bit genomes and
//! reference genomes, since it only moves whole slots between arrays of equal
//! length.

use crate::error::{OperatorError, SamplingError};
use crate::random::RandomSource;

/// Two-point crossover with parent A dominant outside the cut window
///
/// The offspring is `a[..lo] ++ b[lo..hi] ++ a[hi..]` where `lo`/`hi` are the
/// order-normalized cut points. Equal cut points yield a copy of parent A.
#[derive(Clone, Copy, Debug, Default)]
pub struct TwoPointCrossover;

impl TwoPointCrossover {
    /// Order the two cut points as `(lo, hi)`
    pub fn normalize_cuts(cut1: usize, cut2: usize) -> (usize, usize) {
        if cut1 > cut2 {
            (cut2, cut1)
        } else {
            (cut1, cut2)
        }
    }

    /// Write the offspring of `parent_a` and `parent_b` into `offspring`
    ///
    /// All three slices must have the same length; no reallocation happens.
    pub fn splice_into<T: Clone>(
        offspring: &mut [T],
        parent_a: &[T],
        parent_b: &[T],
        cut1: usize,
        cut2: usize,
    ) -> Result<(), OperatorError> {
        let len = parent_a.len();
        for other in [parent_b.len(), offspring.len()] {
            if other != len {
                return Err(OperatorError::DimensionMismatch {
                    expected: len,
                    actual: other,
                });
            }
        }
        let (lo, hi) = Self::normalize_cuts(cut1, cut2);
        if hi > len {
            return Err(OperatorError::CutOutOfRange { cut: hi, len });
        }

        offspring[..lo].clone_from_slice(&parent_a[..lo]);
        offspring[lo..hi].clone_from_slice(&parent_b[lo..hi]);
        offspring[hi..].clone_from_slice(&parent_a[hi..]);
        Ok(())
    }

    /// Build a new offspring vector from two parents
    pub fn offspring<T: Clone>(
        parent_a: &[T],
        parent_b: &[T],
        cut1: usize,
        cut2: usize,
    ) -> Result<Vec<T>, OperatorError> {
        let mut child = parent_a.to_vec();
        Self::splice_into(&mut child, parent_a, parent_b, cut1, cut2)?;
        Ok(child)
    }
}

/// Random draws for breeding one offspring slot
///
/// Parents index into the best quartile, cuts into the chromosome, and
/// `seed` drives the slot's own mutation stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossoverPlan {
    pub parent_a: usize,
    pub parent_b: usize,
    pub cut1: usize,
    pub cut2: usize,
    pub seed: u64,
}

impl CrossoverPlan {
    /// Draw parents from `[0, parent_pool)` and cuts from `[0, chrom_len)`
    pub fn sample<R: RandomSource>(
        parent_pool: usize,
        chrom_len: usize,
        rng: &mut R,
    ) -> Result<Self, SamplingError> {
        let parent_a = rng.sample_index(parent_pool)?;
        let parent_b = rng.sample_index(parent_pool)?;
        let cut1 = rng.sample_index(chrom_len)?;
        let cut2 = rng.sample_index(chrom_len)?;
        Ok(Self {
            parent_a,
            parent_b,
            cut1,
            cut2,
            seed: rng.sample_seed(),
        })
    }
}
