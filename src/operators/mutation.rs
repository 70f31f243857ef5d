//! Mutation operators
//!
//! Bit-flip mutation for partial genomes and reference resampling for whole
//! genomes.

use crate::error::OperatorError;
use crate::genome::bit_string::BitString;
use crate::genome::reference::{PartialRef, ReferenceChromosome};
use crate::genome::traits::Chromosome;
use crate::operators::traits::MutationOperator;
use crate::random::RandomSource;

/// Bit-flip mutation
///
/// Each bit flips independently with probability `rate`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitFlipMutation;

impl BitFlipMutation {
    pub fn new() -> Self {
        Self
    }
}

impl MutationOperator<BitString> for BitFlipMutation {
    fn mutate<R: RandomSource>(
        &self,
        genome: &mut BitString,
        rate: f64,
        rng: &mut R,
    ) -> Result<usize, OperatorError> {
        let mut flipped = 0;
        for bit in genome.genes_mut() {
            if rng.sample_bool(rate)? {
                *bit = !*bit;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

/// Reference resampling mutation
///
/// Each slot is replaced, with probability `rate`, by a handle to a member
/// of the partial population sampled uniformly with replacement. The
/// operator only needs the population's size and layout version, so it can
/// be shared across worker threads while the partial population is borrowed.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceResampling {
    population_len: usize,
    version: u64,
}

impl ReferenceResampling {
    /// Resample from a partial population of `population_len` members at `version`
    pub fn new(population_len: usize, version: u64) -> Self {
        Self {
            population_len,
            version,
        }
    }

    /// Draw one fresh handle
    pub fn sample<R: RandomSource>(&self, rng: &mut R) -> Result<PartialRef, OperatorError> {
        let index = rng.sample_index(self.population_len)?;
        Ok(PartialRef::new(index, self.version))
    }
}

impl MutationOperator<ReferenceChromosome> for ReferenceResampling {
    fn mutate<R: RandomSource>(
        &self,
        genome: &mut ReferenceChromosome,
        rate: f64,
        rng: &mut R,
    ) -> Result<usize, OperatorError> {
        let mut replaced = 0;
        for slot in genome.genes_mut() {
            if rng.sample_bool(rate)? {
                *slot = self.sample(rng)?;
                replaced += 1;
            }
        }
        Ok(replaced)
    }
}
