//! Operator traits
//!
//! This module defines the mutation operator trait shared by both populations.

use crate::error::OperatorError;
use crate::genome::traits::Chromosome;
use crate::random::RandomSource;

/// Mutation operator trait
///
/// Applies an independent per-gene Bernoulli trial with probability `rate`
/// and rewrites the genes that succeed. This is not a fixed mutation count.
pub trait MutationOperator<G: Chromosome>: Send + Sync {
    /// Apply mutation to a genome in place
    ///
    /// Returns the number of genes that were rewritten.
    fn mutate<R: RandomSource>(
        &self,
        genome: &mut G,
        rate: f64,
        rng: &mut R,
    ) -> Result<usize, OperatorError>;
}
