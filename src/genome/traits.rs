//! Core genome traits
//!
//! This module defines the `Chromosome` trait shared by partial genomes
//! (bit strings) and whole genomes (reference chromosomes). The crossover
//! engine only ever splices gene slots, so it is written once against this
//! trait and reused by both populations.

use std::fmt::Debug;

/// A fixed-length sequence of genes
///
/// Chromosome length is fixed at construction. Crossover and mutation
/// rewrite gene slots in place through [`Chromosome::genes_mut`], which
/// hands out a slice, so the length can never change.
pub trait Chromosome: Clone + Debug + Send + Sync {
    /// The gene type stored in each slot
    type Gene: Clone + Debug + PartialEq + Send + Sync;

    /// Get the genes as a slice
    fn genes(&self) -> &[Self::Gene];

    /// Get the genes as a mutable slice
    fn genes_mut(&mut self) -> &mut [Self::Gene];

    /// Chromosome length
    fn len(&self) -> usize {
        self.genes().len()
    }

    /// Check whether the chromosome has no genes
    fn is_empty(&self) -> bool {
        self.genes().is_empty()
    }
}
