//! Individual wrapper type
//!
//! This module provides the Individual type that wraps a genome with its
//! fitness and its own per-gene mutation rate. Fitness is minimized; the
//! unevaluated state is the [`UNEVALUATED`] sentinel.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::genome::bit_string::BitString;
use crate::genome::reference::ReferenceChromosome;
use crate::genome::traits::Chromosome;

/// Fitness sentinel for individuals that have not been scored
pub const UNEVALUATED: f64 = f64::INFINITY;

/// An individual in either population
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual<G> {
    genome: G,
    fitness: f64,
    mutation_rate: f64,
}

/// Individual of the partial population
pub type PartialIndividual = Individual<BitString>;

/// Individual of the whole population
pub type WholeIndividual = Individual<ReferenceChromosome>;

impl<G: Chromosome> Individual<G> {
    /// Create a new, unevaluated individual
    pub fn new(genome: G, mutation_rate: f64) -> Self {
        Self {
            genome,
            fitness: UNEVALUATED,
            mutation_rate,
        }
    }

    /// Create an individual with a known fitness
    pub fn with_fitness(genome: G, mutation_rate: f64, fitness: f64) -> Self {
        Self {
            genome,
            fitness,
            mutation_rate,
        }
    }

    /// Get a reference to the genome
    pub fn genome(&self) -> &G {
        &self.genome
    }

    pub(crate) fn genome_mut(&mut self) -> &mut G {
        &mut self.genome
    }

    /// Current fitness (lower is better)
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Set the fitness value
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Return to the unevaluated state
    pub fn reset_fitness(&mut self) {
        self.fitness = UNEVALUATED;
    }

    /// Check if this individual has been evaluated
    pub fn is_evaluated(&self) -> bool {
        self.fitness != UNEVALUATED
    }

    /// Per-gene mutation probability
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Chromosome length
    pub fn len(&self) -> usize {
        self.genome.len()
    }

    /// Check if the chromosome is empty
    pub fn is_empty(&self) -> bool {
        self.genome.is_empty()
    }

    /// Check if this individual is strictly better than another
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.fitness < other.fitness
    }

    /// Ordering by fitness, best first, NaN last
    pub fn fitness_cmp(&self, other: &Self) -> Ordering {
        compare_fitness(self.fitness, other.fitness)
    }
}

/// Ascending fitness order with NaN sorted after everything else
pub(crate) fn compare_fitness(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}
