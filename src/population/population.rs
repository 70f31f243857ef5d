//! Population type
//!
//! This module provides the fixed-size Population container and the
//! generational crossover engine shared by the partial and whole populations.
//! The two differ only in their genome type and mutation operator.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::OperatorError;
use crate::genome::traits::Chromosome;
use crate::operators::crossover::{CrossoverPlan, TwoPointCrossover};
use crate::operators::traits::MutationOperator;
use crate::population::individual::{compare_fitness, Individual};
use crate::random::{substream, RandomSource};

/// Smallest population for which the best quartile is non-empty
pub const MIN_POPULATION_SIZE: usize = 4;

/// Outcome of one crossover pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CrossoverSummary {
    /// Number of slots overwritten with offspring
    pub offspring: usize,
    /// Number of genes rewritten by mutation across all offspring
    pub mutated_genes: usize,
}

/// A fixed-size population of individuals
///
/// The size is fixed for the lifetime of the population: crossover rewrites
/// genomes in place and callers only ever receive slices.
#[derive(Clone, Debug)]
pub struct Population<G> {
    individuals: Vec<Individual<G>>,
    crossover_rate: f64,
}

impl<G: Chromosome> Population<G> {
    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual<G>>, crossover_rate: f64) -> Self {
        Self {
            individuals,
            crossover_rate,
        }
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Fraction of the population replaced each generation
    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&Individual<G>> {
        self.individuals.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Individual<G>> {
        self.individuals.get_mut(index)
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> std::slice::Iter<'_, Individual<G>> {
        self.individuals.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Individual<G>> {
        self.individuals.iter_mut()
    }

    /// Get the individuals
    pub fn individuals(&self) -> &[Individual<G>] {
        &self.individuals
    }

    pub(crate) fn individuals_mut(&mut self) -> &mut [Individual<G>] {
        &mut self.individuals
    }

    /// Number of leading individuals left untouched by crossover
    ///
    /// `⌊len · (1 − crossover_rate)⌋`, computed in floating point.
    pub fn elite_count(&self) -> usize {
        let elite = (self.len() as f64 * (1.0 - self.crossover_rate)).floor();
        (elite.max(0.0) as usize).min(self.len())
    }

    /// Size of the best quartile parents are drawn from
    pub fn parent_pool_size(&self) -> usize {
        self.len() / 4
    }

    /// Set every fitness to the unevaluated sentinel
    pub fn reset_fitness(&mut self) {
        for individual in &mut self.individuals {
            individual.reset_fitness();
        }
    }

    /// Get the best individual (lowest fitness)
    pub fn best(&self) -> Option<&Individual<G>> {
        self.individuals
            .iter()
            .filter(|i| i.is_evaluated())
            .min_by(|a, b| a.fitness_cmp(b))
    }

    /// Compute mean fitness over evaluated individuals
    pub fn mean_fitness(&self) -> Option<f64> {
        let evaluated: Vec<f64> = self
            .individuals
            .iter()
            .filter(|i| i.is_evaluated())
            .map(|i| i.fitness())
            .collect();

        if evaluated.is_empty() {
            None
        } else {
            Some(evaluated.iter().sum::<f64>() / evaluated.len() as f64)
        }
    }

    /// Stable sort by fitness, best first
    ///
    /// Returns the previous index of each individual in its new position.
    pub fn sort_by_fitness(&mut self) -> Vec<usize> {
        let mut tagged: Vec<(usize, Individual<G>)> = std::mem::take(&mut self.individuals)
            .into_iter()
            .enumerate()
            .collect();
        tagged.sort_by(|a, b| compare_fitness(a.1.fitness(), b.1.fitness()));

        let order = tagged.iter().map(|(old, _)| *old).collect();
        self.individuals = tagged.into_iter().map(|(_, ind)| ind).collect();
        order
    }

    /// Replace every non-elite slot with a mutated two-point offspring
    ///
    /// All draws happen up front in slot order: two parents from the best
    /// quartile, two cut points, and one seed for the slot's mutation stream.
    /// Parents are read from a snapshot of the best quartile, so every
    /// offspring is bred from the previous generation even when the elite
    /// boundary falls inside the quartile.
    pub fn crossover<M, R>(
        &mut self,
        mutation: &M,
        rng: &mut R,
    ) -> Result<CrossoverSummary, OperatorError>
    where
        M: MutationOperator<G>,
        R: RandomSource,
    {
        let elite = self.elite_count();
        let pool = self.parent_pool_size();
        let chrom_len = self.individuals.first().map_or(0, |i| i.len());

        let plans = (elite..self.len())
            .map(|_| CrossoverPlan::sample(pool, chrom_len, rng))
            .collect::<Result<Vec<_>, _>>()?;
        if plans.is_empty() {
            return Ok(CrossoverSummary::default());
        }

        let parents: Vec<G> = self.individuals[..pool]
            .iter()
            .map(|i| i.genome().clone())
            .collect();
        let offspring = &mut self.individuals[elite..];

        #[cfg(feature = "parallel")]
        let mutated_genes = offspring
            .par_iter_mut()
            .zip(plans.par_iter())
            .map(|(slot, plan)| breed(slot, &parents, plan, mutation))
            .try_reduce(|| 0, |a, b| Ok(a + b))?;

        #[cfg(not(feature = "parallel"))]
        let mutated_genes = offspring
            .iter_mut()
            .zip(plans.iter())
            .map(|(slot, plan)| breed(slot, &parents, plan, mutation))
            .sum::<Result<usize, _>>()?;

        Ok(CrossoverSummary {
            offspring: plans.len(),
            mutated_genes,
        })
    }
}

/// Overwrite one slot with the offspring described by `plan`, then mutate it
fn breed<G, M>(
    slot: &mut Individual<G>,
    parents: &[G],
    plan: &CrossoverPlan,
    mutation: &M,
) -> Result<usize, OperatorError>
where
    G: Chromosome,
    M: MutationOperator<G>,
{
    let rate = slot.mutation_rate();
    TwoPointCrossover::splice_into(
        slot.genome_mut().genes_mut(),
        parents[plan.parent_a].genes(),
        parents[plan.parent_b].genes(),
        plan.cut1,
        plan.cut2,
    )?;

    let mut rng = substream(plan.seed);
    mutation.mutate(slot.genome_mut(), rate, &mut rng)
}

impl<G: Chromosome> std::ops::Index<usize> for Population<G> {
    type Output = Individual<G>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl<'a, G> IntoIterator for &'a Population<G> {
    type Item = &'a Individual<G>;
    type IntoIter = std::slice::Iter<'a, Individual<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}
