//! Whole population
//!
//! Composite individuals whose genes are handles into a [`PartialPopulation`].
//! The whole population never owns the partial population; every operation
//! that needs it borrows it for the duration of the call.

use tracing::debug;

use crate::config::PopulationConfig;
use crate::error::{CoevoResult, ConfigurationError, OperatorError, ReferenceError};
use crate::genome::reference::ReferenceChromosome;
use crate::genome::traits::Chromosome;
use crate::operators::traits::MutationOperator;
use crate::population::individual::WholeIndividual;
use crate::population::partial::{PartialPopulation, Reordering};
use crate::population::population::{CrossoverSummary, Population};
use crate::random::RandomSource;

/// Fixed-size population of reference chromosomes
#[derive(Clone, Debug)]
pub struct WholePopulation {
    population: Population<ReferenceChromosome>,
    chrom_len: usize,
}

impl WholePopulation {
    /// Build `pop_size` individuals, each sampling `chrom_len` handles
    /// uniformly with replacement from `partial`
    pub fn new<R: RandomSource>(
        config: &PopulationConfig,
        partial: &PartialPopulation,
        rng: &mut R,
    ) -> CoevoResult<Self> {
        config.validate("whole")?;
        let mut individuals = Vec::with_capacity(config.pop_size);
        for _ in 0..config.pop_size {
            let refs = (0..config.chrom_len)
                .map(|_| partial.sample_ref(rng))
                .collect::<Result<Vec<_>, _>>()?;
            individuals.push(WholeIndividual::new(
                ReferenceChromosome::new(refs),
                config.mutation_rate,
            ));
        }

        Ok(Self {
            population: Population::from_individuals(individuals, config.crossover_rate),
            chrom_len: config.chrom_len,
        })
    }

    /// Assemble a population from existing individuals, checking every
    /// handle against `partial`
    pub fn from_individuals(
        individuals: Vec<WholeIndividual>,
        crossover_rate: f64,
        partial: &PartialPopulation,
    ) -> CoevoResult<Self> {
        let chrom_len = individuals.first().map_or(0, |i| i.len());
        PopulationConfig::new(
            individuals.len(),
            chrom_len,
            individuals.first().map_or(0.0, |i| i.mutation_rate()),
            crossover_rate,
        )
        .validate("whole")?;
        if let Some(odd) = individuals.iter().find(|i| i.len() != chrom_len) {
            return Err(ConfigurationError::ChromosomeLengthMismatch {
                population: "whole",
                expected: chrom_len,
                actual: odd.len(),
            }
            .into());
        }

        let whole = Self {
            population: Population::from_individuals(individuals, crossover_rate),
            chrom_len,
        };
        whole.validate_references(partial)?;
        Ok(whole)
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.population.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Gene slots per chromosome
    pub fn chrom_len(&self) -> usize {
        self.chrom_len
    }

    /// Fraction of the population replaced each generation
    pub fn crossover_rate(&self) -> f64 {
        self.population.crossover_rate()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&WholeIndividual> {
        self.population.get(index)
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> std::slice::Iter<'_, WholeIndividual> {
        self.population.iter()
    }

    /// Get the individuals
    pub fn individuals(&self) -> &[WholeIndividual] {
        self.population.individuals()
    }

    /// Mutable access for evaluators
    ///
    /// Fitness can be set and individuals reordered; the population size
    /// and the genes themselves cannot be changed through this slice.
    pub fn individuals_mut(&mut self) -> &mut [WholeIndividual] {
        self.population.individuals_mut()
    }

    /// The underlying generic population
    pub fn population(&self) -> &Population<ReferenceChromosome> {
        &self.population
    }

    /// Two-point crossover with elitism; mutation resamples from `partial`
    pub fn crossover<R: RandomSource>(
        &mut self,
        partial: &PartialPopulation,
        rng: &mut R,
    ) -> Result<CrossoverSummary, OperatorError> {
        let summary = self.population.crossover(&partial.resampler(), rng)?;
        debug!(
            offspring = summary.offspring,
            resampled_refs = summary.mutated_genes,
            "whole population crossover"
        );
        Ok(summary)
    }

    /// Replace each gene of `individual`, with its own mutation probability,
    /// by a fresh handle into `partial`
    pub fn mutate<R: RandomSource>(
        individual: &mut WholeIndividual,
        partial: &PartialPopulation,
        rng: &mut R,
    ) -> Result<usize, OperatorError> {
        let rate = individual.mutation_rate();
        partial.resampler().mutate(individual.genome_mut(), rate, rng)
    }

    /// Set every fitness to the unevaluated sentinel
    pub fn reset_fitness(&mut self) {
        self.population.reset_fitness();
    }

    /// Stable sort by fitness, best first
    pub fn sort_by_fitness(&mut self) {
        self.population.sort_by_fitness();
    }

    /// Rewrite every handle after the partial population moved its members
    ///
    /// Either every handle is remapped or, on error, none is.
    pub fn remap_references(&mut self, reordering: &Reordering) -> Result<(), ReferenceError> {
        let remapped = self
            .iter()
            .map(|individual| {
                individual
                    .genome()
                    .iter()
                    .map(|&handle| reordering.remap(handle))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (individual, refs) in self.population.iter_mut().zip(remapped) {
            individual.genome_mut().genes_mut().copy_from_slice(&refs);
        }
        Ok(())
    }

    /// Check that every handle resolves to a live member of `partial`
    pub fn validate_references(&self, partial: &PartialPopulation) -> Result<(), ReferenceError> {
        self.iter()
            .flat_map(|individual| individual.genome().iter())
            .try_for_each(|&handle| partial.check(handle))
    }

    /// Get the best individual (lowest fitness)
    pub fn best(&self) -> Option<&WholeIndividual> {
        self.population.best()
    }

    /// Compute mean fitness over evaluated individuals
    pub fn mean_fitness(&self) -> Option<f64> {
        self.population.mean_fitness()
    }
}

impl std::ops::Index<usize> for WholePopulation {
    type Output = WholeIndividual;

    fn index(&self, index: usize) -> &Self::Output {
        &self.population[index]
    }
}

impl<'a> IntoIterator for &'a WholePopulation {
    type Item = &'a WholeIndividual;
    type IntoIter = std::slice::Iter<'a, WholeIndividual>;

    fn into_iter(self) -> Self::IntoIter {
        self.population.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::reference::PartialRef;
    use crate::random::seeded_rng;

    fn partial_population(seed: u64) -> PartialPopulation {
        let config = PopulationConfig::new(12, 6, 0.1, 0.75);
        PartialPopulation::new(&config, &mut seeded_rng(seed)).unwrap()
    }

    #[test]
    fn test_whole_population_new_resolves() {
        let partial = partial_population(1);
        let config = PopulationConfig::new(8, 5, 0.05, 0.9);
        let whole = WholePopulation::new(&config, &partial, &mut seeded_rng(2)).unwrap();

        assert_eq!(whole.len(), 8);
        assert!(whole.iter().all(|w| w.len() == 5 && !w.is_evaluated()));
        assert!(whole.validate_references(&partial).is_ok());
    }

    #[test]
    fn test_whole_population_rejects_small_size() {
        let partial = partial_population(1);
        let config = PopulationConfig::new(2, 5, 0.05, 0.9);
        assert!(WholePopulation::new(&config, &partial, &mut seeded_rng(2)).is_err());
    }

    #[test]
    fn test_crossover_keeps_references_live() {
        let partial = partial_population(3);
        let config = PopulationConfig::new(16, 7, 0.5, 1.0);
        let mut whole = WholePopulation::new(&config, &partial, &mut seeded_rng(4)).unwrap();
        let mut rng = seeded_rng(5);
        for _ in 0..10 {
            whole.crossover(&partial, &mut rng).unwrap();
            assert_eq!(whole.len(), 16);
            assert!(whole.iter().all(|w| w.len() == 7));
            assert!(whole.validate_references(&partial).is_ok());
        }
    }

    #[test]
    fn test_mutate_full_rate_resamples_everything() {
        let partial = partial_population(6);
        let mut individual =
            WholeIndividual::new(ReferenceChromosome::new(vec![PartialRef::new(0, 0); 30]), 1.0);
        let replaced = WholePopulation::mutate(&mut individual, &partial, &mut seeded_rng(7)).unwrap();
        assert_eq!(replaced, 30);
        assert!(individual.genome().iter().all(|r| partial.check(*r).is_ok()));
    }

    #[test]
    fn test_remap_follows_partial_sort() {
        let mut partial = partial_population(8);
        for i in 0..partial.len() {
            partial.set_fitness(i, (partial.len() - i) as f64).unwrap();
        }
        let config = PopulationConfig::new(8, 4, 0.0, 0.5);
        let mut whole = WholePopulation::new(&config, &partial, &mut seeded_rng(9)).unwrap();
        let genomes_before: Vec<Vec<_>> = whole
            .iter()
            .map(|w| {
                w.genome()
                    .iter()
                    .map(|&r| partial.resolve(r).unwrap().genome().clone())
                    .collect()
            })
            .collect();

        let reordering = partial.sort_by_fitness();
        assert!(whole.validate_references(&partial).is_err());

        whole.remap_references(&reordering).unwrap();
        assert!(whole.validate_references(&partial).is_ok());

        let genomes_after: Vec<Vec<_>> = whole
            .iter()
            .map(|w| {
                w.genome()
                    .iter()
                    .map(|&r| partial.resolve(r).unwrap().genome().clone())
                    .collect()
            })
            .collect();
        assert_eq!(genomes_before, genomes_after);
    }

    #[test]
    fn test_remap_rejects_stale_handles() {
        let mut partial = partial_population(10);
        let config = PopulationConfig::new(8, 4, 0.0, 0.5);
        let mut whole = WholePopulation::new(&config, &partial, &mut seeded_rng(11)).unwrap();
        let first = partial.sort_by_fitness();
        let second = partial.sort_by_fitness();

        assert!(matches!(
            whole.remap_references(&second),
            Err(ReferenceError::Stale { .. })
        ));
        assert!(whole.iter().all(|w| w.genome().iter().all(|r| r.version() == 0)));

        whole.remap_references(&first).unwrap();
        whole.remap_references(&second).unwrap();
        assert!(whole.validate_references(&partial).is_ok());
    }

    #[test]
    fn test_from_individuals_rejects_dangling() {
        let partial = partial_population(12);
        let individuals = (0..4)
            .map(|_| {
                WholeIndividual::new(ReferenceChromosome::new(vec![PartialRef::new(99, 0)]), 0.1)
            })
            .collect();
        assert!(WholePopulation::from_individuals(individuals, 0.5, &partial).is_err());
    }
}
