//! Partial population
//!
//! The population of building-block bit strings. It owns every partial
//! individual exclusively; whole individuals only hold [`PartialRef`]
//! handles into it. Any operation that moves members between slots bumps
//! the layout version and reports the move as a [`Reordering`], so the whole
//! population can rewrite its handles.

use tracing::debug;

use crate::config::PopulationConfig;
use crate::error::{CoevoResult, ConfigurationError, OperatorError, ReferenceError, SamplingError};
use crate::genome::bit_string::BitString;
use crate::genome::reference::PartialRef;
use crate::operators::mutation::{BitFlipMutation, ReferenceResampling};
use crate::operators::traits::MutationOperator;
use crate::population::individual::PartialIndividual;
use crate::population::population::{CrossoverSummary, Population};
use crate::population::whole::WholePopulation;
use crate::random::RandomSource;

/// Mapping from old slots to new slots after the partial population moved members
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reordering {
    old_to_new: Vec<usize>,
    from_version: u64,
    to_version: u64,
}

impl Reordering {
    /// New slot of the member previously at `old`
    pub fn new_index(&self, old: usize) -> Option<usize> {
        self.old_to_new.get(old).copied()
    }

    /// Number of members covered
    pub fn len(&self) -> usize {
        self.old_to_new.len()
    }

    /// Check if the reordering covers no members
    pub fn is_empty(&self) -> bool {
        self.old_to_new.is_empty()
    }

    /// Layout version handles must carry to be remapped
    pub fn from_version(&self) -> u64 {
        self.from_version
    }

    /// Layout version after the move
    pub fn to_version(&self) -> u64 {
        self.to_version
    }

    /// Translate one handle taken against the old layout
    pub fn remap(&self, handle: PartialRef) -> Result<PartialRef, ReferenceError> {
        if handle.version() != self.from_version {
            return Err(ReferenceError::Stale {
                index: handle.index(),
                expected: self.from_version,
                found: handle.version(),
            });
        }
        let index = self
            .new_index(handle.index())
            .ok_or(ReferenceError::OutOfBounds {
                index: handle.index(),
                len: self.len(),
            })?;
        Ok(PartialRef::new(index, self.to_version))
    }
}

/// Fixed-size population of bit-string building blocks
#[derive(Clone, Debug)]
pub struct PartialPopulation {
    population: Population<BitString>,
    chrom_len: usize,
    version: u64,
}

impl PartialPopulation {
    /// Build `pop_size` individuals with uniformly random genomes
    pub fn new<R: RandomSource>(config: &PopulationConfig, rng: &mut R) -> CoevoResult<Self> {
        config.validate("partial")?;
        let individuals = (0..config.pop_size)
            .map(|_| {
                BitString::random(config.chrom_len, rng)
                    .map(|genome| PartialIndividual::new(genome, config.mutation_rate))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            population: Population::from_individuals(individuals, config.crossover_rate),
            chrom_len: config.chrom_len,
            version: 0,
        })
    }

    /// Assemble a population from existing individuals
    ///
    /// All genomes must share one non-zero length.
    pub fn from_individuals(
        individuals: Vec<PartialIndividual>,
        crossover_rate: f64,
    ) -> Result<Self, ConfigurationError> {
        let chrom_len = individuals.first().map_or(0, |i| i.len());
        let config = PopulationConfig::new(
            individuals.len(),
            chrom_len,
            individuals.first().map_or(0.0, |i| i.mutation_rate()),
            crossover_rate,
        );
        config.validate("partial")?;
        if let Some(odd) = individuals.iter().find(|i| i.len() != chrom_len) {
            return Err(ConfigurationError::ChromosomeLengthMismatch {
                population: "partial",
                expected: chrom_len,
                actual: odd.len(),
            });
        }

        Ok(Self {
            population: Population::from_individuals(individuals, crossover_rate),
            chrom_len,
            version: 0,
        })
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.population.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Genes per chromosome
    pub fn chrom_len(&self) -> usize {
        self.chrom_len
    }

    /// Current layout version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Fraction of the population replaced each generation
    pub fn crossover_rate(&self) -> f64 {
        self.population.crossover_rate()
    }

    /// Get an individual by slot
    pub fn get(&self, index: usize) -> Option<&PartialIndividual> {
        self.population.get(index)
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> std::slice::Iter<'_, PartialIndividual> {
        self.population.iter()
    }

    /// Get the individuals
    pub fn individuals(&self) -> &[PartialIndividual] {
        self.population.individuals()
    }

    /// The underlying generic population
    pub fn population(&self) -> &Population<BitString> {
        &self.population
    }

    /// Set the fitness of the member at `index`
    pub fn set_fitness(&mut self, index: usize, fitness: f64) -> Result<(), ReferenceError> {
        let len = self.len();
        let individual = self
            .population
            .get_mut(index)
            .ok_or(ReferenceError::OutOfBounds { index, len })?;
        individual.set_fitness(fitness);
        Ok(())
    }

    /// Handle to the member at `index` under the current layout
    pub fn handle(&self, index: usize) -> Option<PartialRef> {
        (index < self.len()).then(|| PartialRef::new(index, self.version))
    }

    /// Sample a handle uniformly from the current members
    pub fn sample_ref<R: RandomSource>(&self, rng: &mut R) -> Result<PartialRef, SamplingError> {
        let index = rng.sample_index(self.len())?;
        Ok(PartialRef::new(index, self.version))
    }

    /// Mutation operator that resamples whole-individual genes from this population
    pub fn resampler(&self) -> ReferenceResampling {
        ReferenceResampling::new(self.len(), self.version)
    }

    /// Resolve a handle to the member it points at
    pub fn resolve(&self, handle: PartialRef) -> Result<&PartialIndividual, ReferenceError> {
        self.check(handle)?;
        self.population
            .get(handle.index())
            .ok_or(ReferenceError::OutOfBounds {
                index: handle.index(),
                len: self.len(),
            })
    }

    /// Check that a handle resolves under the current layout
    pub fn check(&self, handle: PartialRef) -> Result<(), ReferenceError> {
        if handle.index() >= self.len() {
            return Err(ReferenceError::OutOfBounds {
                index: handle.index(),
                len: self.len(),
            });
        }
        if handle.version() != self.version {
            return Err(ReferenceError::Stale {
                index: handle.index(),
                expected: self.version,
                found: handle.version(),
            });
        }
        Ok(())
    }

    /// Two-point crossover with elitism over the non-elite slots
    pub fn crossover<R: RandomSource>(
        &mut self,
        rng: &mut R,
    ) -> Result<CrossoverSummary, OperatorError> {
        let summary = self.population.crossover(&BitFlipMutation, rng)?;
        debug!(
            offspring = summary.offspring,
            flipped_bits = summary.mutated_genes,
            "partial population crossover"
        );
        Ok(summary)
    }

    /// Flip each bit of `individual` with its own mutation probability
    pub fn mutate<R: RandomSource>(
        individual: &mut PartialIndividual,
        rng: &mut R,
    ) -> Result<usize, OperatorError> {
        let rate = individual.mutation_rate();
        BitFlipMutation.mutate(individual.genome_mut(), rate, rng)
    }

    /// Set every fitness to the unevaluated sentinel
    pub fn reset_fitness(&mut self) {
        self.population.reset_fitness();
    }

    /// Back-propagate whole-individual fitness to the referenced building blocks
    ///
    /// For every whole individual and every member it references, the
    /// member's fitness is overwritten when the whole individual's fitness is
    /// strictly lower. Member fitness never increases. Returns the number of
    /// overwrites.
    pub fn assign_credit(&mut self, whole: &WholePopulation) -> Result<usize, ReferenceError> {
        let mut updates = 0;
        for assembly in whole.iter() {
            let fitness = assembly.fitness();
            for &handle in assembly.genome() {
                self.check(handle)?;
                if let Some(member) = self.population.get_mut(handle.index()) {
                    if fitness < member.fitness() {
                        member.set_fitness(fitness);
                        updates += 1;
                    }
                }
            }
        }
        Ok(updates)
    }

    /// Rank members by fitness, best first, and start a new layout version
    pub fn sort_by_fitness(&mut self) -> Reordering {
        let new_to_old = self.population.sort_by_fitness();
        let mut old_to_new = vec![0; new_to_old.len()];
        for (new, &old) in new_to_old.iter().enumerate() {
            old_to_new[old] = new;
        }

        let from_version = self.version;
        self.version += 1;
        Reordering {
            old_to_new,
            from_version,
            to_version: self.version,
        }
    }

    /// Get the best member (lowest fitness)
    pub fn best(&self) -> Option<&PartialIndividual> {
        self.population.best()
    }

    /// Compute mean fitness over evaluated members
    pub fn mean_fitness(&self) -> Option<f64> {
        self.population.mean_fitness()
    }
}

impl std::ops::Index<usize> for PartialPopulation {
    type Output = PartialIndividual;

    fn index(&self, index: usize) -> &Self::Output {
        &self.population[index]
    }
}

impl<'a> IntoIterator for &'a PartialPopulation {
    type Item = &'a PartialIndividual;
    type IntoIter = std::slice::Iter<'a, PartialIndividual>;

    fn into_iter(self) -> Self::IntoIter {
        self.population.iter()
    }
}
