//! Run configuration
//!
//! Construction parameters for both populations and the generation budget.
//! Configurations are plain serde structs; [`SymbioticConfig::from_json_file`]
//! loads one from disk and validates it before returning.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoevoResult, ConfigurationError};
use crate::population::population::MIN_POPULATION_SIZE;

/// Parameters of a single population
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of individuals
    pub pop_size: usize,
    /// Genes per chromosome
    pub chrom_len: usize,
    /// Per-gene mutation probability
    pub mutation_rate: f64,
    /// Fraction of the population replaced each generation
    pub crossover_rate: f64,
}

impl PopulationConfig {
    /// Create a population configuration
    pub fn new(pop_size: usize, chrom_len: usize, mutation_rate: f64, crossover_rate: f64) -> Self {
        Self {
            pop_size,
            chrom_len,
            mutation_rate,
            crossover_rate,
        }
    }

    /// Check the parameters, naming the population in any error
    pub fn validate(&self, population: &'static str) -> Result<(), ConfigurationError> {
        if self.pop_size < MIN_POPULATION_SIZE {
            return Err(ConfigurationError::PopulationTooSmall {
                population,
                size: self.pop_size,
                minimum: MIN_POPULATION_SIZE,
            });
        }
        if self.chrom_len == 0 {
            return Err(ConfigurationError::EmptyChromosome { population });
        }
        check_probability(population, "mutation_rate", self.mutation_rate)?;
        check_probability(population, "crossover_rate", self.crossover_rate)?;
        Ok(())
    }
}

fn check_probability(
    population: &str,
    parameter: &str,
    value: f64,
) -> Result<(), ConfigurationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::ProbabilityOutOfRange {
            parameter: format!("{population}.{parameter}"),
            value,
        })
    }
}

fn default_evaluate_initial() -> bool {
    true
}

/// Complete configuration of a symbiotic evolution run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbioticConfig {
    /// Building-block population
    pub partial: PopulationConfig,
    /// Assembly population
    pub whole: PopulationConfig,
    /// Generation budget
    pub generations: usize,
    /// Evaluate and rank the freshly built populations before generation 0
    #[serde(default = "default_evaluate_initial")]
    pub evaluate_initial: bool,
}

impl Default for SymbioticConfig {
    fn default() -> Self {
        Self {
            partial: PopulationConfig::new(20, 10, 0.1, 0.8),
            whole: PopulationConfig::new(10, 5, 0.05, 0.9),
            generations: 100,
            evaluate_initial: true,
        }
    }
}

impl SymbioticConfig {
    /// Create a configuration from both population configurations
    pub fn new(partial: PopulationConfig, whole: PopulationConfig, generations: usize) -> Self {
        Self {
            partial,
            whole,
            generations,
            evaluate_initial: true,
        }
    }

    /// Set the generation budget
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Enable or disable the evaluation before generation 0
    pub fn with_initial_evaluation(mut self, enabled: bool) -> Self {
        self.evaluate_initial = enabled;
        self
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.partial.validate("partial")?;
        self.whole.validate("whole")?;
        if self.generations == 0 {
            return Err(ConfigurationError::ZeroGenerations);
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> CoevoResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> CoevoResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> CoevoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn partial_pop_size(&self) -> usize {
        self.partial.pop_size
    }

    pub fn partial_chrom_len(&self) -> usize {
        self.partial.chrom_len
    }

    pub fn partial_mutation_rate(&self) -> f64 {
        self.partial.mutation_rate
    }

    pub fn partial_crossover_rate(&self) -> f64 {
        self.partial.crossover_rate
    }

    pub fn whole_pop_size(&self) -> usize {
        self.whole.pop_size
    }

    pub fn whole_chrom_len(&self) -> usize {
        self.whole.chrom_len
    }

    pub fn whole_mutation_rate(&self) -> f64 {
        self.whole.mutation_rate
    }

    pub fn whole_crossover_rate(&self) -> f64 {
        self.whole.crossover_rate
    }
}
