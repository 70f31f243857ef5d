//! Symbiotic co-evolution driver
//!
//! Runs the generational loop over a partial and a whole population:
//! crossover on both, fitness reset, external evaluation, credit assignment
//! from wholes to the partials they reference, ranking, and best-whole
//! bookkeeping. Fitness is minimized throughout.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::SymbioticConfig;
use crate::diagnostics::{EvolutionStats, GenerationRecord, NoopReporter, ProgressReporter};
use crate::error::{CoevoResult, ConfigurationError, EvaluationError, ReferenceError};
use crate::fitness::traits::Evaluator;
use crate::genome::bit_string::BitString;
use crate::genome::reference::PartialRef;
use crate::population::individual::WholeIndividual;
use crate::population::partial::PartialPopulation;
use crate::population::whole::WholePopulation;
use crate::random::RandomSource;
use crate::termination::{CancellationToken, EvolutionState, TerminationCriterion};

const BUDGET_EXHAUSTED: &str = "Generation budget exhausted";

/// Lifecycle of the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Iterating; `generation` counts the generations completed so far
    Running { generation: usize },
    /// The last run finished (budget exhausted or stopped early)
    Done,
}

/// Deep copy of the best whole individual seen during a run
///
/// Holds both the handles, valid in the partial layout of the generation
/// that produced it, and the resolved partial genomes, so it outlives the
/// populations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestWhole {
    /// Fitness of the assembly
    pub fitness: f64,
    /// Generation that produced it (0 for the initial evaluation)
    pub generation: usize,
    /// Handles as they were when captured
    pub refs: Vec<PartialRef>,
    /// The referenced partial genomes, in gene order
    pub genomes: Vec<BitString>,
}

impl BestWhole {
    fn capture(
        individual: &WholeIndividual,
        partial: &PartialPopulation,
        generation: usize,
    ) -> Result<Self, ReferenceError> {
        let refs: Vec<PartialRef> = individual.genome().refs().to_vec();
        let genomes = refs
            .iter()
            .map(|&handle| partial.resolve(handle).map(|member| member.genome().clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            fitness: individual.fitness(),
            generation,
            refs,
            genomes,
        })
    }

    /// The assembly as one concatenated bit sequence
    pub fn assembled(&self) -> BitString {
        BitString::new(
            self.genomes
                .iter()
                .flat_map(|genome| genome.bits().iter().copied())
                .collect(),
        )
    }
}

/// Outcome of a run
#[derive(Clone, Debug)]
pub struct SymbioticResult {
    /// Best whole individual seen, if any was evaluated
    pub best: Option<BestWhole>,
    /// Generations completed over the driver's lifetime
    pub generations_completed: usize,
    /// Per-generation history
    pub stats: EvolutionStats,
}

impl SymbioticResult {
    /// Best fitness seen, if any
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|best| best.fitness)
    }

    /// Why the run stopped
    pub fn termination_reason(&self) -> Option<&str> {
        self.stats.termination_reason.as_deref()
    }
}

/// Builder for [`SymbioticEvolution`]
pub struct SymbioticEvolutionBuilder<E, P> {
    config: SymbioticConfig,
    evaluator: Option<E>,
    reporter: P,
    termination: Vec<Box<dyn TerminationCriterion>>,
    populations: Option<(PartialPopulation, WholePopulation)>,
}

impl SymbioticEvolutionBuilder<(), NoopReporter> {
    /// Create a new builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: SymbioticConfig::default(),
            evaluator: None,
            reporter: NoopReporter,
            termination: Vec::new(),
            populations: None,
        }
    }
}

impl Default for SymbioticEvolutionBuilder<(), NoopReporter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, P> SymbioticEvolutionBuilder<E, P> {
    /// Set the configuration
    pub fn config(mut self, config: SymbioticConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the generation budget used by [`SymbioticEvolution::run`]
    pub fn generations(mut self, generations: usize) -> Self {
        self.config.generations = generations;
        self
    }

    /// Set the evaluator
    pub fn evaluator<NewE: Evaluator>(self, evaluator: NewE) -> SymbioticEvolutionBuilder<NewE, P> {
        SymbioticEvolutionBuilder {
            config: self.config,
            evaluator: Some(evaluator),
            reporter: self.reporter,
            termination: self.termination,
            populations: self.populations,
        }
    }

    /// Set the progress sink
    pub fn reporter<NewP: ProgressReporter>(
        self,
        reporter: NewP,
    ) -> SymbioticEvolutionBuilder<E, NewP> {
        SymbioticEvolutionBuilder {
            config: self.config,
            evaluator: self.evaluator,
            reporter,
            termination: self.termination,
            populations: self.populations,
        }
    }

    /// Add an early-stop criterion, checked before every generation
    pub fn termination<T: TerminationCriterion + 'static>(mut self, criterion: T) -> Self {
        self.termination.push(Box::new(criterion));
        self
    }

    /// Stop before the next generation once `token` is cancelled
    pub fn cancellation(self, token: CancellationToken) -> Self {
        self.termination(token)
    }

    /// Start from existing populations instead of random ones
    pub fn populations(mut self, partial: PartialPopulation, whole: WholePopulation) -> Self {
        self.populations = Some((partial, whole));
        self
    }
}

impl<E: Evaluator, P: ProgressReporter> SymbioticEvolutionBuilder<E, P> {
    /// Validate the configuration and construct both populations
    pub fn build<R: RandomSource>(self, rng: &mut R) -> CoevoResult<SymbioticEvolution<E, P>> {
        self.config.validate()?;
        let evaluator = self
            .evaluator
            .ok_or(ConfigurationError::MissingEvaluator)?;

        let (partial, whole) = match self.populations {
            Some((partial, whole)) => {
                whole.validate_references(&partial)?;
                (partial, whole)
            }
            None => {
                let partial = PartialPopulation::new(&self.config.partial, rng)?;
                let whole = WholePopulation::new(&self.config.whole, &partial, rng)?;
                (partial, whole)
            }
        };

        Ok(SymbioticEvolution {
            config: self.config,
            partial,
            whole,
            evaluator,
            reporter: self.reporter,
            termination: self.termination,
            state: DriverState::Running { generation: 0 },
            generation: 0,
            initialized: false,
            best: None,
            stats: EvolutionStats::new(),
        })
    }
}

/// Symbiotic co-evolution driver
///
/// Owns both populations for the run's lifetime. An error aborts the
/// current generation and leaves the populations mid-generation, so a
/// driver that returned an error should be discarded.
pub struct SymbioticEvolution<E, P = NoopReporter> {
    config: SymbioticConfig,
    partial: PartialPopulation,
    whole: WholePopulation,
    evaluator: E,
    reporter: P,
    termination: Vec<Box<dyn TerminationCriterion>>,
    state: DriverState,
    generation: usize,
    initialized: bool,
    best: Option<BestWhole>,
    stats: EvolutionStats,
}

impl SymbioticEvolution<(), NoopReporter> {
    /// Create a builder
    pub fn builder() -> SymbioticEvolutionBuilder<(), NoopReporter> {
        SymbioticEvolutionBuilder::new()
    }
}

impl<E: Evaluator, P: ProgressReporter> SymbioticEvolution<E, P> {
    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Generations completed so far
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The configuration
    pub fn config(&self) -> &SymbioticConfig {
        &self.config
    }

    /// The partial population
    pub fn partial(&self) -> &PartialPopulation {
        &self.partial
    }

    /// The whole population
    pub fn whole(&self) -> &WholePopulation {
        &self.whole
    }

    /// Best whole individual seen so far
    pub fn best(&self) -> Option<&BestWhole> {
        self.best.as_ref()
    }

    /// History of completed generations
    pub fn stats(&self) -> &EvolutionStats {
        &self.stats
    }

    /// The progress sink
    pub fn reporter(&self) -> &P {
        &self.reporter
    }

    /// Run the configured number of generations
    pub fn run<R: RandomSource>(&mut self, rng: &mut R) -> CoevoResult<SymbioticResult> {
        self.run_for(self.config.generations, rng)
    }

    /// Run up to `generations` more generations
    ///
    /// Early-stop criteria are checked at the top of each generation. A
    /// later call continues from where the previous one stopped.
    #[instrument(
        level = "info",
        skip(self, rng),
        fields(partial_size = self.partial.len(), whole_size = self.whole.len())
    )]
    pub fn run_for<R: RandomSource>(
        &mut self,
        generations: usize,
        rng: &mut R,
    ) -> CoevoResult<SymbioticResult> {
        if generations == 0 {
            return Err(ConfigurationError::ZeroGenerations.into());
        }
        let start = Instant::now();
        self.state = DriverState::Running {
            generation: self.generation,
        };
        self.initialize()?;

        let mut reason = BUDGET_EXHAUSTED;
        for _ in 0..generations {
            if let Some(stop) = self.stop_reason() {
                info!(generation = self.generation, reason = stop, "stopping early");
                reason = stop;
                break;
            }
            self.step(rng)?;
        }

        self.state = DriverState::Done;
        self.stats.set_termination_reason(reason);
        self.stats.add_runtime(start.elapsed());

        Ok(SymbioticResult {
            best: self.best.clone(),
            generations_completed: self.generation,
            stats: self.stats.clone(),
        })
    }

    /// Advance exactly one generation
    ///
    /// On a fresh driver this first runs the initial evaluation, so the
    /// first crossover breeds from ranked populations.
    pub fn step<R: RandomSource>(&mut self, rng: &mut R) -> CoevoResult<GenerationRecord> {
        self.state = DriverState::Running {
            generation: self.generation,
        };
        self.initialize()?;

        self.partial.crossover(rng)?;
        self.whole.crossover(&self.partial, rng)?;
        self.partial.reset_fitness();
        self.whole.reset_fitness();

        let avg_fitness = self.evaluate()?;
        self.generation += 1;
        self.state = DriverState::Running {
            generation: self.generation,
        };
        self.track_best()?;

        let best_fitness = self.best.as_ref().map_or(f64::INFINITY, |best| best.fitness);
        let record = GenerationRecord::new(self.generation, best_fitness, avg_fitness);
        self.reporter.report(&record);
        self.stats.record(record);
        Ok(record)
    }

    fn initialize(&mut self) -> CoevoResult<()> {
        if self.initialized {
            return Ok(());
        }
        if self.config.evaluate_initial {
            self.evaluate()?;
            self.track_best()?;
        }
        self.initialized = true;
        Ok(())
    }

    fn stop_reason(&self) -> Option<&'static str> {
        if self.termination.is_empty() {
            return None;
        }
        let history = self.stats.best_fitness_history();
        let state = EvolutionState {
            best_fitness: self.best.as_ref().map_or(f64::INFINITY, |best| best.fitness),
            fitness_history: &history,
        };
        self.termination
            .iter()
            .find(|criterion| criterion.should_terminate(&state))
            .map(|criterion| criterion.reason())
    }

    /// Evaluate, back-propagate credit, then rank both populations
    fn evaluate(&mut self) -> CoevoResult<f64> {
        let avg_fitness = self.evaluator.evaluate(&mut self.whole, &self.partial)?;
        check_evaluation(&self.whole, &self.partial, avg_fitness)?;

        let credited = self.partial.assign_credit(&self.whole)?;
        debug!(credited, avg_fitness, "credit assigned to partial population");

        self.whole.sort_by_fitness();
        let reordering = self.partial.sort_by_fitness();
        self.whole.remap_references(&reordering)?;
        Ok(avg_fitness)
    }

    fn track_best(&mut self) -> CoevoResult<()> {
        let Some(candidate) = self.whole.best() else {
            return Ok(());
        };
        let improved = self
            .best
            .as_ref()
            .map_or(true, |best| candidate.fitness() < best.fitness);
        if improved {
            self.best = Some(BestWhole::capture(candidate, &self.partial, self.generation)?);
        }
        Ok(())
    }
}

/// Reject evaluator output the driver cannot rank
fn check_evaluation(
    whole: &WholePopulation,
    partial: &PartialPopulation,
    avg_fitness: f64,
) -> Result<(), EvaluationError> {
    let expected = whole.chrom_len();
    for (index, individual) in whole.iter().enumerate() {
        if individual.len() != expected {
            warn!(
                index,
                actual = individual.len(),
                expected,
                "evaluator resized a whole individual"
            );
            return Err(EvaluationError::ChromosomeLengthChanged {
                index,
                expected,
                actual: individual.len(),
            });
        }
        let value = individual.fitness();
        if !individual.is_evaluated() {
            warn!(index, "evaluator left a whole individual unevaluated");
            return Err(EvaluationError::Unevaluated { index });
        }
        if value.is_nan() || value == f64::NEG_INFINITY {
            warn!(index, value, "evaluator produced non-finite fitness");
            return Err(EvaluationError::NonFiniteFitness { index, value });
        }
    }
    if avg_fitness.is_nan() {
        warn!("evaluator reported NaN average fitness");
        return Err(EvaluationError::InvalidAverage(avg_fitness));
    }
    whole.validate_references(partial).map_err(|err| {
        warn!(%err, "evaluator left a dangling gene");
        EvaluationError::from(err)
    })
}
