//! Fitness traits
//!
//! The driver talks to fitness through [`Evaluator`]: a callback that scores
//! the whole population, given read access to the partial population it
//! references, and returns the average fitness. [`PerIndividual`] adapts a
//! per-assembly [`WholeFitness`] into an evaluator. Fitness is minimized.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::EvaluationError;
use crate::genome::bit_string::BitString;
use crate::population::individual::WholeIndividual;
use crate::population::partial::PartialPopulation;
use crate::population::whole::WholePopulation;

/// Whole-population evaluation callback
///
/// Must set the fitness of every whole individual and may reorder them.
/// Partial fitness is not the evaluator's concern: the driver
/// back-propagates it after evaluation.
pub trait Evaluator {
    /// Score every whole individual and return the average fitness
    fn evaluate(
        &mut self,
        whole: &mut WholePopulation,
        partial: &PartialPopulation,
    ) -> Result<f64, EvaluationError>;
}

impl<F> Evaluator for F
where
    F: FnMut(&mut WholePopulation, &PartialPopulation) -> Result<f64, EvaluationError>,
{
    fn evaluate(
        &mut self,
        whole: &mut WholePopulation,
        partial: &PartialPopulation,
    ) -> Result<f64, EvaluationError> {
        self(whole, partial)
    }
}

/// Fitness of a single assembly
///
/// Receives the referenced partial genomes in gene order.
pub trait WholeFitness: Send + Sync {
    /// Score one assembly (lower is better)
    fn score(&self, parts: &[&BitString]) -> f64;
}

/// A simple function wrapper for per-assembly fitness
pub struct FnWholeFitness<F>
where
    F: Fn(&[&BitString]) -> f64,
{
    f: F,
}

impl<F> FnWholeFitness<F>
where
    F: Fn(&[&BitString]) -> f64,
{
    /// Create a new function-based fitness
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> WholeFitness for FnWholeFitness<F>
where
    F: Fn(&[&BitString]) -> f64 + Send + Sync,
{
    fn score(&self, parts: &[&BitString]) -> f64 {
        (self.f)(parts)
    }
}

/// Evaluator that scores each whole individual independently
///
/// Individuals are scored in parallel when the `parallel` feature is on.
/// The average is summed in population order either way.
#[derive(Clone, Debug)]
pub struct PerIndividual<F> {
    fitness: F,
}

impl<F: WholeFitness> PerIndividual<F> {
    /// Wrap a per-assembly fitness function
    pub fn new(fitness: F) -> Self {
        Self { fitness }
    }

    /// The wrapped fitness function
    pub fn fitness(&self) -> &F {
        &self.fitness
    }
}

fn score_assembly<F: WholeFitness>(
    fitness: &F,
    individual: &mut WholeIndividual,
    partial: &PartialPopulation,
) -> Result<f64, EvaluationError> {
    let parts = individual
        .genome()
        .iter()
        .map(|&handle| partial.resolve(handle).map(|member| member.genome()))
        .collect::<Result<Vec<_>, _>>()?;
    let score = fitness.score(&parts);
    individual.set_fitness(score);
    Ok(score)
}

impl<F: WholeFitness> Evaluator for PerIndividual<F> {
    fn evaluate(
        &mut self,
        whole: &mut WholePopulation,
        partial: &PartialPopulation,
    ) -> Result<f64, EvaluationError> {
        let fitness = &self.fitness;

        #[cfg(feature = "parallel")]
        let scores = whole
            .individuals_mut()
            .par_iter_mut()
            .map(|individual| score_assembly(fitness, individual, partial))
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(not(feature = "parallel"))]
        let scores = whole
            .individuals_mut()
            .iter_mut()
            .map(|individual| score_assembly(fitness, individual, partial))
            .collect::<Result<Vec<_>, _>>()?;

        if scores.is_empty() {
            return Err(EvaluationError::Failed("empty whole population".to_string()));
        }
        Ok(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
