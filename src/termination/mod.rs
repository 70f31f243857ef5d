//! Termination criteria
//!
//! Optional early-stop criteria for the co-evolution driver, plus a
//! cooperative cancellation token. The driver checks them at the top of the
//! generation loop only; a generation in progress always completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Evolution state for termination checking
#[derive(Clone, Copy, Debug)]
pub struct EvolutionState<'a> {
    /// Best whole fitness found so far
    pub best_fitness: f64,
    /// Best fitness of each completed generation
    pub fitness_history: &'a [f64],
}

/// Termination criterion trait
pub trait TerminationCriterion: Send + Sync {
    /// Check if evolution should terminate
    fn should_terminate(&self, state: &EvolutionState<'_>) -> bool;

    /// Get a description of why termination occurred
    fn reason(&self) -> &'static str;
}

/// Terminate when fitness improvement stagnates
#[derive(Clone, Debug)]
pub struct FitnessStagnation {
    /// Number of generations to look back
    pub window: usize,
    /// Minimum improvement threshold
    pub epsilon: f64,
}

impl FitnessStagnation {
    /// Create a new fitness stagnation criterion
    pub fn new(window: usize, epsilon: f64) -> Self {
        Self { window, epsilon }
    }
}

impl TerminationCriterion for FitnessStagnation {
    fn should_terminate(&self, state: &EvolutionState<'_>) -> bool {
        if self.window == 0 || state.fitness_history.len() < self.window {
            return false;
        }

        let window = &state.fitness_history[state.fitness_history.len() - self.window..];
        match (window.first(), window.last()) {
            (Some(first), Some(last)) => (first - last).abs() < self.epsilon,
            _ => false,
        }
    }

    fn reason(&self) -> &'static str {
        "Fitness stagnation detected"
    }
}

/// Terminate when the best fitness reaches a target (minimization)
#[derive(Clone, Debug)]
pub struct TargetFitness {
    /// Target fitness value
    pub target: f64,
    /// Tolerance for reaching target
    pub tolerance: f64,
}

impl TargetFitness {
    /// Create a new target fitness criterion
    pub fn new(target: f64) -> Self {
        Self {
            target,
            tolerance: 0.0,
        }
    }

    /// Create with a tolerance
    pub fn with_tolerance(target: f64, tolerance: f64) -> Self {
        Self { target, tolerance }
    }
}

impl TerminationCriterion for TargetFitness {
    fn should_terminate(&self, state: &EvolutionState<'_>) -> bool {
        state.best_fitness <= self.target + self.tolerance
    }

    fn reason(&self) -> &'static str {
        "Target fitness reached"
    }
}

/// Cooperative cancellation flag
///
/// Clones share the flag, so a token handed to another thread can stop a
/// running driver before its next generation.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not yet cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl TerminationCriterion for CancellationToken {
    fn should_terminate(&self, _state: &EvolutionState<'_>) -> bool {
        self.is_cancelled()
    }

    fn reason(&self) -> &'static str {
        "Cancelled"
    }
}

pub mod prelude {
    pub use super::{
        CancellationToken, EvolutionState, FitnessStagnation, TargetFitness, TerminationCriterion,
    };
}
