//! Error types for symbiotic-evo
//!
//! This module defines all error types used throughout the library. Every
//! failure here is a configuration or programming defect, so nothing is
//! retried: errors propagate to the caller and abort the run.

use thiserror::Error;

/// Error raised when construction parameters are invalid
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Population too small for quartile-restricted parent sampling
    #[error("{population} population size {size} is below the minimum of {minimum}")]
    PopulationTooSmall {
        population: &'static str,
        size: usize,
        minimum: usize,
    },

    /// Chromosome length of zero
    #[error("{population} chromosome length must be at least 1")]
    EmptyChromosome { population: &'static str },

    /// Probability outside [0, 1]
    #[error("{parameter} must be in [0, 1], got {value}")]
    ProbabilityOutOfRange { parameter: String, value: f64 },

    /// Individuals of one population with different chromosome lengths
    #[error("{population} chromosome lengths differ: expected {expected}, got {actual}")]
    ChromosomeLengthMismatch {
        population: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Driver built without an evaluator
    #[error("no evaluator configured")]
    MissingEvaluator,

    /// Generation budget of zero
    #[error("generation count must be positive")]
    ZeroGenerations,
}

/// Error raised while evaluating the whole population
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    /// The evaluator itself reported a failure
    #[error("evaluation failed: {0}")]
    Failed(String),

    /// An individual was left without a fitness value
    #[error("whole individual {index} was not evaluated")]
    Unevaluated { index: usize },

    /// An individual received NaN or negative infinity
    #[error("whole individual {index} has non-finite fitness {value}")]
    NonFiniteFitness { index: usize, value: f64 },

    /// An individual was swapped for one with a different gene count
    #[error("whole individual {index} has {actual} genes, expected {expected}")]
    ChromosomeLengthChanged {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// The reported average fitness is not a number
    #[error("evaluator reported invalid average fitness {0}")]
    InvalidAverage(f64),

    /// A whole individual holds a handle that does not resolve
    #[error("dangling gene: {0}")]
    DanglingReference(#[from] ReferenceError),
}

/// Error raised by the randomness source
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SamplingError {
    /// Uniform sampling over an empty range `[0, 0)`
    #[error("cannot sample uniformly from empty range [0, {upper})")]
    EmptyRange { upper: usize },

    /// Bernoulli trial with an invalid probability
    #[error("invalid Bernoulli probability {0}")]
    InvalidProbability(f64),
}

/// Error raised when a whole-individual gene does not resolve
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReferenceError {
    /// Index past the end of the partial population
    #[error("partial reference {index} out of bounds (population size {len})")]
    OutOfBounds { index: usize, len: usize },

    /// Reference taken against an older partial population layout
    #[error("partial reference {index} is stale: version {found}, population is at {expected}")]
    Stale {
        index: usize,
        expected: u64,
        found: u64,
    },
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Parents or offspring of different lengths
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Cut point past the end of the chromosome
    #[error("cut point {cut} outside chromosome of length {len}")]
    CutOutOfRange { cut: usize, len: usize },

    /// Sampling failed inside an operator
    #[error(transparent)]
    Sampling(#[from] SamplingError),
}

/// Top-level error type for co-evolution runs
#[derive(Debug, Error)]
pub enum CoevolutionError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Fitness evaluation failed
    #[error("Fitness evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    /// Randomness source failed
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    /// Dangling or stale cross-population reference
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// IO error while loading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration document
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for co-evolution operations
pub type CoevoResult<T> = Result<T, CoevolutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::PopulationTooSmall {
            population: "partial",
            size: 3,
            minimum: 4,
        };
        assert_eq!(
            err.to_string(),
            "partial population size 3 is below the minimum of 4"
        );

        let err = ConfigurationError::ProbabilityOutOfRange {
            parameter: "whole.mutation_rate".to_string(),
            value: 1.5,
        };
        assert_eq!(err.to_string(), "whole.mutation_rate must be in [0, 1], got 1.5");
    }

    #[test]
    fn test_reference_error_display() {
        let err = ReferenceError::Stale {
            index: 2,
            expected: 5,
            found: 4,
        };
        assert_eq!(
            err.to_string(),
            "partial reference 2 is stale: version 4, population is at 5"
        );
    }

    #[test]
    fn test_coevolution_error_from_evaluation_error() {
        let err: CoevolutionError = EvaluationError::Unevaluated { index: 3 }.into();
        assert!(matches!(
            err,
            CoevolutionError::Evaluation(EvaluationError::Unevaluated { index: 3 })
        ));
    }

    #[test]
    fn test_operator_error_wraps_sampling() {
        let err: OperatorError = SamplingError::EmptyRange { upper: 0 }.into();
        assert_eq!(
            err.to_string(),
            "cannot sample uniformly from empty range [0, 0)"
        );
    }
}
