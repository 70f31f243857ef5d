//! Genetic operators
//!
//! This module provides the two-point crossover splice and the mutation
//! operators for both genome kinds.

pub mod crossover;
pub mod mutation;
pub mod traits;

pub mod prelude {
    pub use super::crossover::*;
    pub use super::mutation::*;
    pub use super::traits::*;
}
