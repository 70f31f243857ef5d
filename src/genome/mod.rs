//! Genome abstractions and implementations
//!
//! This module provides the `Chromosome` trait, the bit string genome of
//! partial individuals and the reference chromosome of whole individuals.

pub mod bit_string;
pub mod reference;
pub mod traits;

pub mod prelude {
    pub use super::bit_string::*;
    pub use super::reference::*;
    pub use super::traits::*;
}
