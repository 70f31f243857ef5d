//! Population management
//!
//! This module provides the Individual type, the generic fixed-size
//! Population with its crossover engine, and the partial and whole
//! populations built on top of it.

pub mod individual;
pub mod partial;
#[allow(clippy::module_inception)]
pub mod population;
pub mod whole;

pub mod prelude {
    pub use super::individual::*;
    pub use super::partial::*;
    pub use super::population::*;
    pub use super::whole::*;
}
