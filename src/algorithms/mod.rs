//! Evolutionary algorithms
//!
//! This module provides the symbiotic co-evolution driver.

pub mod symbiotic;

pub mod prelude {
    pub use super::symbiotic::*;
}
