//! # symbiotic-evo
//!
//! Symbiotic (cooperative) co-evolution of two coupled populations.
//!
//! A *partial* population evolves bit-string building blocks. A *whole*
//! population evolves assemblies whose genes are handles into the partial
//! population. An external evaluator scores the assemblies, and each
//! assembly's fitness flows back to the building blocks it uses whenever it
//! improves them. Fitness is minimized.
//!
//! ## Core Concepts
//!
//! - **Versioned handles**: whole genes are `PartialRef { index, version }`;
//!   ranking the partial population starts a new version and every handle is
//!   remapped, so a gene never dangles
//! - **Quartile breeding**: both populations keep an elite slice and breed the
//!   rest by two-point crossover from the best quartile
//! - **Deterministic parallelism**: per-slot sub-streams make runs with and
//!   without the `parallel` feature bit-identical
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use symbiotic_evo::prelude::*;
//!
//! let mut rng = seeded_rng(42);
//!
//! let result = SymbioticEvolution::builder()
//!     .config(SymbioticConfig::default())
//!     .evaluator(PerIndividual::new(SignedPositionalSum::new()))
//!     .reporter(TracingReporter)
//!     .build(&mut rng)?
//!     .run(&mut rng)?;
//! ```

pub mod algorithms;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;
pub mod random;
pub mod termination;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::config::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::random::*;
    pub use crate::termination::prelude::*;
}
