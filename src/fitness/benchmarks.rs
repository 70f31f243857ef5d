//! Benchmark fitness functions
//!
//! Assembly-level benchmarks for exercising the co-evolution loop. Each
//! scores the concatenation of the referenced partial genomes and returns a
//! value to be MINIMIZED.

use crate::fitness::traits::WholeFitness;
use crate::genome::bit_string::BitString;

/// Trait for benchmark functions
pub trait BenchmarkFunction: WholeFitness {
    /// Name of the benchmark function
    fn name(&self) -> &'static str;

    /// Optimal (minimum) fitness value, if known
    fn optimal_fitness(&self) -> Option<f64>;
}

fn concatenated<'a>(parts: &'a [&'a BitString]) -> impl Iterator<Item = bool> + 'a {
    parts.iter().flat_map(|part| part.bits().iter().copied())
}

/// Number of set bits across the assembly
///
/// Minimized by an assembly of all-zero partials.
#[derive(Clone, Debug, Default)]
pub struct OnesCount;

impl OnesCount {
    /// Create a new OnesCount function
    pub fn new() -> Self {
        Self
    }
}

impl WholeFitness for OnesCount {
    fn score(&self, parts: &[&BitString]) -> f64 {
        parts.iter().map(|part| part.count_ones()).sum::<usize>() as f64
    }
}

impl BenchmarkFunction for OnesCount {
    fn name(&self) -> &'static str {
        "OnesCount"
    }

    fn optimal_fitness(&self) -> Option<f64> {
        Some(0.0)
    }
}

/// Signed positional sum: f(b) = |Σᵢ (2bᵢ − 1)·√(i + 1)|
///
/// Bits of the concatenated assembly act as signs on square-root weights.
/// Reaching zero requires balancing the weights, so the landscape is highly
/// epistatic and rewards cooperation between partials.
#[derive(Clone, Debug, Default)]
pub struct SignedPositionalSum;

impl SignedPositionalSum {
    /// Create a new SignedPositionalSum function
    pub fn new() -> Self {
        Self
    }
}

impl WholeFitness for SignedPositionalSum {
    fn score(&self, parts: &[&BitString]) -> f64 {
        concatenated(parts)
            .enumerate()
            .map(|(i, bit)| {
                let weight = ((i + 1) as f64).sqrt();
                if bit {
                    weight
                } else {
                    -weight
                }
            })
            .sum::<f64>()
            .abs()
    }
}

impl BenchmarkFunction for SignedPositionalSum {
    fn name(&self) -> &'static str {
        "SignedPositionalSum"
    }

    fn optimal_fitness(&self) -> Option<f64> {
        None
    }
}

/// Hamming distance from the assembly to a target bit pattern
///
/// Positions past the end of the shorter side count as mismatches.
#[derive(Clone, Debug)]
pub struct HammingToTarget {
    target: BitString,
}

impl HammingToTarget {
    /// Create a new HammingToTarget function
    pub fn new(target: BitString) -> Self {
        Self { target }
    }

    /// The target pattern
    pub fn target(&self) -> &BitString {
        &self.target
    }
}

impl WholeFitness for HammingToTarget {
    fn score(&self, parts: &[&BitString]) -> f64 {
        let assembled: Vec<bool> = concatenated(parts).collect();
        let target = self.target.bits();
        let mismatches = assembled
            .iter()
            .zip(target)
            .filter(|(a, b)| a != b)
            .count();
        let overhang = assembled.len().abs_diff(target.len());
        (mismatches + overhang) as f64
    }
}

impl BenchmarkFunction for HammingToTarget {
    fn name(&self) -> &'static str {
        "HammingToTarget"
    }

    fn optimal_fitness(&self) -> Option<f64> {
        Some(0.0)
    }
}
