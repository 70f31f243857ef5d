//! Bit string genome
//!
//! This module provides the fixed-length bit string genome carried by partial
//! individuals. Genes are stored as `bool`, so every gene is 0 or 1 by
//! construction.

use serde::{Deserialize, Serialize};

use crate::error::SamplingError;
use crate::genome::traits::Chromosome;
use crate::random::RandomSource;

/// Fixed-length bit string genome
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitString {
    /// The bits of this genome
    bits: Vec<bool>,
}

impl BitString {
    /// Create a new bit string with the given bits
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Create an all-zeros bit string of the given length
    pub fn zeros(length: usize) -> Self {
        Self {
            bits: vec![false; length],
        }
    }

    /// Create an all-ones bit string of the given length
    pub fn ones(length: usize) -> Self {
        Self {
            bits: vec![true; length],
        }
    }

    /// Sample each bit independently and uniformly from {0, 1}
    pub fn random<R: RandomSource>(length: usize, rng: &mut R) -> Result<Self, SamplingError> {
        let bits = (0..length)
            .map(|_| rng.sample_bool(0.5))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }

    /// Get the length of the bit string
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if the bit string is empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Get a specific bit
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Flip a specific bit
    pub fn flip(&mut self, index: usize) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = !*bit;
        }
    }

    /// Get the bits
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Bits as 0/1 integers
    pub fn to_binary(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| u8::from(b)).collect()
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Number of unset bits
    pub fn count_zeros(&self) -> usize {
        self.bits.len() - self.count_ones()
    }

    /// Hamming distance to another bit string
    pub fn hamming_distance(&self, other: &Self) -> usize {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl Chromosome for BitString {
    type Gene = bool;

    fn genes(&self) -> &[bool] {
        &self.bits
    }

    fn genes_mut(&mut self) -> &mut [bool] {
        &mut self.bits
    }
}

impl std::ops::Index<usize> for BitString {
    type Output = bool;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bits[index]
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl<const N: usize> From<[bool; N]> for BitString {
    fn from(arr: [bool; N]) -> Self {
        Self { bits: arr.to_vec() }
    }
}

impl<'a> IntoIterator for &'a BitString {
    type Item = &'a bool;
    type IntoIter = std::slice::Iter<'a, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.iter()
    }
}

impl std::fmt::Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in &self.bits {
            write!(f, "{}", if *bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded_rng;

    #[test]
    fn test_bit_string_zeros_ones() {
        let zeros = BitString::zeros(5);
        assert_eq!(zeros.count_ones(), 0);
        assert_eq!(zeros.count_zeros(), 5);

        let ones = BitString::ones(5);
        assert_eq!(ones.count_ones(), 5);
    }

    #[test]
    fn test_bit_string_random_length() {
        let mut rng = seeded_rng(1);
        let bs = BitString::random(64, &mut rng).unwrap();
        assert_eq!(bs.len(), 64);
        // 64 fair coin flips landing all on one side would be a broken source
        assert!(bs.count_ones() > 0 && bs.count_zeros() > 0);
    }

    #[test]
    fn test_bit_string_flip() {
        let mut bs = BitString::zeros(3);
        bs.flip(1);
        assert_eq!(bs.bits(), &[false, true, false]);
        bs.flip(10);
        assert_eq!(bs.len(), 3);
    }

    #[test]
    fn test_bit_string_to_binary() {
        let bs = BitString::from([true, false, true]);
        assert_eq!(bs.to_binary(), vec![1, 0, 1]);
    }

    #[test]
    fn test_bit_string_hamming_distance() {
        let bs1 = BitString::new(vec![true, false, true, false]);
        let bs2 = BitString::new(vec![true, true, false, false]);
        assert_eq!(bs1.hamming_distance(&bs2), 2);
    }

    #[test]
    fn test_bit_string_display() {
        let bs = BitString::new(vec![true, false, true, true]);
        assert_eq!(format!("{}", bs), "1011");
    }

    #[test]
    fn test_bit_string_serialization() {
        let bs = BitString::new(vec![true, false, true]);
        let serialized = serde_json::to_string(&bs).unwrap();
        let deserialized: BitString = serde_json::from_str(&serialized).unwrap();
        assert_eq!(bs, deserialized);
    }
}
