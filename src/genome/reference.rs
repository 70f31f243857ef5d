//! Reference chromosome
//!
//! Whole individuals do not own genetic material. Their genes are handles
//! into the partial population: an index into its storage plus the layout
//! version the index was taken against. A handle resolves only while both
//! match, which makes "no dangling genes" a checkable property.

use serde::{Deserialize, Serialize};

use crate::genome::traits::Chromosome;

/// Non-owning handle to a partial individual
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartialRef {
    index: usize,
    version: u64,
}

impl PartialRef {
    /// Create a handle to slot `index` of a partial population at `version`
    pub fn new(index: usize, version: u64) -> Self {
        Self { index, version }
    }

    /// Slot in the partial population
    pub fn index(&self) -> usize {
        self.index
    }

    /// Partial population layout version this handle was taken against
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl std::fmt::Display for PartialRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}@v{}", self.index, self.version)
    }
}

/// Fixed-length sequence of partial-population handles
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceChromosome {
    refs: Vec<PartialRef>,
}

impl ReferenceChromosome {
    /// Create a chromosome from handles
    pub fn new(refs: Vec<PartialRef>) -> Self {
        Self { refs }
    }

    /// The handles in gene order
    pub fn refs(&self) -> &[PartialRef] {
        &self.refs
    }

    /// Number of gene slots
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Check if the chromosome has no slots
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Iterate over the handles
    pub fn iter(&self) -> std::slice::Iter<'_, PartialRef> {
        self.refs.iter()
    }
}

impl Chromosome for ReferenceChromosome {
    type Gene = PartialRef;

    fn genes(&self) -> &[PartialRef] {
        &self.refs
    }

    fn genes_mut(&mut self) -> &mut [PartialRef] {
        &mut self.refs
    }
}

impl<'a> IntoIterator for &'a ReferenceChromosome {
    type Item = &'a PartialRef;
    type IntoIter = std::slice::Iter<'a, PartialRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.refs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ref_accessors() {
        let r = PartialRef::new(3, 7);
        assert_eq!(r.index(), 3);
        assert_eq!(r.version(), 7);
        assert_eq!(r.to_string(), "#3@v7");
    }

    #[test]
    fn test_reference_chromosome_slots() {
        let mut chrom =
            ReferenceChromosome::new(vec![PartialRef::new(0, 0), PartialRef::new(1, 0)]);
        assert_eq!(chrom.len(), 2);
        chrom.genes_mut()[1] = PartialRef::new(4, 0);
        let indices: Vec<usize> = chrom.iter().map(|r| r.index()).collect();
        assert_eq!(indices, vec![0, 4]);
    }
}
