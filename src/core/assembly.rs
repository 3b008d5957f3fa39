//! The assembly under evaluation.
//!
//! An assembly is a list of contigs read from a FASTA file. A FASTA file with
//! no records is a valid, empty assembly: every downstream stage reports
//! "nothing assembled" for it instead of failing.

use std::collections::HashMap;

/// One assembled sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyContig {
    pub name: String,
    pub sequence: Vec<u8>,
}

impl AssemblyContig {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn length(&self) -> u64 {
        self.sequence.len() as u64
    }
}

/// All contigs of an assembly, in file order
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    contigs: Vec<AssemblyContig>,
    index: HashMap<String, usize>,
}

impl Assembly {
    /// Build an assembly. Contig names are expected to be unique;
    /// `read_assembly` rejects files that repeat one.
    #[must_use]
    pub fn new(contigs: Vec<AssemblyContig>) -> Self {
        let index = contigs
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self { contigs, index }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    #[must_use]
    pub fn contig_count(&self) -> usize {
        self.contigs.len()
    }

    /// Sum of all contig lengths
    #[must_use]
    pub fn total_bases(&self) -> u64 {
        self.contigs.iter().map(AssemblyContig::length).sum()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AssemblyContig> {
        self.index.get(name).map(|&i| &self.contigs[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssemblyContig> {
        self.contigs.iter()
    }
}
