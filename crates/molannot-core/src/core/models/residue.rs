use crate::core::chem::residues::{canonical_residue_name, is_protein_residue};
use serde::Serialize;
use std::fmt;

/// Identifies a residue instance by `(name, sequence number, chain)`.
///
/// This is the only thing distinguishing residues, so two residue instances
/// that collide on all three fields are treated as one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResidueKey {
    pub name: String,
    pub seq: isize,
    pub chain: char,
}

impl ResidueKey {
    pub fn new(name: &str, seq: isize, chain: char) -> Self {
        Self {
            name: name.trim().to_string(),
            seq,
            chain,
        }
    }

    /// Three-letter code the residue rules match against.
    pub fn canonical_name(&self) -> &str {
        canonical_residue_name(&self.name)
    }

    pub fn is_protein(&self) -> bool {
        is_protein_residue(&self.name)
    }

    pub fn position(&self) -> ResiduePosition {
        ResiduePosition::new(self.chain, self.seq)
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", self.name, self.seq, self.chain)
    }
}

/// `(chain, sequence number)`: where a secondary-structure label lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResiduePosition {
    pub chain: char,
    pub seq: isize,
}

impl ResiduePosition {
    pub fn new(chain: char, seq: isize) -> Self {
        Self { chain, seq }
    }
}

/// A residue and the indices of its atoms in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub key: ResidueKey,
    pub(crate) atoms: Vec<usize>,
}

impl Residue {
    pub(crate) fn new(key: ResidueKey) -> Self {
        Self {
            key,
            atoms: Vec::new(),
        }
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }

    pub fn canonical_name(&self) -> &str {
        self.key.canonical_name()
    }

    pub fn is_protein(&self) -> bool {
        self.key.is_protein()
    }
}
