//! Analysis tasks run over a loaded system.
//!
//! Each task reads a `&MolecularSystem` and returns the annotations it derived;
//! writing them back is the caller's job.

pub mod aromatic_rings;
pub mod bond_inference;
pub mod format_check;
pub mod ligand_charges;
pub mod residue_charges;
pub mod ring_search;
pub mod secondary_structure;

#[cfg(test)]
pub(crate) mod test_support;
