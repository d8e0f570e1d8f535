//! Fixed chemistry reference data consumed by the annotation tasks.
//!
//! Everything in here is static: residue name sets, per-residue atom-name
//! templates, element normalization tables and reference bond lengths.

pub mod bond_lengths;
pub mod elements;
pub mod residues;
