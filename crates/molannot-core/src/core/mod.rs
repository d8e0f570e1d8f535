//! # Core Module
//!
//! Fundamental building blocks shared by every annotation task.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residue keys, the bond graph and
//!   the annotation records attached to it
//! - **Chemistry Tables** ([`chem`]) - Residue name sets, element tables and reference
//!   bond lengths
//! - **Geometry** ([`utils`]) - Dihedrals, angles, centroids and plane fitting
//! - **File I/O** ([`io`]) - Reading and writing PDB/PDBQT structures

pub mod chem;
pub mod io;
pub mod models;
pub mod utils;
