//! Reading and writing molecular structure files.
//!
//! Readers produce a fully validated [`MolecularSystem`](crate::core::models::system::MolecularSystem):
//! every bond record is resolved against the atoms that were actually loaded
//! before the system is returned.

pub mod pdb;
pub mod traits;
