//! # molannot Core Library
//!
//! Structural annotation of protein-ligand complexes. Given an atom graph with
//! coordinates and connectivity, the library derives the annotations that
//! scoring and featurization code consumes: aromatic rings, charged functional
//! groups, and per-residue secondary structure.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Data models (`MolecularSystem`, annotation records),
//!   static chemistry tables, geometry primitives and PDB/PDBQT I/O.
//!
//! - **[`engine`]: The Logic Core.** Configuration, errors, progress reporting and the
//!   individual annotation tasks (ring search, charge rules, secondary-structure
//!   classification). Every task is a pure function of an immutable system.
//!
//! - **[`workflows`]: The Public API.** Runs the enabled tasks over a system and stores
//!   their results on it.

pub mod core;
pub mod engine;
pub mod workflows;
