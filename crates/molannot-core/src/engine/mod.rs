//! # Engine Module
//!
//! The annotation engine: configuration, error types, progress reporting and
//! the analysis tasks that derive rings, charges and secondary structure from a
//! loaded [`MolecularSystem`](crate::core::models::system::MolecularSystem).
//!
//! Every task is a function of `&MolecularSystem` returning its annotations;
//! none of them writes to the system. Storing results is left to the caller
//! (normally [`workflows::annotate`](crate::workflows::annotate)), which keeps
//! the three analyses independent of each other.

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
