//! # Workflows Module
//!
//! Top-level entry points of the library. A workflow takes a loaded
//! [`MolecularSystem`](crate::core::models::system::MolecularSystem) and an
//! [`AnnotationConfig`](crate::engine::config::AnnotationConfig), runs the enabled
//! engine tasks in order, stores their results on the system and returns a
//! summary of what was found.
//!
//! - **Annotation Workflow** ([`annotate`]) - optional ligand bond inference, the
//!   protein format check, then aromatic rings, charged groups and secondary
//!   structure.

pub mod annotate;
