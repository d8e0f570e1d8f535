//! Geometry helpers used by the annotation tasks.

pub mod geometry;
