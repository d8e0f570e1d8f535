pub mod annotations;
pub mod atom;
pub mod residue;
pub mod system;
