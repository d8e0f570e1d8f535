use crate::core::chem::bond_lengths::BondLengthError;
use crate::core::models::system::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("An aromatic plane needs at least 3 ring atoms, got {found}")]
    InsufficientRingAtoms { found: usize },

    #[error("Bond length lookup failed: {source}")]
    BondLength {
        #[from]
        source: BondLengthError,
    },

    #[error("Bond graph update failed: {source}")]
    Graph {
        #[from]
        source: GraphError,
    },

    #[error("{phase} failed to converge after {iterations} sweeps")]
    Convergence {
        phase: &'static str,
        iterations: usize,
    },
}
