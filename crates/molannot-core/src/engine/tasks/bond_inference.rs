use crate::core::chem::bond_lengths::bond_length;
use crate::core::chem::elements::is_metal_cation;
use crate::core::models::atom::Atom;
use crate::core::models::system::MolecularSystem;
use crate::engine::error::EngineError;
use nalgebra::distance;
use tracing::{debug, info, instrument};

/// Pairs further apart than this are never looked up in the bond-length table.
pub const MAX_BOND_SEARCH_DISTANCE: f64 = 3.5;

/// Proposes bonds between ligand atoms that have none declared.
///
/// Two such atoms are bonded when they are closer than their reference bond
/// length times `tolerance`. Metal cations are left unbonded. Returns the new
/// bonds as `(i, j)` index pairs with `i < j`; the system is not modified.
///
/// # Errors
///
/// Returns [`EngineError::BondLength`] when a pair within
/// [`MAX_BOND_SEARCH_DISTANCE`] has no reference bond length.
#[instrument(skip_all, name = "bond_inference_task")]
pub fn run(system: &MolecularSystem, tolerance: f64) -> Result<Vec<(usize, usize)>, EngineError> {
    let candidates: Vec<&Atom> = system
        .ligand_atoms()
        .filter(|a| a.num_neighbors() == 0 && !is_metal_cation(&a.element))
        .collect();

    let mut bonds = Vec::new();
    for (k, a) in candidates.iter().enumerate() {
        for b in &candidates[k + 1..] {
            let d = distance(&a.position, &b.position);
            if d >= MAX_BOND_SEARCH_DISTANCE {
                continue;
            }
            let reference = bond_length(&a.element, &b.element)?;
            if d < reference * tolerance {
                debug!(a = a.index, b = b.index, distance = d, "Inferred ligand bond.");
                bonds.push((a.index, b.index));
            }
        }
    }
    info!(
        candidates = candidates.len(),
        bonds = bonds.len(),
        "Ligand bond inference finished."
    );
    Ok(bonds)
}
