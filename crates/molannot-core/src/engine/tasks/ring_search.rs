use crate::core::models::system::MolecularSystem;
use itertools::Itertools;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// A walk that has already crossed more atoms than this is abandoned, so the
/// longest closed path reported has `MAX_CROSSED_ATOMS + 1` members.
pub const MAX_CROSSED_ATOMS: usize = 6;

/// Enumerates closed walks through `origin`, each returned as the member atoms
/// in walk order starting with `origin`.
///
/// Every ring is found once per direction it can be traversed in. Neighbors are
/// visited in declared order, and the walk may leave the ligand.
pub fn rings_containing_atom(system: &MolecularSystem, origin: usize) -> Vec<Vec<usize>> {
    let mut rings = Vec::new();
    // `path[k + 1]` is the atom whose next neighbor is `cursors[k]`.
    let mut path: Vec<usize> = Vec::with_capacity(MAX_CROSSED_ATOMS + 2);
    let mut cursors: Vec<usize> = Vec::with_capacity(MAX_CROSSED_ATOMS + 1);

    for &first in system.neighbors_of(origin) {
        path.clear();
        cursors.clear();
        path.extend([origin, first]);
        cursors.push(0);

        while let Some(&cursor) = cursors.last() {
            let current = path[path.len() - 1];
            let Some(&next) = system.neighbors_of(current).get(cursor) else {
                cursors.pop();
                path.pop();
                continue;
            };
            let top = cursors.len() - 1;
            cursors[top] += 1;

            let crossed = &path[..path.len() - 1];
            if next == origin {
                if crossed.last() != Some(&origin) {
                    rings.push(path.clone());
                }
            } else if !crossed.contains(&next) && path.len() <= MAX_CROSSED_ATOMS {
                path.push(next);
                cursors.push(0);
            }
        }
    }
    rings
}

/// Drops empty rings and duplicates (same atom set, first occurrence wins),
/// then discards every ring that contains another ring's atoms.
pub fn remove_redundant_rings(rings: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    let unique: Vec<Vec<usize>> = rings
        .into_iter()
        .filter(|ring| !ring.is_empty())
        .unique_by(|ring| ring.iter().copied().sorted_unstable().collect::<Vec<_>>())
        .collect();
    let sets: Vec<HashSet<usize>> = unique
        .iter()
        .map(|ring| ring.iter().copied().collect())
        .collect();

    unique
        .into_iter()
        .enumerate()
        .filter(|(i, _)| {
            !sets
                .iter()
                .enumerate()
                .any(|(j, other)| j != *i && other.is_subset(&sets[*i]))
        })
        .map(|(_, ring)| ring)
        .collect()
}

/// Minimal five- and six-membered rings through ligand atoms, in discovery order.
#[instrument(skip_all, name = "ring_search_task")]
pub fn ligand_ring_candidates(system: &MolecularSystem) -> Vec<Vec<usize>> {
    let walks: Vec<Vec<usize>> = system
        .ligand_atoms()
        .flat_map(|atom| rings_containing_atom(system, atom.index))
        .collect();
    let walk_count = walks.len();

    let candidates: Vec<Vec<usize>> = remove_redundant_rings(walks)
        .into_iter()
        .filter(|ring| matches!(ring.len(), 5 | 6))
        .collect();
    debug!(
        walks = walk_count,
        candidates = candidates.len(),
        "Ligand ring search finished."
    );
    candidates
}
