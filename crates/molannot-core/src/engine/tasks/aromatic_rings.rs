use super::ring_search::ligand_ring_candidates;
use crate::core::chem::residues::{RESIDUE_RING_TEMPLATES, ResidueRingTemplate};
use crate::core::models::annotations::{AromaticRing, PlaneEquation};
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::{average_point, dihedral_degrees, plane_normal};
use crate::engine::error::EngineError;
use nalgebra::{Point3, distance};
use tracing::{debug, info, instrument, trace};

/// Torsions further than this from 0 or 180 degrees make a ring non-planar.
const PLANARITY_TOLERANCE_DEG: f64 = 15.0;

fn is_twisted(torsion_deg: f64) -> bool {
    let lo = PLANARITY_TOLERANCE_DEG;
    let hi = 180.0 - PLANARITY_TOLERANCE_DEG;
    (torsion_deg > -hi && torsion_deg < -lo) || (torsion_deg > lo && torsion_deg < hi)
}

/// Checks that a ring and its first shell of substituents are planar.
///
/// The ring is treated as cyclic. For every run of four consecutive members the
/// ring torsion must be near 0 or 180 degrees, the fourth member must not be a
/// four-connected carbon, and the torsion from the second and third members
/// through the fourth to each of its neighbors must be flat as well.
pub fn ring_is_flat(system: &MolecularSystem, ring: &[usize]) -> bool {
    let len = ring.len() as isize;
    if len == 0 {
        return false;
    }
    let member = |k: isize| system.atom(ring[k.rem_euclid(len) as usize]);

    for t in -3..len - 3 {
        let (Some(a1), Some(a2), Some(a3), Some(a4)) =
            (member(t), member(t + 1), member(t + 2), member(t + 3))
        else {
            return false;
        };

        if a4.is_element("C") && a4.num_neighbors() == 4 {
            trace!(atom = a4.index, "Ring member is an sp3 carbon.");
            return false;
        }

        let (p1, p2, p3, p4) = (&a1.position, &a2.position, &a3.position, &a4.position);
        if is_twisted(dihedral_degrees(p1, p2, p3, p4)) {
            return false;
        }

        for &substituent in a4.neighbors() {
            let Some(sub) = system.atom(substituent) else {
                return false;
            };
            if is_twisted(dihedral_degrees(p2, p3, p4, &sub.position)) {
                return false;
            }
        }
    }
    true
}

/// Fits center, radius and plane to a ring given by its member indices.
///
/// The plane passes through member 0 with normal `(B - A) x (C - A)`, where the
/// reference triangle is members (0, 1, 2) for three atoms, (0, 1, 3) for four
/// and (0, 2, 4) for five or more.
pub fn aromatic_marker(
    system: &MolecularSystem,
    ring: &[usize],
) -> Result<AromaticRing, EngineError> {
    let positions: Vec<Point3<f64>> = ring
        .iter()
        .filter_map(|&idx| system.atom(idx).map(|a| a.position))
        .collect();
    if ring.len() < 3 || positions.len() < ring.len() {
        return Err(EngineError::InsufficientRingAtoms {
            found: positions.len().min(ring.len()),
        });
    }

    let center = average_point(&positions).ok_or(EngineError::InsufficientRingAtoms { found: 0 })?;
    let radius = positions
        .iter()
        .map(|p| distance(&center, p))
        .fold(0.0, f64::max);

    let (i, j, k) = match positions.len() {
        3 => (0, 1, 2),
        4 => (0, 1, 3),
        _ => (0, 2, 4),
    };
    let normal = plane_normal(&positions[i], &positions[j], &positions[k]);
    let plane = PlaneEquation {
        a: normal.x,
        b: normal.y,
        c: normal.z,
        d: normal.dot(&positions[0].coords),
    };
    let out_of_plane = positions
        .iter()
        .map(|p| plane.evaluate(p).abs())
        .fold(0.0, f64::max);
    trace!(members = ring.len(), out_of_plane, "Fitted ring plane.");

    Ok(AromaticRing {
        center,
        atoms: ring.to_vec(),
        plane,
        radius,
    })
}

/// Aromatic rings of non-protein residues.
pub fn ligand_rings(system: &MolecularSystem) -> Result<Vec<AromaticRing>, EngineError> {
    ligand_ring_candidates(system)
        .into_iter()
        .filter(|ring| ring_is_flat(system, ring))
        .map(|ring| aromatic_marker(system, &ring))
        .collect()
}

fn template_rings(
    system: &MolecularSystem,
    template: &ResidueRingTemplate,
) -> Result<Vec<AromaticRing>, EngineError> {
    let mut rings = Vec::new();
    for residue in system
        .residues_iter()
        .filter(|r| template.residue_names.contains(&r.canonical_name()))
    {
        let members: Vec<usize> = system
            .residue_atoms(residue)
            .filter(|a| template.ring_atoms.contains(&a.name.as_str()))
            .map(|a| a.index)
            .collect();
        if members.len() < 3 {
            debug!(
                residue = %residue.key,
                ring = template.label,
                found = members.len(),
                "Skipping residue ring with too few atoms."
            );
            continue;
        }
        rings.push(aromatic_marker(system, &members)?);
    }
    Ok(rings)
}

/// Aromatic rings of PHE, TYR, HIS and TRP residues, template by template.
pub fn protein_rings(system: &MolecularSystem) -> Result<Vec<AromaticRing>, EngineError> {
    let mut rings = Vec::new();
    for template in &RESIDUE_RING_TEMPLATES {
        rings.extend(template_rings(system, template)?);
    }
    Ok(rings)
}

#[instrument(skip_all, name = "aromatic_ring_task")]
pub fn run(system: &MolecularSystem) -> Result<Vec<AromaticRing>, EngineError> {
    let mut rings = ligand_rings(system)?;
    let ligand_count = rings.len();
    rings.extend(protein_rings(system)?);
    info!(
        ligand = ligand_count,
        protein = rings.len() - ligand_count,
        "Aromatic rings assigned."
    );
    Ok(rings)
}
