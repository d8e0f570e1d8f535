use crate::core::chem::residues::{RESIDUE_CHARGE_RULES, ResidueChargeRule};
use crate::core::models::annotations::ChargedGroup;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::average_point;
use nalgebra::Point3;
use tracing::{info, instrument, trace};

/// Charged groups produced by one residue rule, in residue load order.
///
/// A residue is skipped unless every center atom is present and the averaged
/// center is away from the origin.
pub fn residue_charges(system: &MolecularSystem, rule: &ResidueChargeRule) -> Vec<ChargedGroup> {
    let mut groups = Vec::new();
    for residue in system
        .residues_iter()
        .filter(|r| rule.residue_names.contains(&r.canonical_name()))
    {
        let mut members = Vec::new();
        let mut centers: Vec<Point3<f64>> = Vec::new();
        for atom in system.residue_atoms(residue) {
            let name = atom.name.as_str();
            if rule.group_atoms.contains(&name) {
                members.push(atom.index);
            }
            if rule.center_atoms.contains(&name) {
                centers.push(atom.position);
            }
        }

        if centers.len() != rule.center_atoms.len() {
            trace!(residue = %residue.key, rule = rule.label, "Charge center atoms missing.");
            continue;
        }
        let Some(center) = average_point(&centers) else {
            continue;
        };
        if center.coords.norm() == 0.0 {
            trace!(residue = %residue.key, rule = rule.label, "Charge center at the origin.");
            continue;
        }
        groups.push(ChargedGroup::new(center, members, rule.sign));
    }
    groups
}

#[instrument(skip_all, name = "residue_charge_task")]
pub fn run(system: &MolecularSystem) -> Vec<ChargedGroup> {
    let groups: Vec<ChargedGroup> = RESIDUE_CHARGE_RULES
        .iter()
        .flat_map(|rule| residue_charges(system, rule))
        .collect();
    let positive = groups.iter().filter(|g| g.sign.is_positive()).count();
    info!(
        positive,
        negative = groups.len() - positive,
        "Residue charges assigned."
    );
    groups
}
