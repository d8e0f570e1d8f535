use crate::core::models::annotations::SecondaryStructure;
use crate::core::models::atom::{Atom, AtomRole};
use crate::core::models::residue::ResiduePosition;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::dihedral_degrees;
use crate::engine::error::EngineError;
use nalgebra::distance;
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace};

/// Two alpha carbons closer than this (in Angstroms) count as in contact.
pub const CA_CONTACT_DISTANCE: f64 = 6.0;

const HELIX_WINDOW: usize = 6;
const HELIX_PATTERNS: [(usize, usize); 10] = [
    (1, 1),
    (2, 1),
    (3, 1),
    (4, 1),
    (1, 2),
    (2, 2),
    (3, 2),
    (1, 3),
    (2, 3),
    (1, 4),
];

const SHEET_WINDOW: usize = 4;
const SHEET_PATTERNS: [(usize, usize); 3] = [(1, 1), (2, 1), (1, 2)];

const HELIX_PHASE: &str = "helix refinement";
const SHEET_PHASE: &str = "sheet refinement";

/// Secondary-structure labels keyed by residue position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureAssignment {
    labels: HashMap<ResiduePosition, SecondaryStructure>,
}

impl StructureAssignment {
    /// Label at `position`; unknown positions read as [`SecondaryStructure::Other`].
    pub fn get(&self, position: &ResiduePosition) -> SecondaryStructure {
        self.labels.get(position).copied().unwrap_or_default()
    }

    pub fn set(&mut self, position: ResiduePosition, label: SecondaryStructure) {
        self.labels.insert(position, label);
    }

    pub fn labels(&self) -> &HashMap<ResiduePosition, SecondaryStructure> {
        &self.labels
    }

    pub fn count(&self, label: SecondaryStructure) -> usize {
        self.labels.values().filter(|&&l| l == label).count()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn is_helical(phi: f64, psi: f64) -> bool {
    phi > -145.0 && phi < -35.0 && psi > -70.0 && psi < 50.0
}

fn is_extended(phi: f64, psi: f64) -> bool {
    (phi >= -180.0 && phi < -40.0 && psi > 90.0 && psi <= 180.0)
        || (phi >= -180.0 && phi < -70.0 && psi <= -165.0)
}

fn find_named<'a>(half: &[&'a Atom], name: &str) -> Option<&'a Atom> {
    half.iter().copied().find(|a| a.name == name)
}

/// Backbone torsions of two consecutive residues taken from an 8-atom window,
/// returned as `(phi, psi)` in degrees; `None` when N, CA or C is missing.
fn window_torsions(first: &[&Atom], second: &[&Atom]) -> Option<(f64, f64)> {
    let (n1, ca1, c1) = (
        find_named(first, "N")?,
        find_named(first, "CA")?,
        find_named(first, "C")?,
    );
    let (n2, ca2, c2) = (
        find_named(second, "N")?,
        find_named(second, "CA")?,
        find_named(second, "C")?,
    );
    let phi = dihedral_degrees(&c1.position, &n2.position, &ca2.position, &c2.position);
    let psi = dihedral_degrees(&n1.position, &ca1.position, &c1.position, &n2.position);
    Some((phi, psi))
}

fn is_residue_pair_window(window: &[&Atom]) -> bool {
    let (first, second) = window.split_at(4);
    first.iter().all(|a| a.res_seq == first[0].res_seq)
        && second.iter().all(|a| a.res_seq == second[0].res_seq)
        && window[7].res_seq == window[0].res_seq + 1
        && window[7].chain_id == window[0].chain_id
}

/// Labels every residue from backbone torsions alone.
///
/// All positions start as OTHER. Each 8-atom run of backbone atoms that covers
/// two consecutive residues of one chain labels both residues ALPHA or BETA
/// when its `(phi, psi)` falls in the corresponding region.
pub fn initial_assignment(system: &MolecularSystem) -> StructureAssignment {
    let mut assignment = StructureAssignment::default();
    for residue in system.residues_iter() {
        assignment.set(residue.key.position(), SecondaryStructure::Other);
    }

    let backbone: Vec<&Atom> = system
        .atoms_iter()
        .filter(|a| a.role == AtomRole::Backbone)
        .collect();

    for window in backbone.windows(8) {
        if !is_residue_pair_window(window) {
            continue;
        }
        let (first, second) = window.split_at(4);
        let Some((phi, psi)) = window_torsions(first, second) else {
            trace!(
                residue = first[0].res_seq,
                chain = %first[0].chain_id,
                "Backbone window lacks N, CA or C."
            );
            continue;
        };

        let positions = [first[0].residue_position(), second[0].residue_position()];
        let mut label = None;
        if is_helical(phi, psi) {
            label = Some(SecondaryStructure::Alpha);
        }
        if is_extended(phi, psi) {
            label = Some(SecondaryStructure::Beta);
        }
        if let Some(label) = label {
            for position in positions {
                assignment.set(position, label);
            }
        }
    }
    assignment
}

/// Alpha carbons of protein residues, in index order.
pub fn alpha_carbons(system: &MolecularSystem) -> Vec<&Atom> {
    system
        .atoms_iter()
        .filter(|a| a.role.is_protein() && a.name == "CA")
        .collect()
}

fn label_of(assignment: &StructureAssignment, atom: &Atom) -> SecondaryStructure {
    assignment.get(&atom.residue_position())
}

/// Demotes runs of `label` that are bounded on both sides inside a window of
/// consecutively numbered alpha carbons. `patterns` are `(start, len)` pairs
/// within the window.
fn demote_bounded_runs(
    cas: &[&Atom],
    assignment: &mut StructureAssignment,
    label: SecondaryStructure,
    window_len: usize,
    patterns: &[(usize, usize)],
) {
    for window in cas.windows(window_len) {
        if !window.windows(2).all(|p| p[1].res_seq == p[0].res_seq + 1) {
            continue;
        }
        for &(start, len) in patterns {
            let run = &window[start..start + len];
            let bounded = label_of(assignment, window[start - 1]) != label
                && label_of(assignment, window[start + len]) != label;
            if bounded && run.iter().all(|a| label_of(assignment, a) == label) {
                for atom in run {
                    assignment.set(atom.residue_position(), SecondaryStructure::Other);
                }
            }
        }
    }
}

fn helix_sweep(cas: &[&Atom], assignment: &mut StructureAssignment) {
    for ca in cas {
        if label_of(assignment, ca) != SecondaryStructure::Alpha {
            continue;
        }
        let supported = cas.iter().any(|other| {
            (other.res_seq - ca.res_seq).abs() == 3
                && label_of(assignment, other) == SecondaryStructure::Alpha
                && distance(&ca.position, &other.position) < CA_CONTACT_DISTANCE
        });
        if !supported {
            assignment.set(ca.residue_position(), SecondaryStructure::Other);
        }
    }
    demote_bounded_runs(
        cas,
        assignment,
        SecondaryStructure::Alpha,
        HELIX_WINDOW,
        &HELIX_PATTERNS,
    );
}

fn sheet_sweep(cas: &[&Atom], assignment: &mut StructureAssignment) {
    for ca in cas {
        if label_of(assignment, ca) != SecondaryStructure::Beta {
            continue;
        }
        let paired = cas.iter().any(|other| {
            other.index != ca.index
                && other.chain_id == ca.chain_id
                && (other.res_seq - ca.res_seq).abs() > 2
                && label_of(assignment, other) == SecondaryStructure::Beta
                && distance(&ca.position, &other.position) < CA_CONTACT_DISTANCE
        });
        if !paired {
            assignment.set(ca.residue_position(), SecondaryStructure::Other);
        }
    }
    demote_bounded_runs(
        cas,
        assignment,
        SecondaryStructure::Beta,
        SHEET_WINDOW,
        &SHEET_PATTERNS,
    );
}

/// Repeats `sweep` until a full sweep changes nothing and returns the number
/// of sweeps run, the final unchanged one included.
fn refine_to_fixed_point(
    phase: &'static str,
    cas: &[&Atom],
    assignment: &mut StructureAssignment,
    max_sweeps: Option<usize>,
    sweep: fn(&[&Atom], &mut StructureAssignment),
) -> Result<usize, EngineError> {
    let mut sweeps = 0;
    loop {
        if max_sweeps.is_some_and(|limit| sweeps >= limit) {
            return Err(EngineError::Convergence {
                phase,
                iterations: sweeps,
            });
        }
        let snapshot = assignment.clone();
        sweep(cas, assignment);
        sweeps += 1;
        if *assignment == snapshot {
            debug!(phase, sweeps, "Refinement converged.");
            return Ok(sweeps);
        }
    }
}

/// Drops helix labels that lack i/i+3 support or form runs too short to be a helix.
pub fn refine_helices(
    cas: &[&Atom],
    assignment: &mut StructureAssignment,
    max_sweeps: Option<usize>,
) -> Result<usize, EngineError> {
    refine_to_fixed_point(HELIX_PHASE, cas, assignment, max_sweeps, helix_sweep)
}

/// Drops strand labels without a partner strand or in runs too short to be a strand.
pub fn refine_sheets(
    cas: &[&Atom],
    assignment: &mut StructureAssignment,
    max_sweeps: Option<usize>,
) -> Result<usize, EngineError> {
    refine_to_fixed_point(SHEET_PHASE, cas, assignment, max_sweeps, sheet_sweep)
}

#[instrument(skip_all, name = "secondary_structure_task")]
pub fn run(
    system: &MolecularSystem,
    max_sweeps: Option<usize>,
) -> Result<StructureAssignment, EngineError> {
    let mut assignment = initial_assignment(system);
    let cas = alpha_carbons(system);
    let helix_sweeps = refine_helices(&cas, &mut assignment, max_sweeps)?;
    let sheet_sweeps = refine_sheets(&cas, &mut assignment, max_sweeps)?;
    info!(
        alpha = assignment.count(SecondaryStructure::Alpha),
        beta = assignment.count(SecondaryStructure::Beta),
        other = assignment.count(SecondaryStructure::Other),
        helix_sweeps,
        sheet_sweeps,
        "Secondary structure assigned."
    );
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::ResidueKey;
    use crate::core::models::system::MolecularSystemBuilder;
    use crate::engine::tasks::test_support::{add_ligand, add_peptide, peptide};
    use nalgebra::{Point3, Vector3};

    const HELIX: (f64, f64) = (-60.0, -45.0);
    const STRAND: (f64, f64) = (-120.0, 130.0);

    fn labels(assignment: &StructureAssignment, chain: char, seqs: std::ops::RangeInclusive<isize>) -> String {
        seqs.map(|seq| match assignment.get(&ResiduePosition::new(chain, seq)) {
            SecondaryStructure::Alpha => 'A',
            SecondaryStructure::Beta => 'B',
            SecondaryStructure::Other => 'O',
        })
        .collect()
    }

    fn seeded(pattern: &str) -> StructureAssignment {
        let mut assignment = StructureAssignment::default();
        for (k, c) in pattern.chars().enumerate() {
            let label = match c {
                'A' => SecondaryStructure::Alpha,
                'B' => SecondaryStructure::Beta,
                _ => SecondaryStructure::Other,
            };
            assignment.set(ResiduePosition::new('A', k as isize + 1), label);
        }
        assignment
    }

    #[test]
    fn helical_torsions_label_both_residues_alpha() {
        let system = peptide(&[HELIX, HELIX]);
        let assignment = initial_assignment(&system);
        assert_eq!(labels(&assignment, 'A', 1..=2), "AA");
    }

    #[test]
    fn extended_torsions_label_both_residues_beta() {
        let system = peptide(&[STRAND, STRAND]);
        assert_eq!(labels(&initial_assignment(&system), 'A', 1..=2), "BB");

        let system = peptide(&[(-150.0, -170.0), (-150.0, -170.0)]);
        assert_eq!(labels(&initial_assignment(&system), 'A', 1..=2), "BB");
    }

    #[test]
    fn left_handed_torsions_stay_other() {
        let system = peptide(&[(60.0, 60.0), (60.0, 60.0)]);
        assert_eq!(labels(&initial_assignment(&system), 'A', 1..=2), "OO");
    }

    #[test]
    fn every_residue_position_is_labelled() {
        let mut builder = MolecularSystemBuilder::new();
        add_peptide(&mut builder, 'A', 1, &[HELIX, HELIX, HELIX], Vector3::zeros());
        add_ligand(&mut builder, "HEM", 500, &[("FE", "FE", [20.0, 0.0, 0.0])], &[]);
        let system = builder.build();

        let assignment = run(&system, None).unwrap();
        assert_eq!(assignment.len(), 4);
        assert_eq!(assignment.get(&ResiduePosition::new('X', 500)), SecondaryStructure::Other);
    }

    #[test]
    fn window_without_carbonyl_carbon_is_skipped() {
        let mut builder = MolecularSystemBuilder::new();
        let first = ResidueKey::new("ALA", 1, 'A');
        let second = ResidueKey::new("ALA", 2, 'A');
        for (name, x) in [("N", 0.0), ("CA", 1.5), ("CA", 2.5), ("O", 3.5)] {
            builder.add_atom(Atom::new(name, &name[..1], &first, Point3::new(x, 0.0, 0.0)));
        }
        for (name, x) in [("N", 4.5), ("CA", 5.5), ("C", 6.5), ("O", 7.5)] {
            builder.add_atom(Atom::new(name, &name[..1], &second, Point3::new(x, 1.0, 0.0)));
        }
        let assignment = initial_assignment(&builder.build());
        assert_eq!(labels(&assignment, 'A', 1..=2), "OO");
    }

    #[test]
    fn windows_across_a_chain_break_are_ignored() {
        let mut builder = MolecularSystemBuilder::new();
        add_peptide(&mut builder, 'A', 1, &[HELIX], Vector3::zeros());
        add_peptide(&mut builder, 'B', 2, &[HELIX], Vector3::new(3.0, 0.0, 0.0));
        let assignment = initial_assignment(&builder.build());
        assert_eq!(labels(&assignment, 'A', 1..=1), "O");
        assert_eq!(labels(&assignment, 'B', 2..=2), "O");
    }

    #[test]
    fn ideal_helix_survives_refinement() {
        let system = peptide(&[HELIX; 10]);
        let assignment = run(&system, None).unwrap();
        assert_eq!(labels(&assignment, 'A', 1..=10), "AAAAAAAAAA");
        assert!(system.atoms_iter().all(|a| a.structure == SecondaryStructure::Other));
    }

    #[test]
    fn lone_strand_is_demoted() {
        let system = peptide(&[STRAND; 6]);
        assert_eq!(labels(&initial_assignment(&system), 'A', 1..=6), "BBBBBB");
        let assignment = run(&system, None).unwrap();
        assert_eq!(labels(&assignment, 'A', 1..=6), "OOOOOO");
    }

    #[test]
    fn paired_strands_stay_beta() {
        let mut builder = MolecularSystemBuilder::new();
        add_peptide(&mut builder, 'A', 1, &[STRAND; 5], Vector3::zeros());
        add_peptide(&mut builder, 'A', 20, &[STRAND; 5], Vector3::new(0.0, 0.0, 4.8));
        let assignment = run(&builder.build(), None).unwrap();
        assert_eq!(labels(&assignment, 'A', 1..=5), "BBBBB");
        assert_eq!(labels(&assignment, 'A', 20..=24), "BBBBB");
    }

    #[test]
    fn short_helical_runs_are_demoted_over_two_sweeps() {
        let system = peptide(&[HELIX; 12]);
        let cas = alpha_carbons(&system);
        let mut assignment = seeded("AOAOAAAAAAAA");

        let sweeps = refine_helices(&cas, &mut assignment, None).unwrap();
        assert_eq!(sweeps, 2);
        assert_eq!(labels(&assignment, 'A', 1..=12), "OOOOAAAAAAAA");
    }

    #[test]
    fn demotions_cascade_until_nothing_changes() {
        let system = peptide(&[HELIX; 12]);
        let cas = alpha_carbons(&system);

        let mut assignment = seeded("AAAAAOAOAAAA");
        assert_eq!(refine_helices(&cas, &mut assignment, None).unwrap(), 3);
        assert_eq!(labels(&assignment, 'A', 1..=12), "OOOOOOOOOOOO");

        let mut stable = seeded("AAOAAAAAAOAA");
        assert_eq!(refine_helices(&cas, &mut stable, None).unwrap(), 1);
        assert_eq!(labels(&stable, 'A', 1..=12), "AAOAAAAAAOAA");
    }

    #[test]
    fn sweep_cap_reports_non_convergence() {
        let system = peptide(&[HELIX; 12]);
        let cas = alpha_carbons(&system);

        let mut assignment = seeded("AOAOAAAAAAAA");
        let err = refine_helices(&cas, &mut assignment, Some(1)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Convergence {
                phase: "helix refinement",
                iterations: 1
            }
        ));

        let mut assignment = seeded("AOAOAAAAAAAA");
        assert_eq!(refine_helices(&cas, &mut assignment, Some(2)).unwrap(), 2);
    }

    #[test]
    fn stable_structure_converges_within_a_single_sweep_cap() {
        let system = peptide(&[HELIX; 10]);
        assert!(run(&system, Some(1)).is_ok());
    }

    #[test]
    fn applied_labels_are_uniform_within_residues() {
        let mut system = peptide(&[HELIX; 8]);
        let assignment = run(&system, None).unwrap();
        system.apply_secondary_structure(assignment.labels());

        for residue in system.residues_iter() {
            let first = system.structure_of_residue(&residue.key).unwrap();
            assert!(system.residue_atoms(residue).all(|a| a.structure == first));
        }
        assert_eq!(
            system.structure_of_atom(1),
            Some(SecondaryStructure::Alpha)
        );
    }
}
