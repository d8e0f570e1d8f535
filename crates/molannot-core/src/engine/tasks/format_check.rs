use crate::core::chem::residues::EXPECTED_RESIDUE_ATOMS;
use crate::core::models::residue::ResidueKey;
use crate::core::models::system::MolecularSystem;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// An atom a protein residue should carry but does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingAtom {
    pub residue: ResidueKey,
    pub atom: &'static str,
    /// Which analysis the atom is needed for.
    pub needed_for: &'static str,
}

/// Lists expected-but-absent atoms of every protein residue, logging each one.
///
/// Missing atoms never stop an annotation run; rules that need them skip the
/// residue instead.
#[instrument(skip_all, name = "format_check_task")]
pub fn run(system: &MolecularSystem) -> Vec<MissingAtom> {
    let mut missing = Vec::new();
    for residue in system.residues_iter().filter(|r| r.is_protein()) {
        let present: HashSet<&str> = system
            .residue_atoms(residue)
            .map(|a| a.name.as_str())
            .collect();
        let name = residue.canonical_name();

        for expected in EXPECTED_RESIDUE_ATOMS
            .iter()
            .filter(|e| e.residue_names.is_empty() || e.residue_names.contains(&name))
        {
            for &atom in expected.atoms.iter().filter(|a| !present.contains(*a)) {
                warn!(
                    residue = %residue.key,
                    atom,
                    needed_for = expected.needed_for,
                    "Residue is missing an expected atom."
                );
                missing.push(MissingAtom {
                    residue: residue.key.clone(),
                    atom,
                    needed_for: expected.needed_for,
                });
            }
        }
    }
    info!(missing = missing.len(), "Protein format check finished.");
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::system::MolecularSystemBuilder;
    use nalgebra::Point3;

    fn system_with(residues: &[(&str, isize, &[&str])]) -> MolecularSystem {
        let mut builder = MolecularSystemBuilder::new();
        for &(res_name, seq, atoms) in residues {
            let key = ResidueKey::new(res_name, seq, 'A');
            for name in atoms {
                builder.add_atom(Atom::new(name, &name[..1], &key, Point3::origin()));
            }
        }
        builder.build()
    }

    #[test]
    fn complete_residues_report_nothing() {
        let system = system_with(&[
            ("GLY", 1, &["N", "CA", "C", "O"]),
            ("LYS", 2, &["N", "CA", "C", "O", "NZ"]),
            ("LIG", 3, &["C1"]),
        ]);
        assert!(run(&system).is_empty());
    }

    #[test]
    fn missing_atoms_are_reported_per_residue() {
        let system = system_with(&[
            ("ALA", 1, &["N", "C"]),
            ("GLU", 2, &["N", "CA", "C", "OE1"]),
        ]);
        let missing = run(&system);
        let summary: Vec<(String, &str, &str)> = missing
            .iter()
            .map(|m| (m.residue.to_string(), m.atom, m.needed_for))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("ALA1:A".to_string(), "CA", "secondary structure"),
                ("GLU2:A".to_string(), "OE2", "salt-bridge interactions"),
            ]
        );
    }

    #[test]
    fn histidine_reports_missing_ring_atoms() {
        let system = system_with(&[("HIE", 7, &["N", "CA", "C", "CG", "ND1", "CD2", "NE2"])]);
        let atoms: Vec<&str> = run(&system).iter().map(|m| m.atom).collect();
        assert_eq!(atoms, vec!["CE1"]);
    }
}
