use crate::core::chem::elements::is_metal_cation;
use crate::core::models::annotations::{ChargeSign, ChargedGroup};
use crate::core::models::atom::Atom;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::{angle_between, average_point};
use nalgebra::Point3;
use tracing::{debug, info, instrument, trace};

const TETRAHEDRAL_ANGLE_DEG: f64 = 109.0;
const TETRAHEDRAL_TOLERANCE_DEG: f64 = 5.0;

/// Ligand charge rule families, applied in the order of [`ChargeRuleClass::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeRuleClass {
    Metal,
    Nitrogen,
    Carbon,
    Phosphorus,
    Sulfur,
}

impl ChargeRuleClass {
    pub const ALL: [ChargeRuleClass; 5] = [
        ChargeRuleClass::Metal,
        ChargeRuleClass::Nitrogen,
        ChargeRuleClass::Carbon,
        ChargeRuleClass::Phosphorus,
        ChargeRuleClass::Sulfur,
    ];

    /// The family an atom of `element` is examined by, if any.
    pub fn of_element(element: &str) -> Option<Self> {
        match element {
            "N" => Some(ChargeRuleClass::Nitrogen),
            "C" => Some(ChargeRuleClass::Carbon),
            "P" => Some(ChargeRuleClass::Phosphorus),
            "S" => Some(ChargeRuleClass::Sulfur),
            e if is_metal_cation(e) => Some(ChargeRuleClass::Metal),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChargeRuleClass::Metal => "metal",
            ChargeRuleClass::Nitrogen => "nitrogen",
            ChargeRuleClass::Carbon => "carbon",
            ChargeRuleClass::Phosphorus => "phosphorus",
            ChargeRuleClass::Sulfur => "sulfur",
        }
    }

    /// Charged groups this family finds on a single atom.
    fn groups_for(self, system: &MolecularSystem, atom: &Atom) -> Vec<ChargedGroup> {
        match self {
            ChargeRuleClass::Metal => vec![metal_cation(atom)],
            ChargeRuleClass::Nitrogen => charged_nitrogen(system, atom).into_iter().collect(),
            ChargeRuleClass::Carbon => guanidino(system, atom)
                .into_iter()
                .chain(carboxylate(system, atom))
                .collect(),
            ChargeRuleClass::Phosphorus => oxyanion(system, atom, 2).into_iter().collect(),
            ChargeRuleClass::Sulfur => oxyanion(system, atom, 3).into_iter().collect(),
        }
    }
}

fn metal_cation(atom: &Atom) -> ChargedGroup {
    ChargedGroup::new(atom.position, vec![atom.index], ChargeSign::Positive)
}

/// Quaternary nitrogen, or a three-connected nitrogen with tetrahedral geometry.
fn charged_nitrogen(system: &MolecularSystem, atom: &Atom) -> Option<ChargedGroup> {
    let neighbors = atom.neighbors();
    let charged = match neighbors.len() {
        4 => true,
        3 => {
            let positions: Vec<Point3<f64>> = neighbors
                .iter()
                .filter_map(|&n| system.atom(n).map(|a| a.position))
                .collect();
            if positions.len() != 3 {
                return None;
            }
            let center = &atom.position;
            let mean = [(0, 1), (0, 2), (1, 2)]
                .iter()
                .map(|&(i, j)| angle_between(&positions[i], center, &positions[j]).to_degrees())
                .sum::<f64>()
                / 3.0;
            trace!(atom = atom.index, mean_angle = mean, "Three-connected nitrogen.");
            (mean - TETRAHEDRAL_ANGLE_DEG).abs() < TETRAHEDRAL_TOLERANCE_DEG
        }
        _ => false,
    };
    charged.then(|| {
        let mut members = vec![atom.index];
        members.extend_from_slice(neighbors);
        ChargedGroup::new(atom.position, members, ChargeSign::Positive)
    })
}

/// Amidine and guanidine carbons (`H2N-C-NH2` with an sp3-like connector, or CN3).
fn guanidino(system: &MolecularSystem, atom: &Atom) -> Option<ChargedGroup> {
    if atom.num_neighbors() != 3 {
        return None;
    }
    let nitrogens = system.connected_atoms_of_element(atom.index, "N");
    if nitrogens.len() < 2 {
        return None;
    }

    let terminal: Vec<usize> = nitrogens
        .into_iter()
        .filter(|&n| system.connected_heavy_atoms(n).len() == 1)
        .collect();
    let connector = atom
        .neighbors()
        .iter()
        .copied()
        .find(|n| !terminal.contains(n))
        .and_then(|n| system.atom(n));

    match (terminal.as_slice(), connector) {
        ([_, _, _], None) => Some(ChargedGroup::new(
            atom.position,
            vec![atom.index],
            ChargeSign::Positive,
        )),
        (&[n1, n2], Some(connector)) if is_saturated_connector(connector) => {
            let positions: Vec<Point3<f64>> = [n1, n2]
                .iter()
                .filter_map(|&n| system.atom(n).map(|a| a.position))
                .collect();
            let center = average_point(&positions)?;
            let mut members = vec![atom.index, n1, n2];
            members.extend(system.connected_atoms_of_element(n1, "H"));
            members.extend(system.connected_atoms_of_element(n2, "H"));
            Some(ChargedGroup::new(center, members, ChargeSign::Positive))
        }
        _ => None,
    }
}

fn is_saturated_connector(connector: &Atom) -> bool {
    match connector.element.as_str() {
        "C" => connector.num_neighbors() == 4,
        "O" => connector.num_neighbors() == 2,
        "N" | "S" | "P" => true,
        _ => false,
    }
}

/// Three-connected carbon carrying exactly two singly-connected oxygens.
fn carboxylate(system: &MolecularSystem, atom: &Atom) -> Option<ChargedGroup> {
    if atom.num_neighbors() != 3 {
        return None;
    }
    let oxygens = system.connected_atoms_of_element(atom.index, "O");
    let &[o1, o2] = oxygens.as_slice() else {
        return None;
    };
    if !is_terminal(system, o1) || !is_terminal(system, o2) {
        return None;
    }
    let positions: Vec<Point3<f64>> = [o1, o2]
        .iter()
        .filter_map(|&o| system.atom(o).map(|a| a.position))
        .collect();
    let center = average_point(&positions)?;
    Some(ChargedGroup::new(
        center,
        vec![o1, atom.index, o2],
        ChargeSign::Negative,
    ))
}

/// Phosphate- and sulfonate-like centers with at least `min_terminal`
/// singly-connected oxygens.
fn oxyanion(system: &MolecularSystem, atom: &Atom, min_terminal: usize) -> Option<ChargedGroup> {
    let oxygens = system.connected_atoms_of_element(atom.index, "O");
    if oxygens.len() < min_terminal {
        return None;
    }
    let terminal = oxygens.iter().filter(|&&o| is_terminal(system, o)).count();
    if terminal < min_terminal {
        return None;
    }
    let mut members = vec![atom.index];
    members.extend(oxygens);
    Some(ChargedGroup::new(atom.position, members, ChargeSign::Negative))
}

fn is_terminal(system: &MolecularSystem, index: usize) -> bool {
    system.connected_heavy_atoms(index).len() == 1
}

/// Groups of one rule family over all ligand atoms, in index order.
pub fn family_charges(system: &MolecularSystem, class: ChargeRuleClass) -> Vec<ChargedGroup> {
    let groups: Vec<ChargedGroup> = system
        .ligand_atoms()
        .filter(|atom| ChargeRuleClass::of_element(&atom.element) == Some(class))
        .flat_map(|atom| class.groups_for(system, atom))
        .collect();
    debug!(family = class.label(), groups = groups.len(), "Ligand charge family scanned.");
    groups
}

#[instrument(skip_all, name = "ligand_charge_task")]
pub fn run(system: &MolecularSystem) -> Vec<ChargedGroup> {
    let groups: Vec<ChargedGroup> = ChargeRuleClass::ALL
        .iter()
        .flat_map(|&class| family_charges(system, class))
        .collect();
    let positive = groups.iter().filter(|g| g.sign.is_positive()).count();
    info!(
        positive,
        negative = groups.len() - positive,
        "Ligand charges assigned."
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::geometry::test_support::place_atom;
    use crate::engine::tasks::test_support::ligand_system;

    fn p(x: f64, y: f64, z: f64) -> [f64; 3] {
        [x, y, z]
    }

    #[test]
    fn element_maps_to_family() {
        assert_eq!(ChargeRuleClass::of_element("N"), Some(ChargeRuleClass::Nitrogen));
        assert_eq!(ChargeRuleClass::of_element("ZN"), Some(ChargeRuleClass::Metal));
        assert_eq!(ChargeRuleClass::of_element("S"), Some(ChargeRuleClass::Sulfur));
        assert_eq!(ChargeRuleClass::of_element("O"), None);
        assert_eq!(ChargeRuleClass::of_element("NA"), None);
    }

    #[test]
    fn quaternary_ammonium_is_positive_at_nitrogen() {
        let system = ligand_system(
            &[
                ("N1", "N", p(0.0, 0.0, 0.0)),
                ("C1", "C", p(1.5, 0.0, 0.0)),
                ("C2", "C", p(-0.5, 1.4, 0.0)),
                ("C3", "C", p(-0.5, -0.7, 1.2)),
                ("C4", "C", p(-0.5, -0.7, -1.2)),
            ],
            &[(1, 2), (1, 3), (1, 4), (1, 5)],
        );
        let groups = run(&system);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].atoms, vec![1, 2, 3, 4, 5]);
        assert_eq!(groups[0].center, Point3::origin());
        assert_eq!(groups[0].sign, ChargeSign::Positive);
    }

    fn pyramidal_nitrogen(angle_deg: f64) -> Vec<(&'static str, &'static str, [f64; 3])> {
        // Three substituents at 1.47 A, each making `angle_deg` with the others.
        let cos = angle_deg.to_radians().cos();
        let z = ((1.0 + 2.0 * cos) / 3.0).sqrt();
        let r = (1.0 - z * z).sqrt();
        let mut atoms = vec![("N1", "N", p(0.0, 0.0, 0.0))];
        for (k, name) in ["C1", "C2", "C3"].into_iter().enumerate() {
            let phi = (120.0 * k as f64).to_radians();
            atoms.push((name, "C", p(1.47 * r * phi.cos(), 1.47 * r * phi.sin(), -1.47 * z)));
        }
        atoms
    }

    #[test]
    fn tetrahedral_three_connected_nitrogen_is_positive() {
        let system = ligand_system(&pyramidal_nitrogen(108.0), &[(1, 2), (1, 3), (1, 4)]);
        let groups = run(&system);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].atoms, vec![1, 2, 3, 4]);
    }

    #[test]
    fn planar_three_connected_nitrogen_is_neutral() {
        let system = ligand_system(&pyramidal_nitrogen(119.9), &[(1, 2), (1, 3), (1, 4)]);
        assert!(run(&system).is_empty());
    }

    #[test]
    fn amidine_with_sp3_connector_is_positive_between_nitrogens() {
        let system = ligand_system(
            &[
                ("C1", "C", p(0.0, 0.0, 0.0)),
                ("N1", "N", p(1.2, 0.7, 0.0)),
                ("N2", "N", p(-1.2, 0.7, 0.0)),
                ("C2", "C", p(0.0, -1.5, 0.0)),
                ("H1", "H", p(2.1, 0.2, 0.0)),
                ("H2", "H", p(1.2, 1.7, 0.0)),
                ("H3", "H", p(-2.1, 0.2, 0.0)),
                ("H4", "H", p(-1.0, -1.9, 0.0)),
                ("H5", "H", p(0.5, -1.9, 0.9)),
                ("H6", "H", p(0.5, -1.9, -0.9)),
            ],
            &[(1, 2), (1, 3), (1, 4), (2, 5), (2, 6), (3, 7), (4, 8), (4, 9), (4, 10)],
        );
        let groups = run(&system);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].atoms, vec![1, 2, 3, 5, 6, 7]);
        assert_eq!(groups[0].center, Point3::new(0.0, 0.7, 0.0));
        assert!(groups[0].sign.is_positive());
    }

    #[test]
    fn amidine_with_sp2_connector_is_neutral() {
        let system = ligand_system(
            &[
                ("C1", "C", p(0.0, 0.0, 0.0)),
                ("N1", "N", p(1.2, 0.7, 0.0)),
                ("N2", "N", p(-1.2, 0.7, 0.0)),
                ("C2", "C", p(0.0, -1.5, 0.0)),
            ],
            &[(1, 2), (1, 3), (1, 4)],
        );
        assert!(run(&system).is_empty());
    }

    #[test]
    fn guanidinium_is_positive_at_carbon() {
        let system = ligand_system(
            &[
                ("C1", "C", p(0.0, 0.0, 0.0)),
                ("N1", "N", p(1.3, 0.0, 0.0)),
                ("N2", "N", p(-0.65, 1.13, 0.0)),
                ("N3", "N", p(-0.65, -1.13, 0.0)),
            ],
            &[(1, 2), (1, 3), (1, 4)],
        );
        let groups = run(&system);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].atoms, vec![1]);
        assert_eq!(groups[0].center, Point3::origin());
    }

    #[test]
    fn carboxylate_group_is_oxygen_carbon_oxygen() {
        let system = ligand_system(
            &[
                ("C1", "C", p(0.0, 0.0, 0.0)),
                ("O1", "O", p(1.1, 0.7, 0.0)),
                ("O2", "O", p(-1.1, 0.7, 0.0)),
                ("C2", "C", p(0.0, -1.5, 0.0)),
            ],
            &[(1, 2), (1, 3), (1, 4)],
        );
        let groups = run(&system);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].atoms, vec![2, 1, 3]);
        assert_eq!(groups[0].center, Point3::new(0.0, 0.7, 0.0));
        assert_eq!(groups[0].sign, ChargeSign::Negative);
    }

    #[test]
    fn ester_is_not_a_carboxylate() {
        let system = ligand_system(
            &[
                ("C1", "C", p(0.0, 0.0, 0.0)),
                ("O1", "O", p(1.1, 0.7, 0.0)),
                ("O2", "O", p(-1.1, 0.7, 0.0)),
                ("C2", "C", p(0.0, -1.5, 0.0)),
                ("C3", "C", p(-2.4, 0.2, 0.0)),
            ],
            &[(1, 2), (1, 3), (1, 4), (3, 5)],
        );
        assert!(run(&system).is_empty());
    }

    fn oxo_center(element: &'static str, oxygens: usize, esterified: usize) -> Vec<ChargedGroup> {
        let names = ["O1", "O2", "O3", "O4"];
        let mut atoms = vec![("X1", element, p(0.0, 0.0, 0.0))];
        let mut bonds = Vec::new();
        let directions = [p(1.0, 1.0, 1.0), p(-1.0, -1.0, 1.0), p(-1.0, 1.0, -1.0), p(1.0, -1.0, -1.0)];
        for k in 0..oxygens {
            let [x, y, z] = directions[k];
            atoms.push((names[k], "O", p(0.9 * x, 0.9 * y, 0.9 * z)));
            bonds.push((1, k + 2));
        }
        for k in 0..esterified {
            let [x, y, z] = directions[k];
            atoms.push(("C9", "C", p(1.7 * x, 1.7 * y, 1.7 * z)));
            bonds.push((k + 2, atoms.len()));
        }
        run(&ligand_system(&atoms, &bonds))
    }

    #[test]
    fn phosphate_needs_two_terminal_oxygens() {
        let groups = oxo_center("P", 4, 2);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].atoms, vec![1, 2, 3, 4, 5]);
        assert_eq!(groups[0].sign, ChargeSign::Negative);

        assert!(oxo_center("P", 4, 3).is_empty());
    }

    #[test]
    fn sulfonate_needs_three_terminal_oxygens() {
        let groups = oxo_center("S", 3, 0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].atoms, vec![1, 2, 3, 4]);

        assert!(oxo_center("S", 4, 2).is_empty());
        assert!(oxo_center("S", 2, 0).is_empty());
    }

    #[test]
    fn families_are_reported_in_fixed_order() {
        // Carboxylate first in index order, then a zinc and an ammonium.
        let a = Point3::new(5.0, 0.0, 0.0);
        let b = Point3::new(6.0, 0.0, 0.0);
        let c = Point3::new(6.0, 1.0, 0.0);
        let h = |torsion: f64| {
            let q = place_atom(&a, &b, &c, 1.0, 109.5, torsion);
            [q.x, q.y, q.z]
        };
        let system = ligand_system(
            &[
                ("C1", "C", p(0.0, 0.0, 0.0)),
                ("O1", "O", p(1.1, 0.7, 0.0)),
                ("O2", "O", p(-1.1, 0.7, 0.0)),
                ("C2", "C", p(0.0, -1.5, 0.0)),
                ("ZN", "ZN", p(10.0, 0.0, 0.0)),
                ("N1", "N", [c.x, c.y, c.z]),
                ("H1", "H", h(60.0)),
                ("H2", "H", h(180.0)),
                ("H3", "H", h(-60.0)),
                ("C3", "C", [b.x, b.y, b.z]),
            ],
            &[(1, 2), (1, 3), (1, 4), (6, 7), (6, 8), (6, 9), (6, 10)],
        );
        let groups = run(&system);
        let members: Vec<Vec<usize>> = groups.iter().map(|g| g.atoms.clone()).collect();
        assert_eq!(members, vec![vec![5], vec![6, 7, 8, 9, 10], vec![2, 1, 3]]);
    }

    #[test]
    fn protein_atoms_are_ignored() {
        use crate::core::models::atom::Atom;
        use crate::core::models::residue::ResidueKey;
        use crate::core::models::system::MolecularSystemBuilder;

        let mut builder = MolecularSystemBuilder::new();
        let key = ResidueKey::new("LYS", 1, 'A');
        let nz = builder.add_atom(Atom::new("NZ", "N", &key, Point3::origin()));
        for (k, name) in ["HZ1", "HZ2", "HZ3", "CE"].into_iter().enumerate() {
            let h = builder.add_atom(Atom::new(name, &name[..1], &key, Point3::new(k as f64 + 1.0, 0.0, 0.0)));
            builder.add_bond(nz, h).unwrap();
        }
        assert!(run(&builder.build()).is_empty());
    }
}
