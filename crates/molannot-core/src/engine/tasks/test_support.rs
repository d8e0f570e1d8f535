use crate::core::models::atom::Atom;
use crate::core::models::residue::ResidueKey;
use crate::core::models::system::{MolecularSystem, MolecularSystemBuilder};
use crate::core::utils::geometry::test_support::place_atom;
use nalgebra::{Point3, Vector3};

/// Builds a single-residue ligand ("LIG" 1, chain X) from `(name, element, xyz)`
/// triples and symmetric bonds given as 1-based index pairs.
pub fn ligand_system(atoms: &[(&str, &str, [f64; 3])], bonds: &[(usize, usize)]) -> MolecularSystem {
    let mut builder = MolecularSystemBuilder::new();
    add_ligand(&mut builder, "LIG", 1, atoms, bonds);
    builder.build()
}

/// Adds a ligand residue; bond indices are relative to its first atom (1-based).
pub fn add_ligand(
    builder: &mut MolecularSystemBuilder,
    res_name: &str,
    seq: isize,
    atoms: &[(&str, &str, [f64; 3])],
    bonds: &[(usize, usize)],
) -> Vec<usize> {
    let key = ResidueKey::new(res_name, seq, 'X');
    let indices: Vec<usize> = atoms
        .iter()
        .map(|&(name, element, [x, y, z])| {
            builder.add_atom(Atom::new(name, element, &key, Point3::new(x, y, z)))
        })
        .collect();
    for &(a, b) in bonds {
        builder.add_bond(indices[a - 1], indices[b - 1]).unwrap();
    }
    indices
}

fn hexagon(radius: f64, k: usize, z: f64) -> [f64; 3] {
    let angle = (60.0 * k as f64).to_radians();
    [radius * angle.cos(), radius * angle.sin(), z]
}

/// Planar benzene: carbons 1..=6 around the ring, hydrogens 7..=12.
pub fn benzene() -> MolecularSystem {
    let names = ["C1", "C2", "C3", "C4", "C5", "C6"];
    let h_names = ["H1", "H2", "H3", "H4", "H5", "H6"];
    let mut atoms: Vec<(&str, &str, [f64; 3])> =
        (0..6).map(|k| (names[k], "C", hexagon(1.39, k, 0.0))).collect();
    atoms.extend((0..6).map(|k| (h_names[k], "H", hexagon(2.47, k, 0.0))));
    let mut bonds: Vec<(usize, usize)> = (1..=6).map(|k| (k, k % 6 + 1)).collect();
    bonds.extend((1..=6).map(|k| (k, k + 6)));
    ligand_system(&atoms, &bonds)
}

/// Chair cyclohexane carbons without hydrogens; every ring torsion is about 59 degrees.
pub fn chair_cyclohexane() -> MolecularSystem {
    let names = ["C1", "C2", "C3", "C4", "C5", "C6"];
    let atoms: Vec<(&str, &str, [f64; 3])> = (0..6)
        .map(|k| {
            let z = if k % 2 == 0 { 0.25 } else { -0.25 };
            (names[k], "C", hexagon(1.44, k, z))
        })
        .collect();
    let bonds: Vec<(usize, usize)> = (1..=6).map(|k| (k, k % 6 + 1)).collect();
    ligand_system(&atoms, &bonds)
}

/// Appends an ALA backbone (N, CA, C, O per residue) with the given `(phi, psi)`
/// per residue, numbered from `first_seq` on `chain` and shifted by `offset`.
/// The first residue's phi and the last residue's psi only place atoms that
/// the classifier never measures.
pub fn add_peptide(
    builder: &mut MolecularSystemBuilder,
    chain: char,
    first_seq: isize,
    phi_psi: &[(f64, f64)],
    offset: Vector3<f64>,
) {
    let mut backbone: Vec<[Point3<f64>; 3]> = Vec::with_capacity(phi_psi.len());
    let n = Point3::origin();
    let ca = Point3::new(1.458, 0.0, 0.0);
    let c = ca + Vector3::new(68.8_f64.to_radians().cos(), 68.8_f64.to_radians().sin(), 0.0) * 1.525;
    backbone.push([n, ca, c]);

    for i in 1..phi_psi.len() {
        let [n0, ca0, c0] = backbone[i - 1];
        let n1 = place_atom(&n0, &ca0, &c0, 1.329, 116.2, phi_psi[i - 1].1);
        let ca1 = place_atom(&ca0, &c0, &n1, 1.458, 121.7, 180.0);
        let c1 = place_atom(&c0, &n1, &ca1, 1.525, 111.2, phi_psi[i].0);
        backbone.push([n1, ca1, c1]);
    }

    for (i, [n, ca, c]) in backbone.iter().enumerate() {
        let o = place_atom(n, ca, c, 1.231, 120.5, phi_psi[i].1 + 180.0);
        let key = ResidueKey::new("ALA", first_seq + i as isize, chain);
        for (name, element, position) in [("N", "N", n), ("CA", "C", ca), ("C", "C", c), ("O", "O", &o)] {
            builder.add_atom(Atom::new(name, element, &key, position + offset));
        }
    }
}

pub fn peptide(phi_psi: &[(f64, f64)]) -> MolecularSystem {
    let mut builder = MolecularSystemBuilder::new();
    add_peptide(&mut builder, 'A', 1, phi_psi, Vector3::zeros());
    builder.build()
}
