use super::annotations::SecondaryStructure;
use super::residue::{ResidueKey, ResiduePosition};
use crate::core::chem::residues::{BACKBONE_ATOM_NAMES, is_protein_residue};
use nalgebra::Point3;

/// Classification of an atom by the kind of residue it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// N, CA, C or O of a standard protein residue.
    Backbone,
    /// Any other atom of a standard protein residue.
    Sidechain,
    /// Atom of a non-protein residue (ligands, ions, cofactors, solvent).
    #[default]
    Ligand,
}

impl AtomRole {
    /// Derives the role from the residue name and the atom name.
    pub fn classify(res_name: &str, atom_name: &str) -> Self {
        if !is_protein_residue(res_name) {
            AtomRole::Ligand
        } else if BACKBONE_ATOM_NAMES.contains(atom_name.trim()) {
            AtomRole::Backbone
        } else {
            AtomRole::Sidechain
        }
    }

    pub fn is_protein(self) -> bool {
        !matches!(self, AtomRole::Ligand)
    }
}

/// An atom of a molecular system.
///
/// Atoms are owned by [`MolecularSystem`](super::system::MolecularSystem) and
/// referenced everywhere else by their 1-based `index`. The neighbor list is
/// kept private so it can only be changed through the system builder, which
/// validates every index it is given.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// 1-based position in load order. Assigned by the builder.
    pub index: usize,
    /// Serial number from the input record, used only to resolve bond records.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O1").
    pub name: String,
    /// Uppercase element symbol.
    pub element: String,
    pub res_name: String,
    pub res_seq: isize,
    pub chain_id: char,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Partial charge from a PDBQT charge column, `0.0` when absent.
    pub partial_charge: f64,
    pub role: AtomRole,
    /// Label mirrored from the residue's secondary-structure assignment.
    pub structure: SecondaryStructure,
    pub(crate) neighbors: Vec<usize>,
}

impl Atom {
    /// Creates an unbonded atom belonging to `residue`.
    ///
    /// The role is derived from the residue and atom names; the index is left at
    /// zero until the atom is added to a system.
    pub fn new(name: &str, element: &str, residue: &ResidueKey, position: Point3<f64>) -> Self {
        Self {
            index: 0,
            serial: 0,
            name: name.trim().to_string(),
            element: element.trim().to_ascii_uppercase(),
            res_name: residue.name.clone(),
            res_seq: residue.seq,
            chain_id: residue.chain,
            position,
            partial_charge: 0.0,
            role: AtomRole::classify(&residue.name, name),
            structure: SecondaryStructure::default(),
            neighbors: Vec::new(),
        }
    }

    pub fn with_serial(mut self, serial: usize) -> Self {
        self.serial = serial;
        self
    }

    pub fn with_partial_charge(mut self, charge: f64) -> Self {
        self.partial_charge = charge;
        self
    }

    /// Indices of bonded atoms, in the order they were declared.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub fn num_neighbors(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_bonded_to(&self, other: usize) -> bool {
        self.neighbors.contains(&other)
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element == "H"
    }

    pub fn is_element(&self, element: &str) -> bool {
        self.element == element
    }

    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey::new(&self.res_name, self.res_seq, self.chain_id)
    }

    pub fn residue_position(&self) -> ResiduePosition {
        ResiduePosition::new(self.chain_id, self.res_seq)
    }

    /// Appends a neighbor unless it is already present or is the atom itself.
    /// Returns whether the list changed.
    pub(crate) fn push_neighbor(&mut self, other: usize) -> bool {
        if other == self.index || self.is_bonded_to(other) {
            return false;
        }
        self.neighbors.push(other);
        true
    }
}
