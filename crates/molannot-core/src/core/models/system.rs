use super::annotations::{AromaticRing, ChargedGroup, SecondaryStructure};
use super::atom::{Atom, AtomRole};
use super::residue::{Residue, ResidueKey, ResiduePosition};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Bond references atom index {index}, which is not in the system")]
    UnknownAtom { index: usize },
    #[error("Atom {index} cannot be bonded to itself")]
    SelfBond { index: usize },
}

/// A loaded structure: atoms with their bond graph, the residue table and the
/// annotations derived from them.
///
/// Atom indices are 1-based and dense (`1..=atom_count()`), assigned in load
/// order by [`MolecularSystemBuilder`].
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    atoms: Vec<Atom>,
    residues: Vec<Residue>,
    residue_map: HashMap<ResidueKey, usize>,
    charged_groups: Vec<ChargedGroup>,
    aromatic_rings: Vec<AromaticRing>,
}

impl MolecularSystem {
    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index.checked_sub(1)?)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains_atom(&self, index: usize) -> bool {
        (1..=self.atoms.len()).contains(&index)
    }

    /// Atoms outside standard protein residues, in index order.
    pub fn ligand_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter().filter(|a| a.role == AtomRole::Ligand)
    }

    pub fn neighbors_of(&self, index: usize) -> &[usize] {
        self.atom(index).map(Atom::neighbors).unwrap_or(&[])
    }

    /// Residues in the order their first atom was loaded.
    pub fn residues_iter(&self) -> impl Iterator<Item = &Residue> {
        self.residues.iter()
    }

    pub fn residue(&self, key: &ResidueKey) -> Option<&Residue> {
        self.residue_map.get(key).map(|&idx| &self.residues[idx])
    }

    /// Atoms of `residue` in load order.
    pub fn residue_atoms<'a>(&'a self, residue: &'a Residue) -> impl Iterator<Item = &'a Atom> + 'a {
        residue.atoms().iter().filter_map(move |&idx| self.atom(idx))
    }

    /// Neighbors of `index` whose element is `element`, in neighbor order.
    pub fn connected_atoms_of_element(&self, index: usize, element: &str) -> Vec<usize> {
        self.neighbors_of(index)
            .iter()
            .copied()
            .filter(|&n| self.atom(n).is_some_and(|a| a.is_element(element)))
            .collect()
    }

    /// Non-hydrogen neighbors of `index`, in neighbor order.
    pub fn connected_heavy_atoms(&self, index: usize) -> Vec<usize> {
        self.neighbors_of(index)
            .iter()
            .copied()
            .filter(|&n| self.atom(n).is_some_and(|a| !a.is_hydrogen()))
            .collect()
    }

    /// Adds a bond in both directions between two existing atoms.
    pub fn add_bond(&mut self, a: usize, b: usize) -> Result<(), GraphError> {
        self.check_bond(a, b)?;
        self.atoms[a - 1].push_neighbor(b);
        self.atoms[b - 1].push_neighbor(a);
        Ok(())
    }

    fn check_bond(&self, from: usize, to: usize) -> Result<(), GraphError> {
        for index in [from, to] {
            if !self.contains_atom(index) {
                return Err(GraphError::UnknownAtom { index });
            }
        }
        if from == to {
            return Err(GraphError::SelfBond { index: from });
        }
        Ok(())
    }

    pub fn charged_groups(&self) -> &[ChargedGroup] {
        &self.charged_groups
    }

    pub fn aromatic_rings(&self) -> &[AromaticRing] {
        &self.aromatic_rings
    }

    /// Replaces the charged-group annotations.
    pub fn set_charged_groups(&mut self, groups: Vec<ChargedGroup>) {
        self.charged_groups = groups;
    }

    /// Replaces the aromatic-ring annotations.
    pub fn set_aromatic_rings(&mut self, rings: Vec<AromaticRing>) {
        self.aromatic_rings = rings;
    }

    pub fn structure_of_atom(&self, index: usize) -> Option<SecondaryStructure> {
        self.atom(index).map(|a| a.structure)
    }

    pub fn structure_of_residue(&self, key: &ResidueKey) -> Option<SecondaryStructure> {
        let residue = self.residue(key)?;
        let first = *residue.atoms().first()?;
        self.structure_of_atom(first)
    }

    /// Writes per-position labels onto every atom. Positions missing from
    /// `labels` are reset to [`SecondaryStructure::Other`].
    pub fn apply_secondary_structure(&mut self, labels: &HashMap<ResiduePosition, SecondaryStructure>) {
        for atom in &mut self.atoms {
            atom.structure = labels
                .get(&atom.residue_position())
                .copied()
                .unwrap_or_default();
        }
    }
}

/// Incrementally assembles a [`MolecularSystem`].
///
/// Every bond is validated against the atoms added so far; a failed call leaves
/// the builder unchanged.
#[derive(Debug, Default)]
pub struct MolecularSystemBuilder {
    system: MolecularSystem,
    atom_serial_map: HashMap<usize, usize>,
}

impl MolecularSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an atom, assigns its 1-based index and returns it.
    ///
    /// Any neighbors already present on `atom` are discarded; bonds must go
    /// through [`declare_neighbors`](Self::declare_neighbors) or
    /// [`add_bond`](Self::add_bond).
    pub fn add_atom(&mut self, mut atom: Atom) -> usize {
        let index = self.system.atoms.len() + 1;
        atom.index = index;
        atom.neighbors.clear();

        let key = atom.residue_key();
        let residues = &mut self.system.residues;
        let res_idx = *self.system.residue_map.entry(key.clone()).or_insert_with(|| {
            residues.push(Residue::new(key));
            residues.len() - 1
        });
        self.system.residues[res_idx].atoms.push(index);

        if atom.serial != 0 {
            self.atom_serial_map.insert(atom.serial, index);
        }
        self.system.atoms.push(atom);
        index
    }

    /// Index of the most recent atom added with `serial`.
    pub fn index_of_serial(&self, serial: usize) -> Option<usize> {
        self.atom_serial_map.get(&serial).copied()
    }

    pub fn atom_count(&self) -> usize {
        self.system.atoms.len()
    }

    /// Records `neighbors` on `atom` only (one direction), as a bond record
    /// such as a CONECT line does. Duplicates are ignored.
    pub fn declare_neighbors(
        &mut self,
        atom: usize,
        neighbors: &[usize],
    ) -> Result<&mut Self, GraphError> {
        for &neighbor in neighbors {
            self.system.check_bond(atom, neighbor)?;
        }
        if !self.system.contains_atom(atom) {
            return Err(GraphError::UnknownAtom { index: atom });
        }
        let target = &mut self.system.atoms[atom - 1];
        for &neighbor in neighbors {
            target.push_neighbor(neighbor);
        }
        Ok(self)
    }

    /// Records a bond in both directions.
    pub fn add_bond(&mut self, a: usize, b: usize) -> Result<&mut Self, GraphError> {
        self.system.add_bond(a, b)?;
        Ok(self)
    }

    pub fn build(self) -> MolecularSystem {
        self.system
    }
}
