use crate::core::models::annotations::ChargeSign;
use phf::{Set, phf_set};

/// Residue names treated as standard protein residues, including common
/// protonation-state variants.
pub static PROTEIN_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "ASH", "ASX", "CYS", "CYM", "CYX", "GLN",
    "GLU", "GLH", "GLX", "GLY", "HIS", "HID", "HIE", "HIP", "ILE", "LEU",
    "LYS", "LYN", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
};

/// Atom names that make up the protein backbone.
pub static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! { "N", "CA", "C", "O" };

/// Returns the last three characters of a residue name.
///
/// Prefixed names such as `"AHIS"` or `"BGLU"` (alternate locations) resolve to
/// the plain three-letter code.
pub fn canonical_residue_name(name: &str) -> &str {
    let trimmed = name.trim();
    let mut start = trimmed.len();
    for (count, (idx, _)) in trimmed.char_indices().rev().enumerate() {
        if count == 3 {
            break;
        }
        start = idx;
    }
    &trimmed[start..]
}

pub fn is_protein_residue(name: &str) -> bool {
    PROTEIN_RESIDUE_NAMES.contains(canonical_residue_name(name))
}

/// Residue-level charge rule: which residues it applies to, which atoms form
/// the group and which atoms define its center.
#[derive(Debug, Clone, Copy)]
pub struct ResidueChargeRule {
    pub label: &'static str,
    pub residue_names: &'static [&'static str],
    pub group_atoms: &'static [&'static str],
    pub center_atoms: &'static [&'static str],
    pub sign: ChargeSign,
}

pub const RESIDUE_CHARGE_RULES: [ResidueChargeRule; 5] = [
    ResidueChargeRule {
        label: "lysine",
        residue_names: &["LYS", "LYN"],
        group_atoms: &["NZ", "HZ1", "HNZ1", "HZ2", "HNZ2", "HZ3", "HNZ3"],
        center_atoms: &["NZ"],
        sign: ChargeSign::Positive,
    },
    ResidueChargeRule {
        label: "arginine",
        residue_names: &["ARG"],
        group_atoms: &[
            "NH1", "NH2", "2HH2", "HN22", "1HH2", "HN12", "CZ", "2HH1", "HN21", "1HH1", "HN11",
        ],
        center_atoms: &["NH1", "NH2"],
        sign: ChargeSign::Positive,
    },
    ResidueChargeRule {
        label: "histidine",
        residue_names: &["HIS", "HID", "HIE", "HIP"],
        group_atoms: &["NE2", "ND1", "HE2", "HD1", "CE1", "CD2", "CG"],
        center_atoms: &["NE2", "ND1"],
        sign: ChargeSign::Positive,
    },
    ResidueChargeRule {
        label: "glutamate",
        residue_names: &["GLU", "GLH", "GLX"],
        group_atoms: &["OE1", "OE2", "CD"],
        center_atoms: &["OE1", "OE2"],
        sign: ChargeSign::Negative,
    },
    ResidueChargeRule {
        label: "aspartate",
        residue_names: &["ASP", "ASH", "ASX"],
        group_atoms: &["OD1", "OD2", "CG"],
        center_atoms: &["OD1", "OD2"],
        sign: ChargeSign::Negative,
    },
];

/// Named aromatic ring carried by a standard residue.
#[derive(Debug, Clone, Copy)]
pub struct ResidueRingTemplate {
    pub label: &'static str,
    pub residue_names: &'static [&'static str],
    pub ring_atoms: &'static [&'static str],
}

/// Protein ring templates, in output order.
pub const RESIDUE_RING_TEMPLATES: [ResidueRingTemplate; 5] = [
    ResidueRingTemplate {
        label: "phenylalanine",
        residue_names: &["PHE"],
        ring_atoms: &["CG", "CD1", "CE1", "CZ", "CE2", "CD2"],
    },
    ResidueRingTemplate {
        label: "tyrosine",
        residue_names: &["TYR"],
        ring_atoms: &["CG", "CD1", "CE1", "CZ", "CE2", "CD2"],
    },
    ResidueRingTemplate {
        label: "histidine",
        residue_names: &["HIS", "HID", "HIE", "HIP"],
        ring_atoms: &["CG", "ND1", "CE1", "NE2", "CD2"],
    },
    ResidueRingTemplate {
        label: "tryptophan-5",
        residue_names: &["TRP"],
        ring_atoms: &["CG", "CD1", "NE1", "CE2", "CD2"],
    },
    ResidueRingTemplate {
        label: "tryptophan-6",
        residue_names: &["TRP"],
        ring_atoms: &["CE2", "CD2", "CE3", "CZ3", "CH2", "CZ2"],
    },
];

/// Atoms a residue family must carry, and what they are needed for.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedAtoms {
    /// Empty means every protein residue.
    pub residue_names: &'static [&'static str],
    pub atoms: &'static [&'static str],
    pub needed_for: &'static str,
}

pub const EXPECTED_RESIDUE_ATOMS: [ExpectedAtoms; 9] = [
    ExpectedAtoms {
        residue_names: &[],
        atoms: &["N", "C", "CA"],
        needed_for: "secondary structure",
    },
    ExpectedAtoms {
        residue_names: &["GLU", "GLH", "GLX"],
        atoms: &["OE1", "OE2"],
        needed_for: "salt-bridge interactions",
    },
    ExpectedAtoms {
        residue_names: &["ASP", "ASH", "ASX"],
        atoms: &["OD1", "OD2"],
        needed_for: "salt-bridge interactions",
    },
    ExpectedAtoms {
        residue_names: &["LYS", "LYN"],
        atoms: &["NZ"],
        needed_for: "pi-cation and salt-bridge interactions",
    },
    ExpectedAtoms {
        residue_names: &["ARG"],
        atoms: &["NH1", "NH2"],
        needed_for: "pi-cation and salt-bridge interactions",
    },
    ExpectedAtoms {
        residue_names: &["HIS", "HID", "HIE", "HIP"],
        atoms: &["NE2", "ND1"],
        needed_for: "pi-cation and salt-bridge interactions",
    },
    ExpectedAtoms {
        residue_names: &["PHE", "TYR"],
        atoms: &["CG", "CD1", "CD2", "CE1", "CE2", "CZ"],
        needed_for: "pi-pi and pi-cation interactions",
    },
    ExpectedAtoms {
        residue_names: &["TRP"],
        atoms: &["CG", "CD1", "CD2", "NE1", "CE2", "CE3", "CZ2", "CZ3", "CH2"],
        needed_for: "pi-pi and pi-cation interactions",
    },
    ExpectedAtoms {
        residue_names: &["HIS", "HID", "HIE", "HIP"],
        atoms: &["CG", "ND1", "CD2", "CE1", "NE2"],
        needed_for: "pi-pi and pi-cation interactions",
    },
];
