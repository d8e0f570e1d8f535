use molannot::engine::config::DEFAULT_BOND_TOLERANCE;

/// Values used when neither the config file nor the command line sets them.
pub struct DefaultsConfig {
    pub aromatic_rings: bool,
    pub charged_groups: bool,
    pub secondary_structure: bool,
    pub infer_ligand_bonds: bool,
    pub bond_tolerance: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            aromatic_rings: true,
            charged_groups: true,
            secondary_structure: true,
            infer_ligand_bonds: false,
            bond_tolerance: DEFAULT_BOND_TOLERANCE,
        }
    }
}
