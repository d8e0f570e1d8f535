use thiserror::Error;

pub const DEFAULT_BOND_TOLERANCE: f64 = 1.2;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Selects which analyses an annotation run performs and how.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationConfig {
    pub aromatic_rings: bool,
    pub charged_groups: bool,
    pub secondary_structure: bool,
    /// Connect unbonded ligand atoms by distance before the analyses run.
    pub infer_ligand_bonds: bool,
    /// Multiplier applied to reference bond lengths during bond inference.
    pub bond_tolerance: f64,
    /// Upper bound on refinement sweeps per pass; `None` runs to the fixed point.
    pub max_refinement_sweeps: Option<usize>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            aromatic_rings: true,
            charged_groups: true,
            secondary_structure: true,
            infer_ligand_bonds: false,
            bond_tolerance: DEFAULT_BOND_TOLERANCE,
            max_refinement_sweeps: None,
        }
    }
}

impl AnnotationConfig {
    pub fn builder() -> AnnotationConfigBuilder {
        AnnotationConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct AnnotationConfigBuilder {
    aromatic_rings: Option<bool>,
    charged_groups: Option<bool>,
    secondary_structure: Option<bool>,
    infer_ligand_bonds: Option<bool>,
    bond_tolerance: Option<f64>,
    max_refinement_sweeps: Option<usize>,
}

impl AnnotationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aromatic_rings(mut self, enabled: bool) -> Self {
        self.aromatic_rings = Some(enabled);
        self
    }
    pub fn charged_groups(mut self, enabled: bool) -> Self {
        self.charged_groups = Some(enabled);
        self
    }
    pub fn secondary_structure(mut self, enabled: bool) -> Self {
        self.secondary_structure = Some(enabled);
        self
    }
    pub fn infer_ligand_bonds(mut self, enabled: bool) -> Self {
        self.infer_ligand_bonds = Some(enabled);
        self
    }
    pub fn bond_tolerance(mut self, tolerance: f64) -> Self {
        self.bond_tolerance = Some(tolerance);
        self
    }
    pub fn max_refinement_sweeps(mut self, sweeps: usize) -> Self {
        self.max_refinement_sweeps = Some(sweeps);
        self
    }

    pub fn build(self) -> Result<AnnotationConfig, ConfigError> {
        let defaults = AnnotationConfig::default();

        let bond_tolerance = self.bond_tolerance.unwrap_or(defaults.bond_tolerance);
        if !bond_tolerance.is_finite() || bond_tolerance <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "bond_tolerance",
                reason: format!("must be a positive number, got {bond_tolerance}"),
            });
        }
        if self.max_refinement_sweeps == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_refinement_sweeps",
                reason: "must allow at least one sweep".to_string(),
            });
        }

        Ok(AnnotationConfig {
            aromatic_rings: self.aromatic_rings.unwrap_or(defaults.aromatic_rings),
            charged_groups: self.charged_groups.unwrap_or(defaults.charged_groups),
            secondary_structure: self
                .secondary_structure
                .unwrap_or(defaults.secondary_structure),
            infer_ligand_bonds: self
                .infer_ligand_bonds
                .unwrap_or(defaults.infer_ligand_bonds),
            bond_tolerance,
            max_refinement_sweeps: self.max_refinement_sweeps,
        })
    }
}
