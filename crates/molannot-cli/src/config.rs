pub mod defaults;

use crate::cli::AnnotateArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use molannot::engine::config::{AnnotationConfig, AnnotationConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialAnalysesConfig {
    aromatic_rings: Option<bool>,
    charged_groups: Option<bool>,
    secondary_structure: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialBondInferenceConfig {
    enabled: Option<bool>,
    tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialRefinementConfig {
    max_sweeps: Option<usize>,
}

/// The annotation config file as written by the user; every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialAnnotationConfig {
    analyses: Option<PartialAnalysesConfig>,
    bond_inference: Option<PartialBondInferenceConfig>,
    refinement: Option<PartialRefinementConfig>,
}

impl PartialAnnotationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Combines file values with command-line flags. Flags win; anything set by
    /// neither falls back to [`DefaultsConfig`].
    pub fn merge_with_cli(mut self, args: &AnnotateArgs) -> Result<AnnotationConfig> {
        let defaults = DefaultsConfig::default();
        let analyses = self.analyses.take().unwrap_or_default();
        let bonds = self.bond_inference.take().unwrap_or_default();
        let refinement = self.refinement.take().unwrap_or_default();

        let enabled = |disabled_by_cli: bool, file_val: Option<bool>, default: bool| {
            !disabled_by_cli && file_val.unwrap_or(default)
        };

        let mut builder = AnnotationConfigBuilder::new()
            .aromatic_rings(enabled(args.no_rings, analyses.aromatic_rings, defaults.aromatic_rings))
            .charged_groups(enabled(args.no_charges, analyses.charged_groups, defaults.charged_groups))
            .secondary_structure(enabled(
                args.no_structure,
                analyses.secondary_structure,
                defaults.secondary_structure,
            ))
            .infer_ligand_bonds(
                args.infer_bonds || bonds.enabled.unwrap_or(defaults.infer_ligand_bonds),
            )
            .bond_tolerance(
                args.bond_tolerance
                    .or(bonds.tolerance)
                    .unwrap_or(defaults.bond_tolerance),
            );

        if let Some(sweeps) = args.max_sweeps.or(refinement.max_sweeps) {
            builder = builder.max_refinement_sweeps(sweeps);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }
}

/// Loads the config file named by `args` (if any) and merges it with the flags.
pub fn resolve(args: &AnnotateArgs) -> Result<AnnotationConfig> {
    let partial = match &args.config {
        Some(path) => PartialAnnotationConfig::from_file(path)?,
        None => PartialAnnotationConfig::default(),
    };
    partial.merge_with_cli(args)
}
