use crate::core::models::annotations::{AromaticRing, ChargedGroup, SecondaryStructure};
use crate::core::models::system::MolecularSystem;
use crate::engine::config::AnnotationConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use crate::engine::tasks::format_check::MissingAtom;
use crate::engine::tasks::secondary_structure::StructureAssignment;
use serde::Serialize;
use tracing::{info, instrument};

/// What an annotation run found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationSummary {
    pub atoms: usize,
    pub residues: usize,
    pub inferred_bonds: usize,
    pub missing_atoms: Vec<MissingAtom>,
    pub aromatic_rings: usize,
    pub positive_groups: usize,
    pub negative_groups: usize,
    pub alpha_residues: usize,
    pub beta_residues: usize,
    pub other_residues: usize,
}

#[cfg(feature = "parallel")]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}

/// Annotates `system` in place.
///
/// Bond inference (when enabled) runs first because every later analysis reads
/// the bond graph. The three analyses then run against the same immutable view
/// of the system, concurrently with the `parallel` feature, and their results
/// are stored once all of them have finished. Step-counted task events are only
/// emitted from the sequential bond inference phase; the concurrent analyses
/// report phase boundaries only. Disabled analyses leave the
/// corresponding annotations on the system untouched.
#[instrument(skip_all, name = "annotation_workflow")]
pub fn run(
    system: &mut MolecularSystem,
    config: &AnnotationConfig,
    reporter: &ProgressReporter,
) -> Result<AnnotationSummary, EngineError> {
    info!(
        atoms = system.atom_count(),
        residues = system.residues_iter().count(),
        "Starting annotation workflow."
    );

    let inferred_bonds = if config.infer_ligand_bonds {
        reporter.phase("Bond Inference", || -> Result<usize, EngineError> {
            let bonds = tasks::bond_inference::run(system, config.bond_tolerance)?;
            reporter.report(Progress::TaskStart {
                total_steps: bonds.len() as u64,
            });
            for &(a, b) in &bonds {
                system.add_bond(a, b)?;
                reporter.report(Progress::TaskIncrement);
            }
            reporter.report(Progress::TaskFinish);
            Ok(bonds.len())
        })?
    } else {
        0
    };

    let missing_atoms = reporter.phase("Format Check", || tasks::format_check::run(system));
    if !missing_atoms.is_empty() {
        reporter.report(Progress::Message(format!(
            "{} expected protein atom(s) missing",
            missing_atoms.len()
        )));
    }

    let view: &MolecularSystem = system;
    let (rings, (charges, structure)) = join(
        || find_aromatic_rings(view, config, reporter),
        || {
            join(
                || find_charged_groups(view, config, reporter),
                || assign_secondary_structure(view, config, reporter),
            )
        },
    );
    let rings = rings?;
    let structure = structure?;

    if let Some(rings) = rings {
        system.set_aromatic_rings(rings);
    }
    if let Some(groups) = charges {
        system.set_charged_groups(groups);
    }
    let (alpha_residues, beta_residues, other_residues) = match &structure {
        Some(assignment) => {
            system.apply_secondary_structure(assignment.labels());
            (
                assignment.count(SecondaryStructure::Alpha),
                assignment.count(SecondaryStructure::Beta),
                assignment.count(SecondaryStructure::Other),
            )
        }
        None => (0, 0, 0),
    };

    let positive_groups = system
        .charged_groups()
        .iter()
        .filter(|g| g.sign.is_positive())
        .count();
    let summary = AnnotationSummary {
        atoms: system.atom_count(),
        residues: system.residues_iter().count(),
        inferred_bonds,
        missing_atoms,
        aromatic_rings: system.aromatic_rings().len(),
        positive_groups,
        negative_groups: system.charged_groups().len() - positive_groups,
        alpha_residues,
        beta_residues,
        other_residues,
    };
    info!(
        rings = summary.aromatic_rings,
        positive = summary.positive_groups,
        negative = summary.negative_groups,
        alpha = summary.alpha_residues,
        beta = summary.beta_residues,
        "Annotation workflow complete."
    );
    Ok(summary)
}

fn find_aromatic_rings(
    system: &MolecularSystem,
    config: &AnnotationConfig,
    reporter: &ProgressReporter,
) -> Result<Option<Vec<AromaticRing>>, EngineError> {
    if !config.aromatic_rings {
        return Ok(None);
    }
    reporter
        .phase("Aromatic Rings", || tasks::aromatic_rings::run(system))
        .map(Some)
}

fn find_charged_groups(
    system: &MolecularSystem,
    config: &AnnotationConfig,
    reporter: &ProgressReporter,
) -> Option<Vec<ChargedGroup>> {
    config.charged_groups.then(|| {
        reporter.phase("Charged Groups", || {
            let mut groups = tasks::ligand_charges::run(system);
            groups.extend(tasks::residue_charges::run(system));
            groups
        })
    })
}

fn assign_secondary_structure(
    system: &MolecularSystem,
    config: &AnnotationConfig,
    reporter: &ProgressReporter,
) -> Result<Option<StructureAssignment>, EngineError> {
    if !config.secondary_structure {
        return Ok(None);
    }
    reporter
        .phase("Secondary Structure", || {
            tasks::secondary_structure::run(system, config.max_refinement_sweeps)
        })
        .map(Some)
}
