use crate::cli::AnnotateArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molannot::{
    core::io::{pdb::PdbFile, traits::MolecularFile},
    core::models::annotations::{AromaticRing, ChargedGroup, SecondaryStructure},
    core::models::system::MolecularSystem,
    engine::progress::ProgressReporter,
    workflows::{self, annotate::AnnotationSummary},
};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Everything an annotation run produced, as written to the TOML report.
#[derive(Serialize)]
struct AnnotationReport<'a> {
    input: String,
    summary: &'a AnnotationSummary,
    rings: &'a [AromaticRing],
    groups: &'a [ChargedGroup],
    residues: Vec<ResidueRow>,
}

/// One row of the per-residue secondary-structure table.
#[derive(Debug, Serialize, PartialEq)]
struct ResidueRow {
    chain: char,
    seq: isize,
    residue: String,
    structure: SecondaryStructure,
}

fn residue_rows(system: &MolecularSystem) -> Vec<ResidueRow> {
    system
        .residues_iter()
        .map(|residue| ResidueRow {
            chain: residue.key.chain,
            seq: residue.key.seq,
            residue: residue.key.name.clone(),
            structure: system.structure_of_residue(&residue.key).unwrap_or_default(),
        })
        .collect()
}

pub fn run(args: AnnotateArgs) -> Result<()> {
    let progress_handler = CliProgressHandler::new();
    let summary = execute(&args, &progress_handler)?;
    print_summary(&args.input, &summary);
    Ok(())
}

fn execute(args: &AnnotateArgs, progress_handler: &CliProgressHandler) -> Result<AnnotationSummary> {
    info!("Resolving annotation configuration...");
    let final_config = config::resolve(args)?;

    info!("Loading input structure from {:?}", &args.input);
    let (mut system, _metadata) =
        PdbFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    println!("Annotating {}...", args.input.display());
    info!("Invoking the core annotation workflow...");
    let summary = workflows::annotate::run(&mut system, &final_config, &reporter)?;

    if !summary.missing_atoms.is_empty() {
        warn!(
            "{} expected protein atom(s) are missing; affected residues were skipped by the rules that need them.",
            summary.missing_atoms.len()
        );
    }

    if let Some(path) = &args.output {
        write_report(path, &args.input, &system, &summary)?;
        println!("✓ Report written to: {}", path.display());
    }
    if let Some(path) = &args.structure_csv {
        write_structure_csv(path, &system)?;
        println!("✓ Secondary structure written to: {}", path.display());
    }
    if let Some(path) = &args.write_pdb {
        PdbFile::write_system_to_path(&system, path).map_err(|e| CliError::Output {
            path: path.clone(),
            source: e.into(),
        })?;
        println!("✓ Structure written to: {}", path.display());
    }

    Ok(summary)
}

fn write_report(
    path: &Path,
    input: &Path,
    system: &MolecularSystem,
    summary: &AnnotationSummary,
) -> Result<()> {
    let report = AnnotationReport {
        input: input.display().to_string(),
        summary,
        rings: system.aromatic_rings(),
        groups: system.charged_groups(),
        residues: residue_rows(system),
    };
    let output_err = |e: anyhow::Error| CliError::Output {
        path: path.to_path_buf(),
        source: e,
    };
    let content = toml::to_string_pretty(&report).map_err(|e| output_err(e.into()))?;
    std::fs::write(path, content).map_err(|e| output_err(e.into()))?;
    info!("Wrote annotation report to {:?}", path);
    Ok(())
}

fn write_structure_csv(path: &Path, system: &MolecularSystem) -> Result<()> {
    let output_err = |e: anyhow::Error| CliError::Output {
        path: path.to_path_buf(),
        source: e,
    };
    let mut writer = csv::Writer::from_path(path).map_err(|e| output_err(e.into()))?;
    for row in residue_rows(system) {
        writer.serialize(&row).map_err(|e| output_err(e.into()))?;
    }
    writer.flush()?;
    Ok(())
}

fn print_summary(input: &Path, summary: &AnnotationSummary) {
    println!();
    println!("Annotation summary for {}", input.display());
    println!("{:-<40}", "");
    let rows = [
        ("Atoms", summary.atoms),
        ("Residues", summary.residues),
        ("Inferred bonds", summary.inferred_bonds),
        ("Missing atoms", summary.missing_atoms.len()),
        ("Aromatic rings", summary.aromatic_rings),
        ("Positive groups", summary.positive_groups),
        ("Negative groups", summary.negative_groups),
        ("Alpha residues", summary.alpha_residues),
        ("Beta residues", summary.beta_residues),
        ("Other residues", summary.other_residues),
    ];
    for (label, value) in rows {
        println!("  {:<24}{:>12}", label, value);
    }
}
