use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "molannot - structural annotation of protein-ligand complexes: aromatic rings, charged groups and secondary structure.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used when analyses run in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate a PDB or PDBQT structure and report what was found.
    Annotate(AnnotateArgs),
}

/// Arguments for the `annotate` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct AnnotateArgs {
    // --- Core Arguments ---
    /// Path to the input structure (PDB or PDBQT).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the full annotation report (TOML) to this path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write per-residue secondary-structure labels (CSV) to this path.
    #[arg(long, value_name = "PATH")]
    pub structure_csv: Option<PathBuf>,

    /// Write the structure back out as PDB, including any inferred bonds.
    #[arg(long, value_name = "PATH")]
    pub write_pdb: Option<PathBuf>,

    // --- Analysis Overrides ---
    /// Skip aromatic ring detection.
    #[arg(long)]
    pub no_rings: bool,

    /// Skip charged group detection.
    #[arg(long)]
    pub no_charges: bool,

    /// Skip secondary-structure assignment.
    #[arg(long)]
    pub no_structure: bool,

    /// Connect unbonded ligand atoms by distance before annotating.
    #[arg(long)]
    pub infer_bonds: bool,

    /// Override the bond-length tolerance used by bond inference.
    #[arg(long, value_name = "FLOAT")]
    pub bond_tolerance: Option<f64>,

    /// Fail if secondary-structure refinement needs more than this many sweeps.
    #[arg(long, value_name = "INT")]
    pub max_sweeps: Option<usize>,
}
