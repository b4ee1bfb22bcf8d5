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
    author = "Stepan Osipov, Ivan Gushchin",
    version,
    about = "RingStoich CLI - Predicts the rotational stoichiometry of ring-shaped protein assemblies from a model of two adjacent protomers.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the number of protomers in the ring the dimer was cut from.
    Predict(PredictArgs),
    /// Plot the RMSD curve of the chained dimer copies.
    Curve(CurveArgs),
}

/// Options shared by every analysis command.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Path to the dimer structure (PDB) with the reference and partner chains.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Largest ring size to test; also the number of dimer copies chained.
    #[arg(short = 'n', long, value_name = "INT")]
    pub max_stoichiometry: Option<usize>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scratch PDB file holding every copy; overwritten on each run.
    #[arg(long, value_name = "PATH")]
    pub scratch: Option<PathBuf>,

    /// Write the deduplicated ring fragment to this PDB file.
    #[arg(long, value_name = "PATH")]
    pub ring_output: Option<PathBuf>,

    /// Chain whose copies are superimposed onto the partner chain.
    #[arg(long, value_name = "CHAR")]
    pub reference_chain: Option<char>,

    /// Chain of the neighbouring protomer in the dimer.
    #[arg(long, value_name = "CHAR")]
    pub partner_chain: Option<char>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S superposition.cycles=0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Arguments for the `curve` subcommand.
#[derive(Args, Debug)]
pub struct CurveArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Path for the SVG plot of the curve.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Also write the curve points as CSV.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}
