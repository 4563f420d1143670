use crate::utils::parser::parse_temperature;
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
    author,
    version,
    about = "linescale - Rescale spectroscopic line intensities from the line list reference temperature to an arbitrary gas temperature.",
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

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scale the linestrengths of a line list to a new gas temperature.
    Scale(ScaleArgs),
    /// List the HITRAN molecule numbering used to resolve molecule ids.
    Molecules,
}

/// Arguments for the `scale` subcommand.
#[derive(Args, Debug)]
pub struct ScaleArgs {
    // --- Core Arguments ---
    /// Path to the input line list (CSV with a header row).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the scaled line list.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Temperatures ---
    /// Reference temperature of the line list intensities (e.g. 296 or 296K).
    #[arg(long = "tref", value_name = "KELVIN", value_parser = parse_temperature)]
    pub reference_temperature: Option<f64>,

    /// Target gas temperature (e.g. 1500 or 1500K).
    #[arg(long = "tgas", value_name = "KELVIN", value_parser = parse_temperature)]
    pub gas_temperature: Option<f64>,

    // --- Partition Functions ---
    /// Interpolate partition functions from a CSV table
    /// (columns: molecule,isotopologue,temperature,q).
    #[arg(long, value_name = "PATH", conflicts_with = "levels")]
    pub partition_table: Option<PathBuf>,

    /// Sum partition functions from a CSV list of energy levels
    /// (columns: molecule,isotopologue,degeneracy,energy).
    #[arg(long, value_name = "PATH")]
    pub levels: Option<PathBuf>,

    // --- Physics Overrides ---
    /// Override the second radiation constant c2 = hc/k (cm·K).
    #[arg(long, value_name = "FLOAT")]
    pub c2: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S temperatures.gas=1200
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}
