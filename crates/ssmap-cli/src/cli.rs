use clap::{Args, Parser, Subcommand};
use ssmap::core::io::table::Delimiter;
use ssmap::core::models::structure::AtomSelection;
use ssmap::core::parsers::AssignmentTool;
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
    about = "ssmap - Secondary structure maps of molecular dynamics trajectories from STRIDE or DSSP assignments.",
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
    /// Assign secondary structure to a single structure and write the per-residue records.
    Run(RunArgs),
    /// Build the residue-by-frame secondary structure map of a trajectory.
    Map(MapArgs),
    /// Compute the content of a class or group over frames, or per residue.
    Content(ContentArgs),
    /// Count residues per class at one frame of a map, or in a single structure.
    Composition(CompositionArgs),
    /// Parse an existing STRIDE or DSSP output file into per-residue records.
    Parse(ParseArgs),
}

/// Options controlling how the assignment tool is found and run.
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Assignment program to run ('stride' or 'dssp').
    #[arg(short = 'T', long, value_name = "TOOL")]
    pub tool: Option<AssignmentTool>,

    /// Atoms handed to the tool: 'all', 'protein', 'chain A' or 'protein and chain A'.
    #[arg(long, value_name = "SELECTION")]
    pub selection: Option<AtomSelection>,

    /// Override the STRIDE executable.
    #[arg(long, value_name = "PATH")]
    pub stride_executable: Option<PathBuf>,

    /// Override the DSSP executable.
    #[arg(long, value_name = "PATH")]
    pub dssp_executable: Option<PathBuf>,

    /// Seconds to wait for one tool invocation before killing it. 0 waits indefinitely.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S dssp.executable=/opt/dssp/mkdssp
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the input structure (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the records table (CSV). Written to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub tool: ToolArgs,
}

/// Arguments for the `map` subcommand.
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Structure defining the atoms of every frame (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub structure: PathBuf,

    /// Multi-model PDB trajectory. Defaults to the models of the structure file.
    #[arg(short, long, value_name = "PATH")]
    pub trajectory: Option<PathBuf>,

    /// Path for the map file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Field separator of the map file ('tab', 'comma' or 'whitespace').
    #[arg(long, value_name = "DELIMITER", default_value_t = Delimiter::Tab)]
    pub delimiter: Delimiter,

    #[command(flatten)]
    pub tool: ToolArgs,
}

/// Where the classes of a content or composition calculation come from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ClassSource {
    /// A map file written by `ssmap map`.
    #[arg(short, long, value_name = "PATH")]
    pub map: Option<PathBuf>,

    /// A structure (PDB) to assign. Combine with --trajectory for a whole trajectory.
    #[arg(short, long, value_name = "PATH")]
    pub structure: Option<PathBuf>,
}

/// Arguments for the `content` subcommand.
#[derive(Args, Debug)]
pub struct ContentArgs {
    /// Class or group to measure: a class name ('alpha helix'), a code ('H') or 'helix'/'strand'.
    #[arg(long = "class", required = true, value_name = "CLASS")]
    pub class: String,

    #[command(flatten)]
    pub source: ClassSource,

    /// Multi-model PDB trajectory used with --structure.
    #[arg(short, long, value_name = "PATH", requires = "structure")]
    pub trajectory: Option<PathBuf>,

    /// Report the fraction of frames per residue instead of the fraction of residues per frame.
    #[arg(long)]
    pub per_residue: bool,

    /// Field separator of the map file ('tab', 'comma' or 'whitespace').
    #[arg(long, value_name = "DELIMITER", default_value_t = Delimiter::Tab)]
    pub delimiter: Delimiter,

    /// Path for the content table (CSV). Written to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub tool: ToolArgs,
}

/// Arguments for the `composition` subcommand.
#[derive(Args, Debug)]
pub struct CompositionArgs {
    #[command(flatten)]
    pub source: ClassSource,

    /// Frame of the map to count (0-based).
    #[arg(short, long, value_name = "INT", default_value_t = 0, requires = "map")]
    pub frame: usize,

    /// Field separator of the map file ('tab', 'comma' or 'whitespace').
    #[arg(long, value_name = "DELIMITER", default_value_t = Delimiter::Tab)]
    pub delimiter: Delimiter,

    /// Path for the composition table (CSV). Written to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub tool: ToolArgs,
}

/// Arguments for the `parse` subcommand.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Path to a STRIDE or DSSP output file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Dialect of the output file ('stride' or 'dssp').
    #[arg(short = 'T', long, value_name = "TOOL", default_value_t = AssignmentTool::Stride)]
    pub tool: AssignmentTool,

    /// Path for the records table (CSV). Written to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
