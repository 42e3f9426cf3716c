use clap::{Args, Parser, Subcommand, ValueEnum};
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
    about = "molgraph CLI - Build graphs from protein structures, RNA secondary structures and protein-protein interaction databases.",
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

    /// Set the number of threads for parallel edge construction.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a residue- or atom-level graph from a protein structure.
    Protein(ProteinArgs),
    /// Build a secondary-structure graph from an RNA dot-bracket string.
    Rna(RnaArgs),
    /// Build a protein-protein interaction network from STRING and/or BIOGRID.
    Ppi(PpiArgs),
}

/// Serialization of a protein graph.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphFormat {
    /// Attributed nodes and edges as JSON.
    #[default]
    Json,
    /// Node feature matrix, edge index and edge attribute matrix as JSON.
    Tensor,
    /// One CSV row per edge.
    Csv,
}

/// Serialization of RNA graphs and interaction networks.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Json,
    Csv,
}

/// Where the structure comes from. Exactly one is required.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct StructureSource {
    /// Path to a PDB coordinate file.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// PDB code resolved against `paths.pdb-dir` (e.g., '3eiy').
    #[arg(long, value_name = "CODE")]
    pub pdb_code: Option<String>,
}

/// Arguments for the `protein` subcommand.
#[derive(Args, Debug)]
pub struct ProteinArgs {
    // --- Core Arguments ---
    #[command(flatten)]
    pub source: StructureSource,

    /// Output file. Writes to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = GraphFormat::Json)]
    pub format: GraphFormat,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Node Overrides ---
    /// Chains to include ('all', 'A' or 'AB').
    #[arg(long, value_name = "CHAINS")]
    pub chains: Option<String>,

    /// Node granularity ('CA', 'CB', 'atom', 'atom:<NAME>' or 'centroids').
    #[arg(short, long, value_name = "LEVEL")]
    pub granularity: Option<String>,

    /// Residue embedding used as node features ('meiler' or 'kidera').
    #[arg(short, long, value_name = "SCHEME")]
    pub embedding: Option<String>,

    /// Keep heteroatoms (ligands, ions) as nodes.
    #[arg(long)]
    pub keep_hets: bool,

    // --- Edge Overrides ---
    /// Edge construction strategies, comma separated
    /// (contacts, distance, knn, delaunay, custom, dense).
    #[arg(long = "edges", value_name = "STRATEGY", value_delimiter = ',')]
    pub strategies: Vec<String>,

    /// Distance cutoff in angstroms for the distance strategy.
    #[arg(short, long, value_name = "FLOAT")]
    pub distance_cutoff: Option<f64>,

    /// Minimum residue separation for distance, k-NN and Delaunay edges.
    #[arg(long, value_name = "INT")]
    pub long_interaction_threshold: Option<usize>,

    /// Number of neighbours for the knn strategy.
    #[arg(short, long, value_name = "INT")]
    pub k_nn: Option<usize>,

    /// Pre-computed contact report for the contacts strategy.
    #[arg(long, value_name = "PATH")]
    pub contact_file: Option<PathBuf>,

    /// CSV file of `res1,res2,data...` rows for the custom strategy.
    #[arg(long, value_name = "PATH")]
    pub custom_edges: Option<PathBuf>,

    // --- Feature Overrides ---
    /// Attach DSSP secondary structure and accessibility features.
    #[arg(long)]
    pub include_ss: bool,

    /// Pre-computed DSSP output for the structure.
    #[arg(long, value_name = "PATH")]
    pub dssp_file: Option<PathBuf>,

    // --- Output Overrides ---
    /// Replace string labels with integer codes.
    #[arg(long)]
    pub encode_labels: bool,

    /// Drop string labels from JSON output.
    #[arg(long)]
    pub remove_string_labels: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S edges.distance-cutoff=5.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `rna` subcommand.
#[derive(Args, Debug)]
pub struct RnaArgs {
    /// Secondary structure in dot-bracket notation (e.g., '((..))').
    #[arg(short, long, required = true, value_name = "DOTBRACKET")]
    pub dotbracket: String,

    /// Nucleotide sequence of the same length; enables base one-hot features.
    #[arg(short, long, value_name = "SEQUENCE")]
    pub sequence: Option<String>,

    /// Output file. Writes to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = TableFormat::Json)]
    pub format: TableFormat,
}

/// Arguments for the `ppi` subcommand.
#[derive(Args, Debug)]
pub struct PpiArgs {
    /// Query proteins, comma separated (e.g., 'CDC42,CDK1,KIF23').
    #[arg(short, long, required = true, value_name = "NAME", value_delimiter = ',')]
    pub proteins: Vec<String>,

    /// Interaction sources, comma separated. Defaults to STRING and BIOGRID.
    #[arg(long, value_name = "SOURCE", value_delimiter = ',')]
    pub sources: Vec<String>,

    /// NCBI taxonomy identifier of the organism.
    #[arg(short, long, value_name = "ID")]
    pub taxon_id: Option<u32>,

    /// Source parameter, prefixed by source (e.g., 'STRING_required_score=700',
    /// 'BIOGRID_accesskey=...'). Can be used multiple times.
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE", num_args(0..))]
    pub params: Vec<String>,

    /// Fetch a single page from paginated sources.
    #[arg(long)]
    pub no_paginate: bool,

    /// Output file. Writes to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = TableFormat::Json)]
    pub format: TableFormat,
}
