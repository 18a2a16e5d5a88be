use clap::{Args, Parser};
use std::path::PathBuf;

/// Help text for configuration and registry files, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.comment-pruner.toml):
  Looked up from --root (or the current directory) upwards.

  [comment-pruner]
  registry = \"scripts/slop-comments.toml\"  # Relative to this file
  comment_markers = [\"//\", \"/*\"]          # Prefixes that mark a comment line
  max_blank_lines = 2                     # Longest blank run kept after removal
  preview_chars = 60                      # Characters shown in warnings

REGISTRY FILE:
  [removals]
  \"src/lib/netmon/topology.ts\" = [272, 277, 280, 283]
";

/// Options that shape the safety check and whitespace normalization.
#[derive(Args, Debug, Default, Clone)]
pub struct RemoverArgs {
    /// Prefix that marks a stripped line as a comment (repeatable).
    /// Overrides `comment_markers` from the config file.
    #[arg(short = 'm', long = "marker", allow_hyphen_values = true)]
    pub markers: Vec<String>,

    /// Longest run of blank lines kept after removal.
    #[arg(long)]
    pub max_blank_lines: Option<usize>,

    /// Characters of a rejected line shown in its warning.
    #[arg(long)]
    pub preview_chars: Option<usize>,
}

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove registry-listed comment lines from source files, safely",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Registry file mapping files to the line numbers to remove.
    /// Defaults to `registry` from the config file.
    #[arg(short, long)]
    pub registry: Option<PathBuf>,

    /// Project root that registry file identifiers are relative to.
    /// Files resolving outside the root are never touched.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Show what would be removed without writing any file.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output the run summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of worker threads (0 = one per core).
    #[arg(short, long, default_value = "1")]
    pub jobs: usize,

    /// Safety check and normalization options.
    #[command(flatten)]
    pub remover: RemoverArgs,
}
