//! Commands module - CLI command implementations.

mod prune;

pub use prune::{
    prune_file, run_prune, FileError, FileReport, FileStatus, PruneOptions, RunSummary,
};
