//! Line pruning for registry-driven comment removal.
//!
//! This module holds the pure, I/O-free part of the tool:
//! - `LineRemover` deletes targeted lines after checking they look like comments
//! - `collapse_blank_runs` squeezes blank runs left behind by the deletions
//!
//! Everything here works on borrowed line slices, so callers can test it
//! against literal line arrays without touching the file system.

mod collapse;
mod remover;

pub use collapse::{collapse_blank_runs, is_blank};
pub use remover::{split_lines, CommentMarkers, LineRemover, RemovalOutcome, SafetyIssue};
