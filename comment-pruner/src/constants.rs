//! Shared constants and defaults.

/// Name of the per-project configuration file.
pub const CONFIG_FILENAME: &str = ".comment-pruner.toml";

/// Prefixes that mark a stripped line as a comment.
///
/// A single-line marker and a block-comment opener. Anything else is left alone.
pub const DEFAULT_COMMENT_MARKERS: &[&str] = &["//", "/*"];

/// Longest run of consecutive blank lines kept after removal.
pub const DEFAULT_MAX_BLANK_LINES: usize = 2;

/// Number of characters of a rejected line shown in a safety warning.
pub const DEFAULT_PREVIEW_CHARS: usize = 60;
