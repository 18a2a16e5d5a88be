//! Target-line removal with a comment safety check.
//!
//! The remover deletes lines by 1-indexed position, but only after the line's
//! stripped text starts with a known comment marker. A target that does not
//! look like a comment is kept and reported, so a registry that has drifted
//! from the file on disk can never delete live code.
//!
//! # Usage
//!
//! ```
//! use std::collections::BTreeSet;
//! use comment_pruner::prune::LineRemover;
//!
//! let lines = ["let a = 1;", "// bump a", "a += 1;"];
//! let targets = BTreeSet::from([2]);
//! let outcome = LineRemover::default().remove("main.rs", &lines, &targets);
//! assert_eq!(outcome.removed, 1);
//! assert_eq!(outcome.lines, vec!["let a = 1;", "a += 1;"]);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::collapse::collapse_blank_runs;
use crate::constants::{DEFAULT_COMMENT_MARKERS, DEFAULT_MAX_BLANK_LINES, DEFAULT_PREVIEW_CHARS};

/// Split file content into lines that keep their own terminators.
///
/// Joining the result gives back the exact input, `\r\n` endings and a
/// missing final newline included.
#[must_use]
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

/// Prefixes recognized as the start of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentMarkers {
    prefixes: Vec<String>,
}

impl CommentMarkers {
    /// Build a marker set. Prefixes are trimmed like the lines they are
    /// matched against, and empty ones are dropped since they would match
    /// every line.
    #[must_use]
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| Into::<String>::into(p).trim().to_owned())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// The configured prefixes, in the order given.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Shallow check: does the stripped line start with one of the prefixes?
    #[must_use]
    pub fn is_comment(&self, line: &str) -> bool {
        let stripped = line.trim();
        self.prefixes.iter().any(|p| stripped.starts_with(p.as_str()))
    }
}

impl Default for CommentMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_COMMENT_MARKERS.iter().copied())
    }
}

/// A target line that failed the safety check and was kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyIssue {
    /// Registry identifier of the file.
    pub file: String,
    /// 1-indexed line number from the registry.
    pub line: usize,
    /// Leading characters of the stripped line.
    pub preview: String,
}

impl fmt::Display for SafetyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {} is not a comment: {}", self.line, self.preview)
    }
}

/// Result of running the remover over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalOutcome<'a> {
    /// Number of target lines confirmed as comments and deleted.
    pub removed: usize,
    /// Targets that were kept because they did not look like comments.
    pub issues: Vec<SafetyIssue>,
    /// Surviving lines, after blank-run collapsing.
    pub lines: Vec<&'a str>,
}

impl RemovalOutcome<'_> {
    /// True when at least one line was deleted.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.removed > 0
    }

    /// The edited file content.
    #[must_use]
    pub fn content(&self) -> String {
        self.lines.concat()
    }
}

/// Deletes registry-targeted comment lines from file content.
#[derive(Debug, Clone)]
pub struct LineRemover {
    markers: CommentMarkers,
    max_blank_lines: usize,
    preview_chars: usize,
}

impl Default for LineRemover {
    fn default() -> Self {
        Self {
            markers: CommentMarkers::default(),
            max_blank_lines: DEFAULT_MAX_BLANK_LINES,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl LineRemover {
    /// Create a remover with default markers and limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the comment markers.
    #[must_use]
    pub fn with_markers(mut self, markers: CommentMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Set the longest blank run kept after removal.
    #[must_use]
    pub fn with_max_blank_lines(mut self, max_blank_lines: usize) -> Self {
        self.max_blank_lines = max_blank_lines;
        self
    }

    /// Set how many characters of a rejected line go into its warning.
    #[must_use]
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Markers used by the safety check.
    #[must_use]
    pub fn markers(&self) -> &CommentMarkers {
        &self.markers
    }

    /// Remove targeted comment lines from `lines`.
    ///
    /// Positions are 1-indexed. A target is deleted only when its stripped
    /// text starts with a comment marker; otherwise the line is kept and one
    /// `SafetyIssue` is recorded for it. Targets past the end of the file
    /// never match and are not reported.
    ///
    /// Blank runs are collapsed only when something was deleted, so an
    /// outcome with `removed == 0` always carries the input lines unchanged.
    #[must_use]
    pub fn remove<'a>(
        &self,
        file: &str,
        lines: &[&'a str],
        targets: &BTreeSet<usize>,
    ) -> RemovalOutcome<'a> {
        if targets.is_empty() {
            return RemovalOutcome {
                removed: 0,
                issues: Vec::new(),
                lines: lines.to_vec(),
            };
        }

        let mut removed = 0;
        let mut issues = Vec::new();
        let mut kept = Vec::with_capacity(lines.len());

        for (idx, &line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            if targets.contains(&line_no) {
                if self.markers.is_comment(line) {
                    removed += 1;
                    continue;
                }
                issues.push(SafetyIssue {
                    file: file.to_owned(),
                    line: line_no,
                    preview: self.preview(line),
                });
            }
            kept.push(line);
        }

        let lines = if removed > 0 {
            collapse_blank_runs(kept, self.max_blank_lines)
        } else {
            kept
        };

        RemovalOutcome {
            removed,
            issues,
            lines,
        }
    }

    /// Same as [`LineRemover::remove`], splitting `content` into lines first.
    #[must_use]
    pub fn remove_from_str<'a>(
        &self,
        file: &str,
        content: &'a str,
        targets: &BTreeSet<usize>,
    ) -> RemovalOutcome<'a> {
        self.remove(file, &split_lines(content), targets)
    }

    fn preview(&self, line: &str) -> String {
        line.trim().chars().take(self.preview_chars).collect()
    }
}
