//! Path utilities.
//!
//! This module consolidates path-related logic for:
//! - Cross-platform path normalization for display
//! - Resolving registry file identifiers inside the project root

use std::path::{Path, PathBuf};

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" or ".\" prefix (for cleaner output)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use comment_pruner::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\src\\main.ts")), "src/main.ts");
/// assert_eq!(normalize_display_path(Path::new("./src/main.ts")), "src/main.ts");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    // Strip Windows extended path prefix if present
    let clean = s.trim_start_matches(r"\\?\");
    let normalized = clean.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Joins a registry file identifier onto the project root.
///
/// Absolute identifiers are taken as-is; containment is checked separately
/// by [`validate_path_within_root`] once the file is known to exist.
#[must_use]
pub fn resolve_file_id(root: &Path, file_id: &str) -> PathBuf {
    let id = Path::new(file_id);
    if id.is_absolute() {
        id.to_path_buf()
    } else {
        root.join(id)
    }
}

/// Validates that an existing path is contained within an allowed root directory.
///
/// Both sides are canonicalized, so `..` segments and symlinks pointing out of
/// the root are caught.
///
/// # Errors
///
/// Returns an error if the path or root cannot be canonicalized,
/// or if the path lies outside the root.
pub fn validate_path_within_root(path: &Path, root: &Path) -> anyhow::Result<PathBuf> {
    let canonical_path = path
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("Failed to resolve path {}: {}", path.display(), e))?;
    let canonical_root = root
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("Failed to resolve root {}: {}", root.display(), e))?;

    if canonical_path.starts_with(&canonical_root) {
        Ok(canonical_path)
    } else {
        anyhow::bail!(
            "Path traversal detected: {} is outside of {}",
            path.display(),
            root.display()
        )
    }
}
