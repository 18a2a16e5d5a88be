//! Utility functions shared by the commands.

mod paths;

pub use paths::{normalize_display_path, resolve_file_id, validate_path_within_root};

use std::fs;
use std::io::Write;
use std::path::Path;

/// Replace a file's content in one step.
///
/// The new content goes to a temporary file in the same directory, is synced,
/// takes over the original permissions and is then renamed over the target.
/// Readers see either the old file or the new one, never a partial write.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, written or
/// renamed over `path`.
pub fn write_file_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    let permissions = fs::metadata(path).map(|m| m.permissions()).ok();

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| {
        anyhow::anyhow!("creating temp file in {}: {}", parent.display(), e)
    })?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;

    if let Some(permissions) = permissions {
        fs::set_permissions(temp.path(), permissions)?;
    }

    temp.persist(path)
        .map_err(|e| anyhow::anyhow!("replacing {}: {}", path.display(), e.error))?;
    Ok(())
}
