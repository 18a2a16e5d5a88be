//! Registry-driven comment removal command.

use crate::output;
use crate::prune::{LineRemover, SafetyIssue};
use crate::registry::RemovalRegistry;
use crate::utils::{resolve_file_id, validate_path_within_root, write_file_atomic};

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Options for a pruning run
#[derive(Debug, Clone)]
pub struct PruneOptions {
    /// Directory registry file identifiers are resolved against
    pub root: PathBuf,
    /// Compute everything, write nothing
    pub dry_run: bool,
    /// Emit the run summary as JSON instead of text
    pub json: bool,
    /// Verbose output
    pub verbose: bool,
    /// Worker threads (1 = sequential, 0 = one per core)
    pub jobs: usize,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            dry_run: false,
            json: false,
            verbose: false,
            jobs: 1,
        }
    }
}

/// What happened to one registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Lines were removed and the file was rewritten.
    Changed,
    /// Dry run: lines would have been removed.
    WouldChange,
    /// No target was confirmed, the file was left alone.
    Unchanged,
    /// The file does not exist.
    Skipped,
    /// Reading, containment or writing failed.
    Failed {
        /// Human-readable cause.
        error: String,
    },
}

/// Per-file record of a run.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Registry identifier of the file
    pub file: String,
    /// Number of target lines in the registry
    pub requested: usize,
    /// Number of targets confirmed as comments
    pub removed: usize,
    /// Outcome
    #[serde(flatten)]
    pub status: FileStatus,
    /// Safety-check failures for this file
    #[serde(skip)]
    pub issues: Vec<SafetyIssue>,
}

impl FileReport {
    fn new(file: &str, requested: usize, status: FileStatus) -> Self {
        Self {
            file: file.to_owned(),
            requested,
            removed: 0,
            status,
            issues: Vec::new(),
        }
    }

    fn failed(file: &str, requested: usize, error: String) -> Self {
        Self::new(file, requested, FileStatus::Failed { error })
    }
}

/// A file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    /// Registry identifier of the file
    pub file: String,
    /// Human-readable cause
    pub message: String,
}

/// Aggregate result of a run over the whole registry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Whether files were left untouched on purpose
    pub dry_run: bool,
    /// Comment lines removed (or that would be, in a dry run)
    pub total_removed: usize,
    /// Target lines listed in the registry
    pub total_requested: usize,
    /// Files rewritten (or that would be, in a dry run)
    pub total_files_changed: usize,
    /// Registry entries whose file does not exist
    pub files_skipped: usize,
    /// Safety-check failures, in registry order
    pub issues: Vec<SafetyIssue>,
    /// Files that failed to read or write
    pub errors: Vec<FileError>,
    /// One record per registry entry, in registry order
    pub files: Vec<FileReport>,
}

impl RunSummary {
    /// Empty summary for a run.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Fold one file's report into the totals.
    pub fn record(&mut self, report: FileReport) {
        self.total_requested += report.requested;
        match &report.status {
            FileStatus::Changed | FileStatus::WouldChange => {
                self.total_removed += report.removed;
                self.total_files_changed += 1;
            }
            FileStatus::Skipped => self.files_skipped += 1,
            FileStatus::Failed { error } => self.errors.push(FileError {
                file: report.file.clone(),
                message: error.clone(),
            }),
            FileStatus::Unchanged => {}
        }
        self.issues.extend(report.issues.iter().cloned());
        self.files.push(report);
    }

    /// True when any target failed the safety check.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Remove the registry's comment lines from every file it names.
///
/// Files are handled in registry order. Missing files are skipped, per-file
/// read and write failures are recorded in the summary, and neither stops the
/// run. With more than one job, files are processed on a rayon pool and the
/// reports are folded in registry order afterwards, so the summary and the
/// output do not depend on the job count.
///
/// # Errors
///
/// Returns an error if writing the report fails or the worker pool cannot be
/// built.
pub fn run_prune<W: Write>(
    registry: &RemovalRegistry,
    remover: &LineRemover,
    options: &PruneOptions,
    writer: W,
) -> Result<RunSummary> {
    run_prune_with(registry, remover, options, writer, &write_file_atomic)
}

/// Writes new content over a file.
pub(crate) type PersistFn = dyn Fn(&Path, &str) -> Result<()> + Sync;

/// [`run_prune`] with the persistence step supplied by the caller.
pub(crate) fn run_prune_with<W: Write>(
    registry: &RemovalRegistry,
    remover: &LineRemover,
    options: &PruneOptions,
    mut writer: W,
    persist: &PersistFn,
) -> Result<RunSummary> {
    if options.verbose && !options.json {
        print_prune_stats(&mut std::io::stderr(), registry, options)?;
    }

    let entries: Vec<(&str, &BTreeSet<usize>)> = registry.iter().collect();
    let progress = output::create_progress_bar(entries.len() as u64, !options.json);

    let reports: Vec<FileReport> = if options.jobs == 1 {
        entries
            .iter()
            .map(|(file, targets)| {
                let report = prune_file_with(file, targets, remover, options, persist);
                progress.inc(1);
                report
            })
            .collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()?;
        pool.install(|| {
            entries
                .par_iter()
                .map(|(file, targets)| {
                    let report = prune_file_with(file, targets, remover, options, persist);
                    progress.inc(1);
                    report
                })
                .collect::<Vec<_>>()
        })
    };
    progress.finish_and_clear();

    let mut summary = RunSummary::new(options.dry_run);
    for report in reports {
        if !options.json {
            output::print_file_status(&mut writer, &report)?;
        }
        summary.record(report);
    }

    if options.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        output::print_run_summary(&mut writer, &summary)?;
    }

    Ok(summary)
}

/// Load, prune and persist a single file.
///
/// Never fails: every problem ends up in the returned report.
pub fn prune_file(
    file: &str,
    targets: &BTreeSet<usize>,
    remover: &LineRemover,
    options: &PruneOptions,
) -> FileReport {
    prune_file_with(file, targets, remover, options, &write_file_atomic)
}

fn prune_file_with(
    file: &str,
    targets: &BTreeSet<usize>,
    remover: &LineRemover,
    options: &PruneOptions,
    persist: &PersistFn,
) -> FileReport {
    let requested = targets.len();
    let path = resolve_file_id(&options.root, file);

    match fs::metadata(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if fs::symlink_metadata(&path).is_ok() {
                return FileReport::failed(file, requested, "broken symlink".to_owned());
            }
            return FileReport::new(file, requested, FileStatus::Skipped);
        }
        Err(e) => return FileReport::failed(file, requested, format!("stat failed: {e}")),
    }

    let path = match validate_path_within_root(&path, &options.root) {
        Ok(p) => p,
        Err(e) => return FileReport::failed(file, requested, e.to_string()),
    };

    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => return FileReport::failed(file, requested, format!("read failed: {e}")),
    };

    let outcome = remover.remove_from_str(file, &content, targets);

    let status = if !outcome.is_changed() {
        FileStatus::Unchanged
    } else if options.dry_run {
        FileStatus::WouldChange
    } else {
        match persist(&path, &outcome.content()) {
            Ok(()) => FileStatus::Changed,
            Err(e) => FileStatus::Failed {
                error: format!("write failed: {e}"),
            },
        }
    };

    FileReport {
        file: file.to_owned(),
        requested,
        removed: outcome.removed,
        status,
        issues: outcome.issues,
    }
}

fn print_prune_stats<W: Write>(
    writer: &mut W,
    registry: &RemovalRegistry,
    options: &PruneOptions,
) -> Result<()> {
    writeln!(writer, "[VERBOSE] Prune Statistics:")?;
    writeln!(writer, "   Files in registry: {}", registry.len())?;
    writeln!(writer, "   Target lines: {}", registry.total_targets())?;
    writeln!(
        writer,
        "   Root: {}",
        crate::utils::normalize_display_path(&options.root)
    )?;
    if options.jobs == 1 {
        writeln!(writer, "   Jobs: 1 (sequential)")?;
    } else if options.jobs == 0 {
        writeln!(writer, "   Jobs: auto")?;
    } else {
        writeln!(writer, "   Jobs: {}", options.jobs)?;
    }
    if options.dry_run {
        writeln!(writer, "   Mode: dry-run")?;
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options_for(dir: &TempDir) -> PruneOptions {
        PruneOptions {
            root: dir.path().to_path_buf(),
            ..PruneOptions::default()
        }
    }

    #[test]
    fn test_missing_and_valid_file() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("a.ts"),
            "const a = 1;\n// one\nconst b = 2;\n// two\nexport { a, b };\n",
        )
        .unwrap();

        let mut registry = RemovalRegistry::new();
        registry.add("a.ts", [2, 4]).unwrap();
        registry.add("gone.ts", [1]).unwrap();

        let mut buffer = Vec::new();
        let summary =
            run_prune(&registry, &LineRemover::new(), &options_for(&dir), &mut buffer).unwrap();

        assert_eq!(summary.total_removed, 2);
        assert_eq!(summary.total_files_changed, 1);
        assert_eq!(summary.files_skipped, 1);
        assert!(summary.errors.is_empty());

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("SKIP (not found): gone.ts"));
        assert!(output.contains("removed 2/2 comments"));
        assert!(output.contains("Total: removed 2 comments across 1 files"));

        let content = std::fs::read_to_string(dir.path().join("a.ts")).unwrap();
        assert_eq!(content, "const a = 1;\nconst b = 2;\nexport { a, b };\n");
    }

    #[test]
    fn test_unchanged_file_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.ts");
        std::fs::write(&path, "x = 1\ny = 2\n").unwrap();
        let before = std::fs::metadata(&path).unwrap().modified().unwrap();

        let mut registry = RemovalRegistry::new();
        registry.add("a.ts", [1, 40]).unwrap();

        let mut buffer = Vec::new();
        let summary =
            run_prune(&registry, &LineRemover::new(), &options_for(&dir), &mut buffer).unwrap();

        assert_eq!(summary.total_files_changed, 0);
        assert_eq!(summary.issues.len(), 1);
        assert_eq!(summary.issues[0].file, "a.ts");
        assert_eq!(summary.files[0].status, FileStatus::Unchanged);
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn test_dry_run_leaves_files() {
        let dir = TempDir::new().unwrap();
        let source = "// drop\nkeep();\n";
        std::fs::write(dir.path().join("a.ts"), source).unwrap();

        let mut registry = RemovalRegistry::new();
        registry.add("a.ts", [1]).unwrap();

        let options = PruneOptions {
            dry_run: true,
            ..options_for(&dir)
        };
        let mut buffer = Vec::new();
        let summary = run_prune(&registry, &LineRemover::new(), &options, &mut buffer).unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.total_removed, 1);
        assert_eq!(summary.files[0].status, FileStatus::WouldChange);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.ts")).unwrap(),
            source
        );
    }

    #[test]
    fn test_escape_outside_root_recorded_as_error() {
        let outer = TempDir::new().unwrap();
        let root = outer.path().join("project");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(outer.path().join("outside.ts"), "// x\n").unwrap();

        let options = PruneOptions {
            root,
            ..PruneOptions::default()
        };
        let report = prune_file(
            "../outside.ts",
            &BTreeSet::from([1]),
            &LineRemover::new(),
            &options,
        );

        assert!(matches!(report.status, FileStatus::Failed { .. }));
        assert_eq!(
            std::fs::read_to_string(outer.path().join("outside.ts")).unwrap(),
            "// x\n"
        );
    }

    #[test]
    fn test_directory_entry_fails_without_stopping_batch() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("a_dir.ts")).unwrap();
        std::fs::write(dir.path().join("b.ts"), "// x\ny\n").unwrap();

        let mut registry = RemovalRegistry::new();
        registry.add("a_dir.ts", [1]).unwrap();
        registry.add("b.ts", [1]).unwrap();

        let mut buffer = Vec::new();
        let summary =
            run_prune(&registry, &LineRemover::new(), &options_for(&dir), &mut buffer).unwrap();

        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].file, "a_dir.ts");
        assert_eq!(summary.total_files_changed, 1);
        assert_eq!(std::fs::read_to_string(dir.path().join("b.ts")).unwrap(), "y\n");
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let dir = TempDir::new().unwrap();
        let mut registry = RemovalRegistry::new();
        for i in 0..20 {
            let name = format!("f{i:02}.ts");
            std::fs::write(dir.path().join(&name), "// c\nx\n").unwrap();
            registry.add(name, [1]).unwrap();
        }

        let options = PruneOptions {
            jobs: 4,
            dry_run: true,
            ..options_for(&dir)
        };
        let mut buffer = Vec::new();
        let summary = run_prune(&registry, &LineRemover::new(), &options, &mut buffer).unwrap();

        let order: Vec<&str> = summary.files.iter().map(|f| f.file.as_str()).collect();
        let expected: Vec<&str> = registry.iter().map(|(f, _)| f).collect();
        assert_eq!(order, expected);
        assert_eq!(summary.total_removed, 20);
    }

    #[test]
    fn test_json_output() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.ts"), "// c\nx\n").unwrap();
        let mut registry = RemovalRegistry::new();
        registry.add("a.ts", [1, 2]).unwrap();

        let options = PruneOptions {
            json: true,
            ..options_for(&dir)
        };
        let mut buffer = Vec::new();
        run_prune(&registry, &LineRemover::new(), &options, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["total_removed"], 1);
        assert_eq!(value["files"][0]["status"], "changed");
        assert_eq!(value["files"][0]["requested"], 2);
        assert_eq!(value["issues"][0]["line"], 2);
    }

    #[test]
    fn test_write_failure_recorded_and_batch_continues() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.ts"), "// c
keep();
").unwrap();
        std::fs::write(dir.path().join("b.ts"), "// c
keep();
").unwrap();

        let mut registry = RemovalRegistry::new();
        registry.add("a.ts", [1, 2]).unwrap();
        registry.add("b.ts", [1]).unwrap();

        let failing = |path: &Path, content: &str| -> Result<()> {
            if path.ends_with("a.ts") {
                anyhow::bail!("disk full");
            }
            write_file_atomic(path, content)
        };
        let mut buffer = Vec::new();
        let summary = run_prune_with(
            &registry,
            &LineRemover::new(),
            &options_for(&dir),
            &mut buffer,
            &failing,
        )
        .unwrap();

        assert_eq!(
            summary.errors,
            vec![FileError {
                file: "a.ts".to_owned(),
                message: "write failed: disk full".to_owned(),
            }]
        );
        assert_eq!(summary.total_files_changed, 1);
        assert_eq!(summary.total_removed, 1);
        assert_eq!(summary.issues.len(), 1);
        assert_eq!(summary.issues[0].file, "a.ts");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.ts")).unwrap(),
            "// c\nkeep();\n"
        );
        assert_eq!(std::fs::read_to_string(dir.path().join("b.ts")).unwrap(), "keep();\n");

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("  a.ts: ERROR write failed: disk full"));
        assert!(output.contains("Errors:\n  a.ts: write failed: disk full"));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_an_error_not_a_skip() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("nowhere.ts"), dir.path().join("link.ts"))
            .unwrap();

        let report = prune_file(
            "link.ts",
            &BTreeSet::from([1]),
            &LineRemover::new(),
            &options_for(&dir),
        );

        assert_eq!(
            report.status,
            FileStatus::Failed {
                error: "broken symlink".to_owned()
            }
        );
    }

    #[test]
    fn test_verbose_stats_stay_off_the_report_stream() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.ts"), "// c\n").unwrap();
        let mut registry = RemovalRegistry::new();
        registry.add("a.ts", [1]).unwrap();

        let options = PruneOptions {
            verbose: true,
            ..options_for(&dir)
        };
        let mut buffer = Vec::new();
        run_prune(&registry, &LineRemover::new(), &options, &mut buffer).unwrap();
        assert!(!String::from_utf8(buffer).unwrap().contains("[VERBOSE]"));

        let mut stats = Vec::new();
        print_prune_stats(&mut stats, &registry, &options).unwrap();
        let stats = String::from_utf8(stats).unwrap();
        assert!(stats.starts_with("[VERBOSE] Prune Statistics:\n"));
        assert!(stats.contains("   Target lines: 1\n"));
    }
}
