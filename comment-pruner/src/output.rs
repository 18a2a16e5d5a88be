use crate::commands::{FileReport, FileStatus, RunSummary};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Create a progress bar over the registry's files.
///
/// In test mode, when `show` is false, or for a single file, returns a hidden
/// progress bar so nothing is drawn.
#[must_use]
pub fn create_progress_bar(total_files: u64, show: bool) -> ProgressBar {
    if cfg!(test) || !show || total_files < 2 {
        return ProgressBar::hidden();
    }

    let pb =
        ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr_with_hz(20));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("pruning...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print the one-line status of a registry entry.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_file_status(writer: &mut impl Write, report: &FileReport) -> std::io::Result<()> {
    match &report.status {
        FileStatus::Skipped => writeln!(
            writer,
            "{} {}",
            "SKIP (not found):".yellow(),
            report.file
        ),
        FileStatus::Changed => writeln!(
            writer,
            "  {}: {}",
            report.file,
            format!("removed {}/{} comments", report.removed, report.requested).green()
        ),
        FileStatus::WouldChange => writeln!(
            writer,
            "  {}: {}",
            report.file,
            format!(
                "would remove {}/{} comments",
                report.removed, report.requested
            )
            .cyan()
        ),
        FileStatus::Unchanged => writeln!(
            writer,
            "  {}: {}",
            report.file,
            "nothing to remove (already clean?)".dimmed()
        ),
        FileStatus::Failed { error } => writeln!(
            writer,
            "  {}: {} {}",
            report.file,
            "ERROR".red().bold(),
            error
        ),
    }
}

/// Print the totals line, then the warnings and errors blocks when present.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_run_summary(writer: &mut impl Write, summary: &RunSummary) -> std::io::Result<()> {
    let verb = if summary.dry_run {
        "would remove"
    } else {
        "removed"
    };
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        format!(
            "Total: {verb} {} comments across {} files",
            summary.total_removed, summary.total_files_changed
        )
        .bold()
    )?;
    if summary.files_skipped > 0 {
        writeln!(
            writer,
            "{}",
            format!("Skipped {} missing files", summary.files_skipped).dimmed()
        )?;
    }

    print_issues(writer, summary)?;
    print_errors(writer, summary)?;
    Ok(())
}

/// Print safety-check failures grouped under their file.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_issues(writer: &mut impl Write, summary: &RunSummary) -> std::io::Result<()> {
    if !summary.has_issues() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "{}", "Issues:".yellow().bold())?;
    let mut current: Option<&str> = None;
    for issue in &summary.issues {
        if current != Some(issue.file.as_str()) {
            writeln!(writer, "{}:", issue.file)?;
            current = Some(issue.file.as_str());
        }
        writeln!(writer, "  {} {issue}", "WARNING:".yellow())?;
    }
    Ok(())
}

/// Print files that could not be processed.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_errors(writer: &mut impl Write, summary: &RunSummary) -> std::io::Result<()> {
    if summary.errors.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "{}", "Errors:".red().bold())?;
    for error in &summary.errors {
        writeln!(writer, "  {}: {}", error.file, error.message)?;
    }
    Ok(())
}
