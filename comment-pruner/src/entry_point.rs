use crate::cli::{Cli, RemoverArgs};
use crate::commands::{run_prune, PruneOptions};
use crate::config::Config;
use crate::prune::{CommentMarkers, LineRemover};
use crate::registry::RemovalRegistry;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Runs the pruner with the given arguments.
///
/// # Errors
///
/// Returns an error if writing the report fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Runs the pruner with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
/// Returns the process exit code: 0 once the batch has run, whatever the
/// per-file outcome; 1 when the run cannot start (bad arguments, missing root,
/// unreadable config or registry).
///
/// # Errors
///
/// Returns an error if writing the report fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["comment-pruner".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(1);
            }
        },
    };

    let root = cli_var.root.clone().unwrap_or_else(|| PathBuf::from("."));
    if !root.is_dir() {
        eprintln!(
            "Error: The root directory '{}' does not exist.",
            root.display()
        );
        return Ok(1);
    }

    let config = match Config::load_from_path(&root) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(1);
        }
    };

    let Some(registry_path) = cli_var.registry.clone().or_else(|| config.registry_path()) else {
        eprintln!(
            "Error: No registry given. Pass --registry or set `registry` in .comment-pruner.toml."
        );
        return Ok(1);
    };

    let registry = match RemovalRegistry::load(&registry_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(1);
        }
    };

    let remover = build_remover(&cli_var.remover, &config);
    if remover.markers().prefixes().is_empty() {
        eprintln!("Error: No comment markers configured; every target would be rejected.");
        return Ok(1);
    }

    if cli_var.verbose && !cli_var.json {
        eprintln!("[VERBOSE] comment-pruner v{}", env!("CARGO_PKG_VERSION"));
        match &config.config_file_path {
            Some(path) => eprintln!("[VERBOSE] Config: {}", path.display()),
            None => eprintln!("[VERBOSE] Config: defaults"),
        }
        eprintln!("[VERBOSE] Registry: {}", registry_path.display());
        eprintln!("[VERBOSE] Markers: {:?}", remover.markers().prefixes());
        eprintln!();
    }

    let options = PruneOptions {
        root,
        dry_run: cli_var.dry_run,
        json: cli_var.json,
        verbose: cli_var.verbose,
        jobs: cli_var.jobs,
    };
    run_prune(&registry, &remover, &options, writer)?;
    Ok(0)
}

/// Builds the line remover: CLI flags beat the config file, which beats defaults.
fn build_remover(args: &RemoverArgs, config: &Config) -> LineRemover {
    let mut remover = LineRemover::new();

    if !args.markers.is_empty() {
        remover = remover.with_markers(CommentMarkers::new(args.markers.iter().cloned()));
    } else if let Some(markers) = &config.pruner.comment_markers {
        remover = remover.with_markers(CommentMarkers::new(markers.iter().cloned()));
    }

    if let Some(max) = args.max_blank_lines.or(config.pruner.max_blank_lines) {
        remover = remover.with_max_blank_lines(max);
    }
    if let Some(chars) = args.preview_chars.or(config.pruner.preview_chars) {
        remover = remover.with_preview_chars(chars);
    }

    remover
}
