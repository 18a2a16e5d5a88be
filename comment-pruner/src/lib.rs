//! Core library for the comment-pruner tool.
//!
//! Deletes registry-listed comment lines from source files. Every target line
//! is checked to look like a comment before it is removed, and blank runs left
//! behind are collapsed so the edited files stay readable.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and defaults.
pub mod constants;

/// Module defining the entry point logic shared by the binary and tests.
pub mod entry_point;

/// Module for CLI output formatting with colored text and a progress bar.
pub mod output;

/// Pure line removal and blank-run collapsing.
pub mod prune;

/// The removal registry: file identifiers mapped to target line numbers.
pub mod registry;

/// Module containing utility functions.
pub mod utils;
