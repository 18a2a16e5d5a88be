//! Main binary entry point for comment-pruner.
//!
//! Delegates to the shared `entry_point::run_with_args()` function.

use anyhow::Result;

fn main() -> Result<()> {
    let code = comment_pruner::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
