//! Blank-run collapsing.
//!
//! Deleting a comment that sat between two blank lines leaves a wider gap than
//! the author wrote. Runs of blank lines longer than the limit are cut down to
//! the limit; shorter runs (intentional double spacing) are left alone.

/// Returns true when a line holds nothing but whitespace.
#[must_use]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Drop every blank line that would extend a run past `max_run`.
///
/// Non-blank lines are always kept and reset the run counter. The pass is
/// idempotent: collapsing already-collapsed lines changes nothing.
///
/// ```
/// use comment_pruner::prune::collapse_blank_runs;
///
/// let lines = ["a", "", "", "", "", "b"];
/// assert_eq!(collapse_blank_runs(lines, 2), vec!["a", "", "", "b"]);
/// ```
pub fn collapse_blank_runs<'a, I>(lines: I, max_run: usize) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut collapsed = Vec::new();
    let mut blank_run = 0usize;

    for line in lines {
        if is_blank(line) {
            blank_run += 1;
            if blank_run <= max_run {
                collapsed.push(line);
            }
        } else {
            blank_run = 0;
            collapsed.push(line);
        }
    }

    collapsed
}
