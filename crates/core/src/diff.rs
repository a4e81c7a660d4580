//! Line diffs between content buffers
//!
//! [`diff`] is a positional comparison: line `i` of one buffer is compared
//! with line `i` of the other, with no alignment. Inserting a line near the
//! top of a file therefore reports every following line as changed. The
//! counts are what checkpoint panels display, so this behavior is kept as is.
//!
//! [`unified`] renders an aligned, human readable diff for display. It does
//! not feed the counts.

use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Line counts produced by [`diff`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Lines present only in the second buffer
    pub additions: usize,
    /// Lines present only in the first buffer
    pub deletions: usize,
    /// Positions where both buffers have a line and the lines differ
    pub changes: usize,
    /// Sum of the three counts
    pub total: usize,
}

impl DiffResult {
    /// True when the buffers compared equal line by line
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Compare two buffers line by line by position
pub fn diff(a: &str, b: &str) -> DiffResult {
    let mut lines_a = a.split('\n');
    let mut lines_b = b.split('\n');
    let mut result = DiffResult::default();

    loop {
        match (lines_a.next(), lines_b.next()) {
            (None, None) => break,
            (None, Some(_)) => result.additions += 1,
            (Some(_), None) => result.deletions += 1,
            (Some(la), Some(lb)) if la != lb => result.changes += 1,
            _ => {}
        }
    }

    result.total = result.additions + result.deletions + result.changes;
    result
}

/// Render a colored unified diff of `old` against `new`
///
/// `path` is printed in the `---`/`+++` header. Returns an empty string when
/// the buffers are identical.
pub fn unified(old: &str, new: &str, path: &str, context_lines: usize) -> String {
    let text_diff = TextDiff::from_lines(old, new);
    let mut output = String::new();

    for (hunk_idx, hunk) in text_diff
        .unified_diff()
        .context_radius(context_lines)
        .iter_hunks()
        .enumerate()
    {
        if hunk_idx == 0 {
            output.push_str(&format!("{}\n", format!("--- a/{path}").bold()));
            output.push_str(&format!("{}\n", format!("+++ b/{path}").bold()));
        }

        // e.g. @@ -12,7 +12,8 @@
        let header = format!("{}", hunk.header());
        output.push_str(&format!("{}\n", header.cyan()));

        for change in hunk.iter_changes() {
            let line: &str = change.value();
            let line = line.strip_suffix('\n').unwrap_or(line);

            match change.tag() {
                ChangeTag::Delete => output.push_str(&format!("{}", format!("-{line}").red())),
                ChangeTag::Insert => output.push_str(&format!("{}", format!("+{line}").green())),
                ChangeTag::Equal => output.push_str(&format!("{}", format!(" {line}").dimmed())),
            }
            output.push('\n');
        }
    }

    output
}
