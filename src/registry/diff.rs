//! Unified diffs of dependency declarations between versions.

use similar::TextDiff;

/// Lines of context around each change, as in `diff -u`.
const CONTEXT_LINES: usize = 3;

/// Renders a unified diff from `old` to `new`, labelled with the given file names.
///
/// Returns `None` when the texts are identical. The rendered diff always ends
/// with a newline so it can be wrapped in a fenced code block.
///
/// # Examples
///
/// ```
/// use release_registrar::registry::render_unified_diff;
///
/// let diff = render_unified_diff("Baz 0.1\n", "Baz 0.2\n", "1.1.0/requires", "1.2.0/requires")
///     .unwrap();
/// assert!(diff.starts_with("--- 1.1.0/requires\n+++ 1.2.0/requires\n"));
/// assert!(diff.contains("-Baz 0.1\n+Baz 0.2\n"));
///
/// assert_eq!(render_unified_diff("same\n", "same\n", "a", "b"), None);
/// ```
pub fn render_unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> Option<String> {
    let diff = TextDiff::from_lines(old, new);
    let mut rendered = diff
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .missing_newline_hint(false)
        .header(old_label, new_label)
        .to_string();

    if rendered.is_empty() {
        return None;
    }
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Some(rendered)
}
