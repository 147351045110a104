//! Line normalization: whitespace collapsing and sentence-end repair.
//!
//! Story files arrive with uneven spacing and many article lines (datelines,
//! captions, list items) that don't end in punctuation. Downstream tooling
//! joins lines into one string per section, so every line must end like a
//! sentence or token boundaries blur across the join.

/// Reserved marker line preceding each highlight in a story file.
pub const HIGHLIGHT_MARKER: &str = "@highlight";

/// Characters that count as an acceptable end of sentence. A line ending in
/// `...` is covered by the plain `.` entry.
const SENTENCE_END: [char; 9] = ['.', '!', '?', '\'', '`', '"', '\u{2019}', '\u{201d}', ')'];

/// Collapse all whitespace runs (spaces, tabs, newlines) to single spaces
/// and trim the ends.
pub fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Append `" ."` to a line that doesn't end in sentence-terminal
/// punctuation. Empty lines and highlight-marker lines pass through
/// untouched: a marker is structure, not a sentence.
pub fn fix_missing_period(line: &str) -> String {
    if line.contains(HIGHLIGHT_MARKER) {
        return line.to_string();
    }
    if line.is_empty() {
        return line.to_string();
    }
    if line.ends_with(SENTENCE_END) {
        return line.to_string();
    }
    format!("{} .", line)
}

/// Normalize one raw story line into sentence form: collapse whitespace,
/// then repair a missing sentence end.
pub fn line_to_sentence(line: &str) -> String {
    fix_missing_period(&collapse_whitespace(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  hello   world "), "hello world");
        assert_eq!(collapse_whitespace("a\t b\nc"), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_appends_period() {
        assert_eq!(line_to_sentence("  hello   world"), "hello world .");
    }

    #[test]
    fn test_already_terminated_unchanged() {
        assert_eq!(line_to_sentence("already done."), "already done.");
        assert_eq!(line_to_sentence("really ?"), "really ?");
        assert_eq!(line_to_sentence("he said '"), "he said '");
        assert_eq!(line_to_sentence("(see below)"), "(see below)");
        assert_eq!(line_to_sentence("trailing dots ..."), "trailing dots ...");
    }

    #[test]
    fn test_close_quotes_terminate() {
        assert_eq!(line_to_sentence("she said \u{2019}"), "she said \u{2019}");
        assert_eq!(line_to_sentence("she said \u{201d}"), "she said \u{201d}");
    }

    #[test]
    fn test_empty_line_unchanged() {
        assert_eq!(line_to_sentence(""), "");
        assert_eq!(line_to_sentence("   "), "");
    }

    #[test]
    fn test_marker_line_not_terminated() {
        assert_eq!(line_to_sentence("@highlight"), "@highlight");
        assert_eq!(line_to_sentence("  @highlight  "), "@highlight");
    }
}
