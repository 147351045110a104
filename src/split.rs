//! Story splitting: body lines vs highlight lines.

use crate::normalize::HIGHLIGHT_MARKER;

/// Partition story lines into body and highlight lines.
///
/// A `@highlight` marker line means the next non-blank line is a highlight;
/// everything else is body. Blank lines are dropped without touching that
/// state, and a trailing marker with nothing after it contributes nothing.
pub fn split_story<'a, I>(lines: I) -> (Vec<&'a str>, Vec<&'a str>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut body = Vec::new();
    let mut highlights = Vec::new();
    let mut expect_highlight = false;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        if line.contains(HIGHLIGHT_MARKER) {
            expect_highlight = true;
            continue;
        }
        if expect_highlight {
            highlights.push(line);
        } else {
            body.push(line);
        }
        expect_highlight = false;
    }

    (body, highlights)
}
