use std::sync::LazyLock;

use regex::Regex;

/// A stripped, non-empty fragment of the script with its stable position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Index of the enclosing section, counted over all split pieces.
    pub section_index: usize,
    /// Index of the fragment within its section, counted over all split
    /// pieces (empty pieces consume an index but are not emitted).
    pub run_index: usize,
    pub text: String,
}

/// Section boundary: two dashes followed by two or more `#`.
static SECTION_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--#{2,}").expect("section delimiter pattern is valid"));

/// Statement terminator: whole-word `RUN;` or `QUIT;` at end of line.
static RUN_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(RUN|QUIT);\s*\n").expect("terminator pattern is valid"));

/// Split script text into ordered fragments.
///
/// Sections split on [`SECTION_DELIMITER`]; within a section, runs split on
/// [`RUN_TERMINATOR`] with the keyword itself kept as a fragment of its own.
/// The keyword fragments are intentional: they can only be identified as
/// split residuals after reference extraction, so the filter lives
/// downstream, not here.
#[must_use]
pub fn segment(text: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for (section_index, section) in SECTION_DELIMITER.split(text).enumerate() {
        for (run_index, piece) in split_keeping_keywords(section).into_iter().enumerate() {
            let trimmed = piece.trim();
            if trimmed.is_empty() {
                continue;
            }
            fragments.push(Fragment {
                section_index,
                run_index,
                text: trimmed.to_string(),
            });
        }
    }

    fragments
}

/// Split on the run terminator, emitting the captured keyword between the
/// surrounding bodies: `body, keyword, body, keyword, ..., tail`.
fn split_keeping_keywords(section: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut cursor = 0;

    for caps in RUN_TERMINATOR.captures_iter(section) {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        pieces.push(&section[cursor..whole.start()]);
        pieces.push(keyword.as_str());
        cursor = whole.end();
    }
    pieces.push(&section[cursor..]);

    pieces
}
