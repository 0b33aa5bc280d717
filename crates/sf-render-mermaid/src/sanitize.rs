use std::sync::LazyLock;

use regex::Regex;
use sf_core::Run;

/// Inline comment spans, non-greedy, across newlines.
static INLINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"));

/// Two or more consecutive line-break markers.
static REPEATED_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<br>){2,}").expect("break-run pattern is valid"));

/// Line-break marker used inside quoted Mermaid labels.
pub const LINE_BREAK: &str = "<br>";

/// Normalize run code for embedding in a quoted Mermaid node label.
///
/// In order: remove `/* ... */` comment spans, delete `?` characters, trim
/// each line and join with [`LINE_BREAK`] (literal `\n` escape sequences in
/// the text become markers too), collapse consecutive markers, and replace
/// both quote characters with `&apos;` since the label itself is quoted.
#[must_use]
pub fn sanitize_label(code: &str) -> String {
    let without_comments = INLINE_COMMENT.replace_all(code, "");
    let without_specials = without_comments.replace('?', "");

    let joined = without_specials
        .lines()
        .map(|line| line.trim().replace(r"\n", LINE_BREAK))
        .collect::<Vec<_>>()
        .join(LINE_BREAK);
    let collapsed = REPEATED_BREAKS.replace_all(&joined, LINE_BREAK);

    collapsed.replace('\'', "&apos;").replace('"', "&apos;")
}

/// Rewrite every run's code in place with [`sanitize_label`].
#[must_use]
pub fn sanitize_runs(mut runs: Vec<Run>) -> Vec<Run> {
    for run in &mut runs {
        run.run_code = sanitize_label(&run.run_code);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::sanitize_label;
    use proptest::prelude::*;

    #[test]
    fn comment_spans_are_removed_across_newlines() {
        let label = sanitize_label("keep /* drop\nthis */ rest");
        assert_eq!(label, "keep  rest");
    }

    #[test]
    fn question_marks_are_deleted() {
        assert_eq!(sanitize_label("what? why?"), "what why");
    }

    #[test]
    fn newlines_become_single_break_markers() {
        assert_eq!(sanitize_label("a\nb\nc"), "a<br>b<br>c");
    }

    #[test]
    fn blank_lines_collapse_to_one_marker() {
        assert_eq!(sanitize_label("a\n\n\nb"), "a<br>b");
    }

    #[test]
    fn literal_backslash_n_becomes_a_marker() {
        assert_eq!(sanitize_label(r"a\nb"), "a<br>b");
    }

    #[test]
    fn lines_are_trimmed_before_joining() {
        assert_eq!(sanitize_label("  a  \n   b"), "a<br>b");
    }

    #[test]
    fn both_quote_kinds_become_entities() {
        assert_eq!(sanitize_label("say 'hi' \"there\""), "say &apos;hi&apos; &apos;there&apos;");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize_label(""), "");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_labels_are_safe_for_quoted_embedding(input in ".{0,256}") {
            let label = sanitize_label(&input);
            prop_assert!(!label.contains('\''));
            prop_assert!(!label.contains('"'));
            prop_assert!(!label.contains('\n'));
            prop_assert!(!label.contains('?'));
        }

        #[test]
        fn prop_sanitize_is_deterministic(input in ".{0,256}") {
            prop_assert_eq!(sanitize_label(&input), sanitize_label(&input));
        }
    }
}
