#![forbid(unsafe_code)]

//! SAS script segmentation and dataset-reference extraction.
//!
//! This is deliberately not a SAS parser: there is no grammar, no macro
//! expansion, and no variable resolution. Scripts are split on statement
//! terminators and scanned with fixed patterns for literal dataset-name
//! tokens. Garbage input degrades to empty reference sets rather than
//! erroring.

mod extract;
mod merge;
mod segment;

pub use extract::extract_refs;
pub use merge::merge_identity_runs;
pub use segment::{Fragment, segment};

use std::sync::LazyLock;

use regex::Regex;
use sf_core::Run;
use tracing::debug;

/// Decorative separator blocks: `/*` + any number of dashes + `*/` plus
/// trailing whitespace.
static DECORATIVE_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\*-*\*/\s*").expect("decorative comment pattern is valid")
});

/// Strip decorative comment blocks from raw script text.
///
/// Idempotent: applying twice yields the same result as applying once.
#[must_use]
pub fn clean(raw: &str) -> String {
    DECORATIVE_COMMENT.replace_all(raw, "").into_owned()
}

/// Split a script into runs and extract each run's dataset references.
///
/// Composes [`clean`], [`segment`], and [`extract_refs`], then drops split
/// residuals: fragments (usually the bare `RUN`/`QUIT` keyword left behind
/// by terminator splitting) that carry no dataset references at all. The
/// residual filter has to sit here, after extraction, because only an empty
/// extraction proves a fragment is residual.
#[must_use]
pub fn parse_script(raw: &str) -> Vec<Run> {
    let cleaned = clean(raw);

    let mut runs = Vec::new();
    let mut residuals = 0_usize;
    for fragment in segment(&cleaned) {
        let (inputs, outputs) = extract_refs(&fragment.text);
        let run = Run::new(
            fragment.section_index,
            fragment.run_index,
            fragment.text,
            inputs,
            outputs,
        );
        if run.is_split_residual() {
            residuals += 1;
            continue;
        }
        runs.push(run);
    }

    debug!(runs = runs.len(), residuals, "segmented script");
    runs
}
