use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// `DATA <name>` statement: names the dataset being written.
static DATA_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDATA\s+([A-Za-z0-9_.]+)").expect("DATA statement pattern is valid")
});

/// `SET <name>`: names a dataset being read.
static SET_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSET\s+([A-Za-z0-9_.]+)").expect("SET statement pattern is valid")
});

/// `MERGE <list up to ;>`: every dataset token in the list is read.
static MERGE_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bMERGE\s+([^;]+)").expect("MERGE statement pattern is valid")
});

/// One dataset token inside a MERGE list. The optional `(IN=name)` qualifier
/// is consumed so its flag variable is not mistaken for a dataset.
static MERGE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Za-z0-9_.]+)(?:\s*\(IN=[A-Za-z0-9_]+\))?")
        .expect("MERGE token pattern is valid")
});

/// `DATA=<name>` / `OUT=<name>` options on PROC steps.
static PROC_IO_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(DATA|OUT)\s*=\s*([A-Za-z0-9_.]+)").expect("PROC option pattern is valid")
});

/// Scan one run's text for dataset reads (`inputs`) and writes (`outputs`).
///
/// Rules, applied independently and unioned:
/// - the FIRST `DATA <name>` statement contributes to outputs (later DATA
///   statements in the same run are not captured -- a known approximation
///   carried over from the original extraction rules, not a guaranteed
///   parse);
/// - every `SET <name>` contributes to inputs;
/// - every `MERGE <list>;` contributes each listed dataset to inputs;
/// - every `DATA=<name>` contributes to inputs, every `OUT=<name>` to
///   outputs.
///
/// Keywords match case-insensitively; captured names keep their original
/// case. Text without any match yields empty sets, never an error.
#[must_use]
pub fn extract_refs(run_text: &str) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut inputs = BTreeSet::new();
    let mut outputs = BTreeSet::new();

    if let Some(caps) = DATA_STATEMENT.captures(run_text) {
        outputs.insert(caps[1].to_string());
    }

    for caps in SET_STATEMENT.captures_iter(run_text) {
        inputs.insert(caps[1].to_string());
    }

    for caps in MERGE_STATEMENT.captures_iter(run_text) {
        let list = caps.get(1).map_or("", |m| m.as_str());
        for token in MERGE_TOKEN.captures_iter(list) {
            inputs.insert(token[1].to_string());
        }
    }

    for caps in PROC_IO_OPTION.captures_iter(run_text) {
        let name = caps[2].to_string();
        if caps[1].eq_ignore_ascii_case("DATA") {
            inputs.insert(name);
        } else {
            outputs.insert(name);
        }
    }

    (inputs, outputs)
}
