use rustc_hash::FxHashMap;
use sf_core::Run;
use tracing::debug;

/// Coalesce identity runs: runs whose single input equals their single
/// output (in-place rewrites of one dataset).
///
/// Candidates are grouped by that dataset. Each group is sorted by
/// `(section_index, run_index)` and collapsed into one run carrying the
/// first member's indices and sets, with the members' code joined by
/// newlines in that order. Non-candidates pass through untouched and the
/// whole collection is re-sorted by `(section_index, run_index)`.
///
/// Every input run's code ends up in exactly one output run, and the output
/// collection is never larger than the input.
#[must_use]
pub fn merge_identity_runs(runs: Vec<Run>) -> Vec<Run> {
    let total = runs.len();

    let mut groups: FxHashMap<String, Vec<Run>> = FxHashMap::default();
    let mut merged: Vec<Run> = Vec::with_capacity(total);

    for run in runs {
        match run.identity_dataset() {
            Some(dataset) => groups.entry(dataset.to_string()).or_default().push(run),
            None => merged.push(run),
        }
    }

    for (_, mut group) in groups {
        group.sort_by_key(Run::order_key);
        let joined = group
            .iter()
            .map(|run| run.run_code.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let Some(mut first) = group.into_iter().next() else {
            continue;
        };
        first.run_code = joined;
        merged.push(first);
    }

    merged.sort_by_key(Run::order_key);
    debug!(before = total, after = merged.len(), "merged identity runs");
    merged
}

#[cfg(test)]
mod tests {
    use super::merge_identity_runs;
    use sf_core::Run;
    use std::collections::BTreeSet;

    fn run(section: usize, index: usize, code: &str, ins: &[&str], outs: &[&str]) -> Run {
        Run::new(
            section,
            index,
            code.to_string(),
            ins.iter().map(|s| (*s).to_string()).collect(),
            outs.iter().map(|s| (*s).to_string()).collect(),
        )
    }

    #[test]
    fn identity_runs_on_one_dataset_collapse_to_one() {
        let runs = vec![
            run(0, 0, "x", &["A"], &["A"]),
            run(0, 2, "y", &["A"], &["A"]),
        ];
        let merged = merge_identity_runs(runs);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].run_code, "x\ny");
        assert_eq!(merged[0].order_key(), (0, 0));
        assert_eq!(merged[0].inputs, BTreeSet::from([String::from("A")]));
        assert_eq!(merged[0].outputs, BTreeSet::from([String::from("A")]));
    }

    #[test]
    fn group_code_joins_in_section_then_run_order() {
        let runs = vec![
            run(1, 0, "third", &["A"], &["A"]),
            run(0, 5, "second", &["A"], &["A"]),
            run(0, 1, "first", &["A"], &["A"]),
        ];
        let merged = merge_identity_runs(runs);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].run_code, "first\nsecond\nthird");
        assert_eq!(merged[0].order_key(), (0, 1));
    }

    #[test]
    fn non_candidates_pass_through_unchanged() {
        let runs = vec![
            run(0, 0, "a-to-b", &["A"], &["B"]),
            run(0, 2, "rewrite", &["C"], &["C"]),
            run(0, 4, "two-in", &["C", "D"], &["C"]),
        ];
        let merged = merge_identity_runs(runs);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].run_code, "a-to-b");
        assert_eq!(merged[1].run_code, "rewrite");
        assert_eq!(merged[2].run_code, "two-in");
    }

    #[test]
    fn separate_datasets_merge_into_separate_runs() {
        let runs = vec![
            run(0, 0, "a1", &["A"], &["A"]),
            run(0, 1, "b1", &["B"], &["B"]),
            run(0, 2, "a2", &["A"], &["A"]),
            run(0, 3, "b2", &["B"], &["B"]),
        ];
        let merged = merge_identity_runs(runs);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].run_code, "a1\na2");
        assert_eq!(merged[1].run_code, "b1\nb2");
    }

    #[test]
    fn merge_preserves_the_multiset_of_code_lines() {
        let runs = vec![
            run(0, 0, "line1\nline2", &["A"], &["A"]),
            run(0, 1, "keep", &["B"], &["C"]),
            run(1, 0, "line3", &["A"], &["A"]),
        ];

        let mut before: Vec<String> = runs
            .iter()
            .flat_map(|r| r.run_code.lines().map(String::from))
            .collect();
        before.sort();

        let merged = merge_identity_runs(runs);
        let mut after: Vec<String> = merged
            .iter()
            .flat_map(|r| r.run_code.lines().map(String::from))
            .collect();
        after.sort();

        assert_eq!(before, after);
    }

    #[test]
    fn output_is_sorted_by_section_then_run_index() {
        let runs = vec![
            run(1, 0, "later", &["X"], &["Y"]),
            run(0, 3, "rewrite", &["A"], &["A"]),
            run(0, 1, "earlier", &["P"], &["Q"]),
        ];
        let merged = merge_identity_runs(runs);

        let keys: Vec<(usize, usize)> = merged.iter().map(Run::order_key).collect();
        assert_eq!(keys, vec![(0, 1), (0, 3), (1, 0)]);
    }

    #[test]
    fn empty_collection_is_a_no_op() {
        assert!(merge_identity_runs(Vec::new()).is_empty());
    }
}
