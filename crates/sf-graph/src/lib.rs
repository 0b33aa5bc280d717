#![forbid(unsafe_code)]

//! Weak-component assignment and dataset-network projection over run
//! collections, plus the end-to-end analysis facade.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use sf_core::{AnalysisSummary, DatasetGraph, Run, ScriptReport};
use tracing::debug;

/// Label every run with the weak-component id of its datasets.
///
/// The dataset graph gets one directed edge per run-local (input, output)
/// pair, self-loops included; components ignore direction. A run whose
/// datasets never appear in any edge (for example a read with no write
/// anywhere) keeps `sub_graph_id = None`.
#[must_use]
pub fn assign_subgraph_ids(mut runs: Vec<Run>) -> Vec<Run> {
    let graph = DatasetGraph::from_runs(&runs);
    let components = graph.components();
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        components = graph.component_count(),
        "built dataset graph"
    );

    for run in &mut runs {
        let id = run
            .datasets()
            .find_map(|dataset| components.get(dataset).copied());
        run.sub_graph_id = id;
    }

    runs
}

/// Project the global metadata and the dataset-level network from a final
/// run collection.
#[must_use]
pub fn project_summary(runs: &[Run]) -> AnalysisSummary {
    let inputs: BTreeSet<&String> = runs.iter().flat_map(|run| run.inputs.iter()).collect();
    let outputs: BTreeSet<&String> = runs.iter().flat_map(|run| run.outputs.iter()).collect();
    let subgraphs: BTreeSet<usize> = runs.iter().filter_map(|run| run.sub_graph_id).collect();

    let inputs: Vec<String> = inputs.into_iter().cloned().collect();
    let outputs: Vec<String> = outputs.into_iter().cloned().collect();

    // Node order: inputs first, then outputs not already seen.
    let mut seen_nodes: FxHashSet<&str> = FxHashSet::default();
    let mut nodes = Vec::new();
    for name in inputs.iter().chain(outputs.iter()) {
        if seen_nodes.insert(name.as_str()) {
            nodes.push(name.clone());
        }
    }

    // Edge order: run-collection order, sorted inputs, sorted outputs;
    // self-pairs excluded, duplicates collapse onto the first occurrence.
    let mut seen_edges: FxHashSet<(&str, &str)> = FxHashSet::default();
    let mut edges = Vec::new();
    for run in runs {
        for input in &run.inputs {
            for output in &run.outputs {
                if input == output {
                    continue;
                }
                if seen_edges.insert((input.as_str(), output.as_str())) {
                    edges.push((input.clone(), output.clone()));
                }
            }
        }
    }

    AnalysisSummary {
        inputs,
        outputs,
        subgraphs: subgraphs.into_iter().collect(),
        nodes,
        edges,
    }
}

/// Run the whole pipeline on raw script text: clean, segment, extract,
/// merge identity runs, assign subgraph ids, project the summary.
///
/// Run code is left as extracted; callers embedding it in a diagram label
/// sanitize it separately.
#[must_use]
pub fn analyze_script(raw: &str) -> ScriptReport {
    let runs = sf_parser::parse_script(raw);
    let runs = sf_parser::merge_identity_runs(runs);
    let runs = assign_subgraph_ids(runs);
    let summary = project_summary(&runs);
    ScriptReport { runs, summary }
}
