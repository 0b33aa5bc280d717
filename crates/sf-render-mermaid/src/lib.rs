#![forbid(unsafe_code)]

//! Mermaid flowchart rendering for analyzed run collections.
//!
//! Emits the block grammar consumed by any Mermaid-compatible renderer:
//! `subgraph` cluster blocks with `id["label"]` declarations, `-->` edges,
//! and trailing `classDef` declarations. Output is deterministic: the same
//! run collection in the same order renders to byte-identical text.

mod sanitize;

pub use sanitize::{LINE_BREAK, sanitize_label, sanitize_runs};

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use sf_core::Run;

const HEADER: &str = "flowchart TB\n";
const INPUT_OUTPUT_CLASS: &str = "classDef input_output fill:#90EE90,stroke:#000,stroke-width:1px;";
const RUN_CODE_CLASS: &str = "classDef run_code fill:#ADD8E6,stroke:#000,stroke-width:1px;";

/// Render a run collection as a top-down Mermaid flowchart.
///
/// Synthetic identifiers: `input_N` and `output_N` are allocated first-seen
/// and numbered independently; `proc_N` is the run's position in the whole
/// collection. Each weak component becomes one `subgraph ChartN` block (in
/// first-seen order) holding its dataset and process declarations; invisible
/// "Stacked Below" edges force vertical stacking between consecutive
/// blocks; the full input->process->output edge list follows in run order.
/// The two style classes at the end are declared only -- assigning them to
/// nodes is the consumer's concern.
#[must_use]
pub fn render_flowchart(runs: &[Run]) -> String {
    debug_assert!(
        runs.windows(2).all(|w| w[0].order_key() <= w[1].order_key()),
        "run collection must be sorted by (section_index, run_index)"
    );

    let mut input_ids: FxHashMap<&str, String> = FxHashMap::default();
    let mut output_ids: FxHashMap<&str, String> = FxHashMap::default();
    let mut edges: Vec<(String, String)> = Vec::new();
    let mut cluster_order: Vec<String> = Vec::new();
    let mut clusters: FxHashMap<String, BTreeSet<(String, String)>> = FxHashMap::default();

    for (position, run) in runs.iter().enumerate() {
        let process_id = format!("proc_{position}");
        let process_label = run.run_code.replace('\n', " ");
        let cluster_name = match run.sub_graph_id {
            Some(id) => format!("Chart{id}"),
            None => String::from("ChartNone"),
        };

        if !clusters.contains_key(&cluster_name) {
            cluster_order.push(cluster_name.clone());
        }
        let members = clusters.entry(cluster_name).or_default();

        for input in &run.inputs {
            let next = input_ids.len();
            let node_id = input_ids
                .entry(input.as_str())
                .or_insert_with(|| format!("input_{next}"))
                .clone();
            edges.push((node_id.clone(), process_id.clone()));
            members.insert((node_id, input.clone()));
        }

        for output in &run.outputs {
            let next = output_ids.len();
            let node_id = output_ids
                .entry(output.as_str())
                .or_insert_with(|| format!("output_{next}"))
                .clone();
            edges.push((process_id.clone(), node_id.clone()));
            members.insert((node_id, output.clone()));
        }

        members.insert((process_id, process_label));
    }

    let mut diagram = String::from(HEADER);

    for cluster_name in &cluster_order {
        diagram.push_str(&format!("    subgraph {cluster_name}\n"));
        if let Some(members) = clusters.get(cluster_name) {
            for (node_id, label) in members {
                diagram.push_str(&format!("        {node_id}[\"{label}\"]\n"));
            }
        }
        diagram.push_str("    end\n\n");
    }

    for pair in cluster_order.windows(2) {
        diagram.push_str(&format!("    {} -->|Stacked Below| {}\n", pair[0], pair[1]));
    }

    for (source, target) in &edges {
        diagram.push_str(&format!("    {source} --> {target}\n"));
    }

    diagram.push('\n');
    diagram.push_str(INPUT_OUTPUT_CLASS);
    diagram.push('\n');
    diagram.push_str(RUN_CODE_CLASS);
    diagram.push('\n');

    diagram
}
