#![forbid(unsafe_code)]

//! Core data model for sasflow: run records, the dataset dependency graph,
//! and the persisted analysis report.

mod graph;
mod report;

pub use graph::DatasetGraph;
pub use report::{AnalysisSummary, ReportError, ScriptReport, runs_from_json, runs_to_json_pretty};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One unit of extracted work: the script text between two statement
/// terminators, plus the dataset names it reads and writes.
///
/// Inputs and outputs are `BTreeSet`s so every downstream iteration over a
/// run's datasets happens in one fixed (sorted) order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Run {
    /// Position of the enclosing section in the original script.
    pub section_index: usize,
    /// Position of the fragment within its section.
    pub run_index: usize,
    /// Text of the unit. Rewritten in place by label sanitization.
    pub run_code: String,
    /// Dataset names read by this run.
    pub inputs: BTreeSet<String>,
    /// Dataset names written by this run.
    pub outputs: BTreeSet<String>,
    /// Weak-component id, assigned once the dataset graph is built.
    pub sub_graph_id: Option<usize>,
}

impl Run {
    #[must_use]
    pub const fn new(
        section_index: usize,
        run_index: usize,
        run_code: String,
        inputs: BTreeSet<String>,
        outputs: BTreeSet<String>,
    ) -> Self {
        Self {
            section_index,
            run_index,
            run_code,
            inputs,
            outputs,
            sub_graph_id: None,
        }
    }

    /// A split residual carries no dataset references at all; it is an
    /// artifact of splitting on `RUN;`/`QUIT;` keywords and must not appear
    /// in a final run collection.
    #[must_use]
    pub fn is_split_residual(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }

    /// An identity run rewrites a single dataset in place: exactly one
    /// input, exactly one output, same name. Returns that dataset.
    #[must_use]
    pub fn identity_dataset(&self) -> Option<&str> {
        if self.inputs.len() == 1 && self.inputs == self.outputs {
            self.inputs.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    /// Sort key used everywhere a run collection is ordered.
    #[must_use]
    pub const fn order_key(&self) -> (usize, usize) {
        (self.section_index, self.run_index)
    }

    /// All datasets this run touches, inputs first, each side in sorted
    /// order. This is the deterministic iteration order the component
    /// assignment and edge projection rely on.
    pub fn datasets(&self) -> impl Iterator<Item = &str> {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .map(String::as_str)
    }
}
