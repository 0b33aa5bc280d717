use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Run;

/// Failure while encoding or decoding a persisted analysis report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode analysis report: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode analysis report: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Global lists projected from a final run collection.
///
/// `inputs`, `outputs`, and `subgraphs` are sorted and deduplicated.
/// `nodes` keeps first-seen order over the union of inputs and outputs;
/// `edges` keeps first-seen order over the deduplicated dataset-level pairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AnalysisSummary {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub subgraphs: Vec<usize>,
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

/// The product of one script analysis: the final run collection plus the
/// projected summary. This is what the CLI persists to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScriptReport {
    pub runs: Vec<Run>,
    pub summary: AnalysisSummary,
}

impl ScriptReport {
    /// Encode the full report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(ReportError::Encode)
    }

    /// Decode a full report previously written by [`Self::to_json_pretty`].
    pub fn from_json(text: &str) -> Result<Self, ReportError> {
        serde_json::from_str(text).map_err(ReportError::Decode)
    }
}

/// Encode just the run collection as a JSON array of run-record mappings,
/// the interchange format downstream diagram consumers read.
pub fn runs_to_json_pretty(runs: &[Run]) -> Result<String, ReportError> {
    serde_json::to_string_pretty(runs).map_err(ReportError::Encode)
}

/// Decode a JSON array of run-record mappings.
pub fn runs_from_json(text: &str) -> Result<Vec<Run>, ReportError> {
    serde_json::from_str(text).map_err(ReportError::Decode)
}

#[cfg(test)]
mod tests {
    use super::{AnalysisSummary, ScriptReport, runs_from_json, runs_to_json_pretty};
    use crate::Run;
    use std::collections::BTreeSet;

    fn sample_run() -> Run {
        let mut run = Run::new(
            0,
            0,
            String::from("DATA out1; SET in1;"),
            BTreeSet::from([String::from("in1")]),
            BTreeSet::from([String::from("out1")]),
        );
        run.sub_graph_id = Some(0);
        run
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = ScriptReport {
            runs: vec![sample_run()],
            summary: AnalysisSummary {
                inputs: vec![String::from("in1")],
                outputs: vec![String::from("out1")],
                subgraphs: vec![0],
                nodes: vec![String::from("in1"), String::from("out1")],
                edges: vec![(String::from("in1"), String::from("out1"))],
            },
        };

        let json = report.to_json_pretty().expect("encode report");
        let decoded = ScriptReport::from_json(&json).expect("decode report");
        assert_eq!(decoded, report);
    }

    #[test]
    fn run_array_round_trips_through_json() {
        let runs = vec![sample_run()];
        let json = runs_to_json_pretty(&runs).expect("encode runs");
        assert!(json.trim_start().starts_with('['));

        let decoded = runs_from_json(&json).expect("decode runs");
        assert_eq!(decoded, runs);
    }

    #[test]
    fn malformed_report_text_is_a_decode_error() {
        let err = ScriptReport::from_json("{not json").expect_err("must fail");
        assert!(err.to_string().contains("decode"));
    }
}
