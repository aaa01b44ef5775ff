//! Suite results and their JSON form.

use serde::Serialize;
use std::time::Duration;

use crate::suite::PerftCase;

/// Outcome of running one perft case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub fen: String,
    pub depth: u32,
    pub expected: u64,
    pub nodes: u64,
    pub passed: bool,
    pub elapsed_ms: u64,
    /// Leaf nodes per second, 0 when the run was too fast to time.
    pub nps: u64,
}

impl CaseReport {
    pub fn new(case: &PerftCase, nodes: u64, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let nps = if secs > 0.0 {
            (nodes as f64 / secs) as u64
        } else {
            0
        };
        CaseReport {
            name: case.name.clone(),
            fen: case.fen.clone(),
            depth: case.depth,
            expected: case.nodes,
            nodes,
            passed: nodes == case.nodes,
            elapsed_ms: elapsed.as_millis() as u64,
            nps,
        }
    }
}

/// All case reports of a suite run.
#[derive(Debug, Default, Serialize)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
    /// Names of the cases beyond the depth cap.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl SuiteReport {
    pub fn failures(&self) -> usize {
        self.cases.iter().filter(|c| !c.passed).count()
    }

    pub fn all_passed(&self) -> bool {
        self.failures() == 0
    }

    /// Pretty-printed JSON of the whole report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
