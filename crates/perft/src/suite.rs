//! Perft suite loading and execution.
//!
//! A suite is a TOML file listing positions together with the leaf count
//! expected at a given depth:
//!
//! ```toml
//! max_depth = 4
//!
//! [[positions]]
//! name = "startpos"
//! fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
//! depth = 5
//! nodes = 4865609
//! ```
//!
//! When the file does not exist the built-in suite is used instead.

use chess_engine::{perft, Position, PositionError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use crate::report::CaseReport;

/// Errors that can occur when loading or running a suite.
#[derive(Error, Debug)]
pub enum SuiteError {
    /// Failed to read the suite file from disk.
    #[error("Failed to read suite file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the suite file as valid TOML.
    #[error("Failed to parse suite: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A suite entry carries a position the engine rejects.
    #[error("Invalid position '{name}': {source}")]
    InvalidPosition {
        name: String,
        #[source]
        source: PositionError,
    },
}

/// One position with its expected perft count.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PerftCase {
    pub name: String,
    pub fen: String,
    pub depth: u32,
    /// Expected leaf count at `depth`.
    pub nodes: u64,
}

impl PerftCase {
    fn new(name: &str, fen: &str, depth: u32, nodes: u64) -> Self {
        PerftCase {
            name: name.to_string(),
            fen: fen.to_string(),
            depth,
            nodes,
        }
    }

    /// Runs perft on this case and compares against the expected count.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::InvalidPosition`] if the FEN is rejected.
    pub fn run(&self) -> Result<CaseReport, SuiteError> {
        let position =
            Position::from_fen(&self.fen).map_err(|source| SuiteError::InvalidPosition {
                name: self.name.clone(),
                source,
            })?;

        let started = Instant::now();
        let nodes = perft(&position, self.depth);
        let elapsed = started.elapsed();

        Ok(CaseReport::new(self, nodes, elapsed))
    }
}

/// A list of perft cases plus an optional depth cap.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Suite {
    /// Cases deeper than this are skipped. No cap when absent.
    #[serde(default)]
    pub max_depth: Option<u32>,
    #[serde(default)]
    pub positions: Vec<PerftCase>,
}

impl Default for Suite {
    /// The four reference positions with their well-known deep counts.
    fn default() -> Self {
        Suite {
            max_depth: None,
            positions: vec![
                PerftCase::new(
                    "startpos",
                    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                    5,
                    4_865_609,
                ),
                PerftCase::new(
                    "kiwipete",
                    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                    4,
                    4_085_603,
                ),
                PerftCase::new(
                    "position3",
                    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
                    5,
                    674_624,
                ),
                PerftCase::new(
                    "position4-mirrored",
                    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
                    5,
                    15_833_292,
                ),
            ],
        }
    }
}

impl Suite {
    /// Loads a suite from `path`, or the built-in suite if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::ReadError`] if the file exists but cannot be read,
    /// or [`SuiteError::ParseError`] if it contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, SuiteError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            tracing::info!("No suite file at {:?}, using built-in positions", path);
            Ok(Self::default())
        }
    }

    /// Returns the default suite location, `perft.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("perft.toml")
    }

    /// Replaces the depth cap when `max_depth` is given.
    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        if max_depth.is_some() {
            self.max_depth = max_depth;
        }
        self
    }

    /// Splits the cases into those within the depth cap and those beyond it.
    pub fn partition(&self) -> (Vec<&PerftCase>, Vec<&PerftCase>) {
        self.positions
            .iter()
            .partition(|case| self.max_depth.map_or(true, |cap| case.depth <= cap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suite_toml() {
        let toml_content = r#"
max_depth = 3

[[positions]]
name = "startpos"
fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
depth = 3
nodes = 8902

[[positions]]
name = "position3"
fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"
depth = 4
nodes = 43238
"#;

        let suite: Suite = toml::from_str(toml_content).unwrap();
        assert_eq!(suite.max_depth, Some(3));
        assert_eq!(suite.positions.len(), 2);
        assert_eq!(suite.positions[0].name, "startpos");
        assert_eq!(suite.positions[0].nodes, 8902);
        assert_eq!(suite.positions[1].depth, 4);
    }

    #[test]
    fn test_parse_suite_without_cap() {
        let suite: Suite = toml::from_str("").unwrap();
        assert_eq!(suite.max_depth, None);
        assert!(suite.positions.is_empty());
    }

    #[test]
    fn test_missing_file_uses_builtin_suite() {
        let suite = Suite::load(Path::new("/nonexistent/perft-suite.toml")).unwrap();
        assert_eq!(suite, Suite::default());
        assert_eq!(suite.positions.len(), 4);
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!("perft-suite-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[[positions]]\nname = \"bare\"\nfen = \"4k3/8/8/8/8/8/8/4K3 w - - 0 1\"\ndepth = 1\nnodes = 5\n",
        )
        .unwrap();

        let suite = Suite::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(suite.positions.len(), 1);
        assert_eq!(suite.positions[0].name, "bare");
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let path = std::env::temp_dir().join(format!("perft-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "positions = 7").unwrap();

        let result = Suite::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SuiteError::ParseError(_))));
    }

    #[test]
    fn test_max_depth_partitions_cases() {
        let suite = Suite::default().with_max_depth(Some(4));
        let (run, skipped) = suite.partition();
        assert_eq!(run.len(), 1);
        assert_eq!(run[0].name, "kiwipete");
        assert_eq!(skipped.len(), 3);

        let uncapped = Suite::default().with_max_depth(None);
        assert_eq!(uncapped.partition().0.len(), 4);
    }

    #[test]
    fn test_run_case_passes() {
        let case = PerftCase::new(
            "startpos",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            3,
            8902,
        );
        let report = case.run().unwrap();
        assert!(report.passed);
        assert_eq!(report.nodes, 8902);
    }

    #[test]
    fn test_run_case_reports_mismatch() {
        let case = PerftCase::new("bare", "4k3/8/8/8/8/8/8/4K3 w - - 0 1", 1, 6);
        let report = case.run().unwrap();
        assert!(!report.passed);
        assert_eq!(report.nodes, 5);
        assert_eq!(report.expected, 6);
    }

    #[test]
    fn test_run_case_rejects_invalid_fen() {
        let case = PerftCase::new("broken", "not a fen", 1, 0);
        match case.run() {
            Err(SuiteError::InvalidPosition { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected InvalidPosition, got {:?}", other),
        }
    }
}
