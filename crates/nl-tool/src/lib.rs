mod case;
mod runner;
mod source;

pub use case::{ExpectedDiagnostic, TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, run_case, RunReport};
pub use source::read_test_case;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NlToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("Check error: {0}")]
    Check(#[from] nl_core::NodeLinkError),
    #[error("Expected diagnostic count {expected}, actual {actual}. observed={observed}")]
    DiagnosticCountMismatch {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("Diagnostic mismatch at index {index}. expected={expected} actual={actual}")]
    DiagnosticMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("Failed to serialize diagnostics for diff: {0}")]
    DiagnosticSerialize(serde_json::Error),
}
