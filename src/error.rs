use std::path::PathBuf;
use thiserror::Error;

/// Why a single input row was left out of the result. Row numbers are 1-based data rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row {row}: missing required fields")]
    MissingRequiredField { row: usize },
    #[error("row {row}: invalid campaign cookie data")]
    DecodeFailure { row: usize },
}

/// Batch-level result of one input file. Unexpected failures travel as `anyhow::Error` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written { output: PathBuf, records: usize, skipped: usize },
    SourceNotFound { input: PathBuf },
    NoValidRecords { skipped: usize },
}

impl RunOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::SourceNotFound { .. })
    }
}
