//! Result types for a batch run.
//!
//! [`BatchReport`] records exactly one [`FileOutcome`] per matched PDF, in
//! processing order, so callers can tell which inputs left a gap in the
//! output directory and why.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// The outcome of converting a single PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    /// The PDF that was attempted.
    pub input: PathBuf,
    /// The TIFF that was written, on success.
    pub output: Option<PathBuf>,
    /// Human-readable failure, on error.
    pub error: Option<String>,
    /// Failing step (`document_open`, `render`, `write`, …), on error.
    pub error_kind: Option<&'static str>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a completed [`crate::Converter::run`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// One entry per matched input, in processing order.
    pub outcomes: Vec<FileOutcome>,
    /// Wall-clock time for the whole batch.
    pub duration_ms: u64,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Iterate over the failed inputs and their error messages.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_deref().map(|e| (o.input.as_path(), e)))
    }

    /// Paths of every TIFF written during the run.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| o.output.as_deref())
    }
}
