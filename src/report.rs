//! Run summary accumulation.

use serde::Serialize;
use std::path::PathBuf;

/// A per-file failure recorded during a run.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Source path of the file that could not be processed.
    pub path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// Accumulated counters for one organize run or watch session.
///
/// Created at the start of a run, mutated only by the component orchestrating
/// that run, and returned finalized when the run completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Files considered for organization.
    pub files_scanned: usize,
    /// Directory levels created for destinations.
    pub folders_created: usize,
    /// Files successfully relocated.
    pub files_moved: usize,
    /// Empty directories removed by the sweep phase.
    pub folders_deleted: usize,
    /// Per-file failures; these never abort the run.
    pub errors: Vec<ErrorRecord>,
    /// Set once the run reaches its terminal state.
    pub completed: bool,
}

impl RunSummary {
    /// Creates an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a per-file failure.
    pub fn record_error(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        self.errors.push(ErrorRecord {
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// True if any per-file failure was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_is_empty() {
        let summary = RunSummary::new();
        assert_eq!(summary.files_scanned, 0);
        assert_eq!(summary.files_moved, 0);
        assert!(!summary.has_errors());
        assert!(!summary.completed);
    }

    #[test]
    fn test_record_error() {
        let mut summary = RunSummary::new();
        summary.record_error("/tmp/a.txt", "permission denied");
        assert!(summary.has_errors());
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].reason, "permission denied");
    }
}
