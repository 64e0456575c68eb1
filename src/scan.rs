//! One-shot organize pass.
//!
//! A `ScanRun` walks the target directory, feeds every candidate file through
//! the shared pipeline, optionally sweeps empty directories afterwards, and
//! returns a finalized [`RunSummary`]. Phases run strictly in order, so the
//! sweep never races a move.

use crate::config::{ConfigError, OrganizeConfig};
use crate::organizer::{FileCandidate, Organizer};
use crate::report::RunSummary;
use crate::sweeper;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// One full pass: scan, process, sweep, done.
pub struct ScanRun {
    organizer: Organizer,
}

impl ScanRun {
    /// Builds a run for the given configuration.
    ///
    /// Fails fast on an unusable target folder; nothing is touched then.
    pub fn new(config: OrganizeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            organizer: Organizer::new(config)?,
        })
    }

    /// Runs the pass and returns the finalized summary.
    pub fn run(&self) -> RunSummary {
        self.run_with(|_, _| {})
    }

    /// Like [`run`](Self::run), reporting `(processed, total)` after each file.
    ///
    /// Lets a CLI or GUI front-end drive a progress display without the
    /// engine knowing about it.
    pub fn run_with(&self, mut progress: impl FnMut(usize, usize)) -> RunSummary {
        let mut summary = RunSummary::new();

        let candidates = self.collect_candidates(&mut summary);
        summary.files_scanned += candidates.len();

        let total = candidates.len();
        for (index, candidate) in candidates.iter().enumerate() {
            // One file failing never aborts the rest of the batch.
            if let Err(e) = self.organizer.organize_candidate(candidate, &mut summary) {
                warn!(path = %candidate.path.display(), error = %e, "failed to organize file");
                summary.record_error(&candidate.path, e.to_string());
            }
            progress(index + 1, total);
        }

        if self.organizer.config().delete_empty {
            summary.folders_deleted += sweeper::sweep(&self.organizer.config().target_folder);
        }

        summary.completed = true;
        info!(
            files_scanned = summary.files_scanned,
            folders_created = summary.folders_created,
            files_moved = summary.files_moved,
            folders_deleted = summary.folders_deleted,
            errors = summary.errors.len(),
            "organize run complete"
        );
        summary
    }

    /// Enumerates candidate files under the target.
    ///
    /// Non-recursive runs look only at the top level. Recursive runs descend
    /// into subdirectories but skip the engine's own output trees, so an
    /// already-organized hierarchy is left alone.
    fn collect_candidates(&self, summary: &mut RunSummary) -> Vec<FileCandidate> {
        let mut candidates = Vec::new();
        self.collect_from(&self.organizer.config().target_folder, &mut candidates, summary);
        candidates
    }

    fn collect_from(
        &self,
        dir: &Path,
        candidates: &mut Vec<FileCandidate>,
        summary: &mut RunSummary,
    ) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(directory = %dir.display(), error = %e, "could not read directory");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if self.organizer.config().recursive && !self.organizer.is_own_output(&path) {
                    self.collect_from(&path, candidates, summary);
                }
            } else if file_type.is_file() {
                match FileCandidate::from_path(&path) {
                    Ok(candidate) => candidates.push(candidate),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "could not stat file");
                        summary.record_error(&path, e.to_string());
                    }
                }
            }
        }
    }
}
