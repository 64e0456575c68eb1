//! Shared per-file organization pipeline.
//!
//! Both the one-shot scan and the watch loop funnel every file through the
//! same steps: resolve its category from the rule table, plan a destination
//! under the target root, then move it there. The `Organizer` bundles the
//! validated configuration with the rule table built for this run.

use crate::config::{ConfigError, OrganizeConfig, OrganizeMode};
use crate::mover::{self, MoveError};
use crate::planner;
use crate::report::RunSummary;
use crate::rules::RuleTable;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A file picked up for organization.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    /// Absolute source path.
    pub path: PathBuf,
    /// Extension, empty for files without one.
    pub extension: String,
    /// Last-modified timestamp, used for year/month bucketing.
    pub modified: SystemTime,
}

impl FileCandidate {
    /// Builds a candidate from a path by reading its metadata.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let modified = fs::metadata(path)?.modified()?;
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            extension,
            modified,
        })
    }
}

/// The classification-and-placement engine for one run.
pub struct Organizer {
    config: OrganizeConfig,
    rules: RuleTable,
    categories: HashSet<String>,
}

impl Organizer {
    /// Validates the configuration and builds the rule table for this run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TargetMissing`] if the target folder is not a
    /// directory; nothing is touched in that case.
    pub fn new(config: OrganizeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = RuleTable::with_custom_rules(&config.custom_rules);
        let categories = rules.category_names();
        Ok(Self {
            config,
            rules,
            categories,
        })
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &OrganizeConfig {
        &self.config
    }

    /// The rule table built for this run.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Runs the full pipeline for one path: metadata, category, plan, move.
    ///
    /// Returns the file's final path on success.
    pub fn organize_file(
        &self,
        path: &Path,
        summary: &mut RunSummary,
    ) -> Result<PathBuf, MoveError> {
        let candidate = FileCandidate::from_path(path).map_err(|e| MoveError::Metadata {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.organize_candidate(&candidate, summary)
    }

    /// Resolves, plans and moves an already-built candidate.
    pub fn organize_candidate(
        &self,
        candidate: &FileCandidate,
        summary: &mut RunSummary,
    ) -> Result<PathBuf, MoveError> {
        let category = self.rules.resolve(&candidate.extension);
        let relative = planner::plan(category, candidate.modified.into(), self.config.method);
        let dest_dir = self.config.target_folder.join(relative);
        mover::move_into(&candidate.path, &dest_dir, summary)
    }

    /// True if `path` lives inside a directory the engine itself creates.
    ///
    /// Checked against the first path component under the target root:
    /// category roots, year roots in `date_type` mode, and dot-prefixed
    /// entries are all the tool's own territory. Keeps the scanner from
    /// reorganizing organized output and the watch loop from feeding on its
    /// own move events.
    pub fn is_own_output(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.config.target_folder) else {
            // Outside the target entirely; not ours to touch.
            return true;
        };
        let Some(first) = relative.components().next() else {
            return true;
        };
        let name = first.as_os_str().to_string_lossy();

        name.starts_with('.')
            || self.categories.contains(name.as_ref())
            || (self.config.method == OrganizeMode::DateType && is_year_component(&name))
    }
}

fn is_year_component(name: &str) -> bool {
    name.len() == 4 && name.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn organizer(temp_dir: &TempDir, method: OrganizeMode) -> Organizer {
        let config = OrganizeConfig {
            target_folder: temp_dir.path().to_path_buf(),
            method,
            ..Default::default()
        };
        Organizer::new(config).expect("Failed to build organizer")
    }

    #[test]
    fn test_new_rejects_missing_target() {
        let config = OrganizeConfig {
            target_folder: PathBuf::from("/nonexistent/target"),
            ..Default::default()
        };
        assert!(Organizer::new(config).is_err());
    }

    #[test]
    fn test_organize_file_moves_into_planned_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("song.mp3");
        fs::write(&source, "audio").unwrap();

        let organizer = organizer(&temp_dir, OrganizeMode::Type);
        let mut summary = RunSummary::new();
        let moved = organizer
            .organize_file(&source, &mut summary)
            .expect("Organize failed");

        assert_eq!(moved, temp_dir.path().join("Audio").join("song.mp3"));
        assert!(!source.exists());
        assert_eq!(summary.files_moved, 1);
    }

    #[test]
    fn test_category_root_is_own_output() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer(&temp_dir, OrganizeMode::TypeDate);

        assert!(organizer.is_own_output(&temp_dir.path().join("Images").join("a.jpg")));
        assert!(organizer.is_own_output(&temp_dir.path().join(".downsort.lock")));
        assert!(!organizer.is_own_output(&temp_dir.path().join("fresh.jpg")));
        assert!(!organizer.is_own_output(&temp_dir.path().join("projects").join("a.jpg")));
    }

    #[test]
    fn test_year_root_is_own_output_in_date_type_mode() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let date_type = organizer(&temp_dir, OrganizeMode::DateType);
        assert!(date_type.is_own_output(&temp_dir.path().join("2024").join("Jan")));

        // In the other modes a four-digit directory is just a directory
        let type_date = organizer(&temp_dir, OrganizeMode::TypeDate);
        assert!(!type_date.is_own_output(&temp_dir.path().join("2024").join("Jan")));
    }

    #[test]
    fn test_custom_category_recognized_as_own_output() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut custom_rules = std::collections::HashMap::new();
        custom_rules.insert(".xyz".to_string(), "Special".to_string());
        let config = OrganizeConfig {
            target_folder: temp_dir.path().to_path_buf(),
            custom_rules,
            ..Default::default()
        };
        let organizer = Organizer::new(config).unwrap();

        assert!(organizer.is_own_output(&temp_dir.path().join("Special").join("a.xyz")));
    }
}
