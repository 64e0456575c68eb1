//! downsort - organize a downloads folder by file type and date.
//!
//! This library provides the classification-and-placement engine behind the
//! `downsort` binary: an extension-to-category rule table, a pure destination
//! planner, collision-safe file moves, empty-folder cleanup, a one-shot scan
//! run, and a debounced watch loop that organizes new files as they appear.

pub mod cli;
pub mod config;
pub mod mover;
pub mod organizer;
pub mod output;
pub mod planner;
pub mod report;
pub mod rules;
pub mod scan;
pub mod sweeper;
pub mod watch;

pub use config::{ConfigError, OrganizeConfig, OrganizeMode};
pub use mover::MoveError;
pub use organizer::{FileCandidate, Organizer};
pub use report::{ErrorRecord, RunSummary};
pub use rules::RuleTable;
pub use scan::ScanRun;
pub use watch::{ShutdownHandle, WatchError, WatchLoop, WatchOptions};
