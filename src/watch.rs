//! Watch mode: organize new files as they appear.
//!
//! Subscribes to filesystem notifications on the target directory and runs
//! each newly settled file through the same per-file pipeline as a scan run.
//! Paths seen in change events are held in a pending set and only processed
//! once no further event arrives for them within the debounce window, so a
//! file still being written is not grabbed mid-write; a re-notification
//! resets the timer instead of spawning duplicate work. Events for the
//! engine's own destination directories are ignored, which keeps the loop
//! from feeding on its own moves.

use crate::config::{ConfigError, OrganizeConfig};
use crate::organizer::Organizer;
use crate::report::RunSummary;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// How long the loop sleeps between checks when nothing is pending.
const IDLE_TICK: Duration = Duration::from_millis(500);

/// Errors raised while setting up watch mode. All fatal.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The platform watcher could not be initialized.
    #[error("failed to initialize filesystem watcher: {0}")]
    Init(notify::Error),
    /// The subscription on the target directory could not be established.
    #[error("cannot watch {path}: {source}")]
    Subscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Tuning knobs for the watch loop.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Quiet period a path must survive before it is considered stable.
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(800),
        }
    }
}

/// Handle used to stop a running [`WatchLoop`] from another thread.
///
/// Dropping the last handle also stops the loop.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Sender<()>,
}

impl ShutdownHandle {
    /// Asks the loop to shut down. Safe to call at any time, from any thread.
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }
}

/// The watch-driven reconciliation loop.
///
/// Holds the notify subscription for its whole lifetime; the subscription is
/// released when the loop returns, on every exit path.
pub struct WatchLoop {
    organizer: Organizer,
    debounce: Duration,
    watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    shutdown: Receiver<()>,
    /// Paths seen but not yet stable, keyed to their settle deadline.
    pending: HashMap<PathBuf, Instant>,
    summary: RunSummary,
}

impl WatchLoop {
    /// Subscribes to the target directory and prepares the loop.
    ///
    /// Recursive according to the configuration. On failure the partially
    /// built watcher is dropped, so no subscription leaks.
    pub fn new(
        config: OrganizeConfig,
        options: WatchOptions,
    ) -> Result<(Self, ShutdownHandle), WatchError> {
        let organizer = Organizer::new(config)?;

        let (event_tx, event_rx) = unbounded();
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            let _ = event_tx.send(result);
        })
        .map_err(WatchError::Init)?;

        let target = organizer.config().target_folder.clone();
        let mode = if organizer.config().recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&target, mode).map_err(|e| WatchError::Subscribe {
            path: target.clone(),
            source: e,
        })?;

        let (shutdown_tx, shutdown_rx) = bounded(1);
        let watch_loop = Self {
            organizer,
            debounce: options.debounce,
            watcher,
            events: event_rx,
            shutdown: shutdown_rx,
            pending: HashMap::new(),
            summary: RunSummary::new(),
        };
        Ok((watch_loop, ShutdownHandle { tx: shutdown_tx }))
    }

    /// Runs until the shutdown handle fires, then returns the cumulative
    /// summary for the session.
    ///
    /// Shutdown gives in-flight debounced paths one last window to settle;
    /// anything still unstable after that is dropped with a logged warning.
    pub fn run(mut self) -> RunSummary {
        info!(
            target = %self.organizer.config().target_folder.display(),
            "watch mode started"
        );

        loop {
            let timeout = self.poll_timeout();
            match self.events.recv_timeout(timeout) {
                Ok(Ok(event)) => self.note_event(event),
                Ok(Err(e)) => warn!(error = %e, "watch notification error"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            match self.shutdown.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }
            self.process_settled();
        }

        self.drain_pending();
        let target = self.organizer.config().target_folder.clone();
        if let Err(e) = self.watcher.unwatch(&target) {
            debug!(error = %e, "unwatch on shutdown failed");
        }

        self.summary.completed = true;
        info!(
            files_scanned = self.summary.files_scanned,
            files_moved = self.summary.files_moved,
            errors = self.summary.errors.len(),
            "watch mode stopped"
        );
        self.summary
    }

    /// Time until the earliest pending deadline, or the idle tick.
    fn poll_timeout(&self) -> Duration {
        let now = Instant::now();
        self.pending
            .values()
            .map(|deadline| deadline.saturating_duration_since(now))
            .min()
            .unwrap_or(IDLE_TICK)
    }

    /// Folds a notification into the pending set.
    fn note_event(&mut self, event: Event) {
        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => {
                let deadline = Instant::now() + self.debounce;
                for path in event.paths {
                    if self.organizer.is_own_output(&path) {
                        continue;
                    }
                    debug!(path = %path.display(), "change noted, debouncing");
                    self.pending.insert(path, deadline);
                }
            }
            EventKind::Remove(_) => {
                for path in event.paths {
                    self.pending.remove(&path);
                }
            }
            _ => {}
        }
    }

    /// Processes every pending path whose quiet period has elapsed.
    fn process_settled(&mut self) {
        let now = Instant::now();
        let due: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(path, _)| path.clone())
            .collect();

        for path in due {
            self.pending.remove(&path);
            if !path.is_file() {
                // Directory event, or the file is already gone.
                continue;
            }
            self.summary.files_scanned += 1;
            match self.organizer.organize_file(&path, &mut self.summary) {
                Ok(destination) => {
                    debug!(
                        path = %path.display(),
                        destination = %destination.display(),
                        "settled file organized"
                    );
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to organize file");
                    self.summary.record_error(&path, e.to_string());
                }
            }
        }
    }

    /// Lets in-flight debounced paths settle before shutdown, dropping the
    /// rest with a warning.
    fn drain_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let grace_deadline = Instant::now() + self.debounce + Duration::from_millis(100);
        while !self.pending.is_empty() && Instant::now() < grace_deadline {
            std::thread::sleep(Duration::from_millis(50));
            self.process_settled();
        }
        for (path, _) in self.pending.drain() {
            warn!(path = %path.display(), "dropping unsettled file at shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn watch_config(temp_dir: &TempDir) -> OrganizeConfig {
        OrganizeConfig {
            target_folder: temp_dir.path().to_path_buf(),
            delete_empty: false,
            ..Default::default()
        }
    }

    fn short_debounce() -> WatchOptions {
        WatchOptions {
            debounce: Duration::from_millis(100),
        }
    }

    #[test]
    fn test_setup_fails_for_missing_target() {
        let config = OrganizeConfig {
            target_folder: PathBuf::from("/nonexistent/watched"),
            ..Default::default()
        };
        let result = WatchLoop::new(config, WatchOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_shutdown_before_any_event() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let (watch_loop, handle) =
            WatchLoop::new(watch_config(&temp_dir), short_debounce()).expect("Setup failed");

        let thread = std::thread::spawn(move || watch_loop.run());
        handle.shutdown();
        let summary = thread.join().expect("Watch thread panicked");

        assert!(summary.completed);
        assert_eq!(summary.files_moved, 0);
    }

    #[test]
    fn test_new_file_is_organized_exactly_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let (watch_loop, handle) =
            WatchLoop::new(watch_config(&temp_dir), short_debounce()).expect("Setup failed");
        let thread = std::thread::spawn(move || watch_loop.run());

        // Simulate a file written in two bursts
        let source = temp_dir.path().join("photo.jpg");
        fs::write(&source, "partial").unwrap();
        std::thread::sleep(Duration::from_millis(30));
        fs::write(&source, "partial-then-complete").unwrap();

        // Allow the debounce window to elapse and the move to happen
        std::thread::sleep(Duration::from_millis(1500));
        handle.shutdown();
        let summary = thread.join().expect("Watch thread panicked");

        assert_eq!(summary.files_moved, 1);
        assert!(!source.exists());

        // Destination is Images/{year}/{month}/photo.jpg under the default mode
        let images = temp_dir.path().join("Images");
        let moved: Vec<_> = walk_files(&images);
        assert_eq!(moved.len(), 1);
        assert!(moved[0].ends_with("photo.jpg"));
    }

    #[test]
    fn test_own_output_events_are_ignored() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = OrganizeConfig {
            recursive: true,
            ..watch_config(&temp_dir)
        };
        let (watch_loop, handle) =
            WatchLoop::new(config, short_debounce()).expect("Setup failed");
        let thread = std::thread::spawn(move || watch_loop.run());

        let source = temp_dir.path().join("photo.jpg");
        fs::write(&source, "img").unwrap();

        // The move into Images/ emits events of its own; with a recursive
        // watch those must not be picked up again.
        std::thread::sleep(Duration::from_millis(1500));
        handle.shutdown();
        let summary = thread.join().expect("Watch thread panicked");

        assert_eq!(summary.files_moved, 1);
        assert!(!summary.has_errors());
    }

    fn walk_files(dir: &std::path::Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    files.extend(walk_files(&path));
                } else {
                    files.push(path);
                }
            }
        }
        files
    }
}
