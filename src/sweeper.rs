//! Empty-directory cleanup after a batch of moves.

use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Removes directories left empty under `root`, bottom-up.
///
/// Children are evaluated before their parent, so a directory whose only
/// contents were empty subdirectories is itself removed. The root is never
/// deleted. Returns the number of directories removed; failures are logged
/// and skipped, never fatal.
pub fn sweep(root: &Path) -> usize {
    let mut deleted = 0;
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(directory = %root.display(), error = %e, "could not read directory for sweep");
            return 0;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            sweep_dir(&path, &mut deleted);
        }
    }
    deleted
}

fn sweep_dir(dir: &Path, deleted: &mut usize) {
    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    sweep_dir(&path, deleted);
                }
            }
        }
        Err(e) => {
            warn!(directory = %dir.display(), error = %e, "could not read directory for sweep");
            return;
        }
    }

    match is_empty(dir) {
        Ok(true) => match fs::remove_dir(dir) {
            Ok(()) => {
                *deleted += 1;
                info!(directory = %dir.display(), "deleted empty directory");
            }
            Err(e) => {
                warn!(directory = %dir.display(), error = %e, "could not delete empty directory");
            }
        },
        Ok(false) => {}
        Err(e) => {
            warn!(directory = %dir.display(), error = %e, "could not re-check directory for sweep");
        }
    }
}

fn is_empty(dir: &Path) -> std::io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}
