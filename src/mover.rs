//! Safe single-file relocation.
//!
//! Moves one file into a planned destination directory: missing directory
//! levels are created first (each counted in the run summary), name
//! collisions are resolved with a numeric suffix, and the relocation itself
//! is a single rename. An existing file is never silently overwritten, and a
//! failed move leaves the source untouched.

use crate::report::RunSummary;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while relocating a single file.
///
/// These are recorded in the run summary, not propagated as fatal: the run
/// continues with the next file.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Failed to create the destination directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The rename itself failed (source unreadable, destination unwritable).
    #[error("failed to move {source_path} to {destination}: {source}")]
    Rename {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Could not read the source file's metadata.
    #[error("failed to read metadata of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The source path has no final name component.
    #[error("{path} has no file name component")]
    NoFileName { path: PathBuf },
}

/// Moves `source` into `dest_dir`, returning the final path of the file.
///
/// Creates `dest_dir` (all missing levels) if needed. If a file with the same
/// name already exists there, the moved file gets a ` (N)` suffix before the
/// extension, with `N` incremented until a free name is found. Moving a file
/// onto its current location is a no-op, not an error.
pub fn move_into(
    source: &Path,
    dest_dir: &Path,
    summary: &mut RunSummary,
) -> Result<PathBuf, MoveError> {
    let file_name = source.file_name().ok_or_else(|| MoveError::NoFileName {
        path: source.to_path_buf(),
    })?;

    let direct = dest_dir.join(file_name);
    if direct == source {
        // Already where it belongs.
        return Ok(direct);
    }

    ensure_dir(dest_dir, summary)?;

    let destination = if direct.exists() {
        free_name(dest_dir, source)?
    } else {
        direct
    };

    fs::rename(source, &destination).map_err(|e| MoveError::Rename {
        source_path: source.to_path_buf(),
        destination: destination.clone(),
        source: e,
    })?;

    summary.files_moved += 1;
    info!(
        source = %source.display(),
        destination = %destination.display(),
        "moved"
    );
    Ok(destination)
}

/// Ensures `dir` exists, counting each newly created level in the summary.
///
/// Losing a create race to a concurrent caller counts as success.
fn ensure_dir(dir: &Path, summary: &mut RunSummary) -> Result<(), MoveError> {
    let mut missing = 0;
    let mut cursor = dir;
    while !cursor.exists() {
        missing += 1;
        match cursor.parent() {
            Some(parent) => cursor = parent,
            None => break,
        }
    }
    if missing == 0 {
        return Ok(());
    }

    match fs::create_dir_all(dir) {
        Ok(()) => {
            summary.folders_created += missing;
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(MoveError::DirectoryCreation {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}

/// First free `name (N).ext` variant of `source`'s file name under `dest_dir`.
fn free_name(dest_dir: &Path, source: &Path) -> Result<PathBuf, MoveError> {
    let stem = source
        .file_stem()
        .ok_or_else(|| MoveError::NoFileName {
            path: source.to_path_buf(),
        })?
        .to_string_lossy();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 1;
    loop {
        let candidate = dest_dir.join(format!("{stem} ({n}){ext}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
        n += 1;
    }
}
