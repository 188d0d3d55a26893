//! Workspace reset before a run.
//!
//! Removes the scratch checkout and output directories left over from a
//! previous run. Removal is best effort: a directory that is already gone, or
//! one that cannot be removed, is logged and the remaining directories are
//! still processed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

/// What happened to one directory during cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    Removed(PathBuf),
    Absent(PathBuf),
    Failed { path: PathBuf, message: String },
}

/// Remove each of `dirs` (relative to `root`) recursively.
pub fn clean(root: &Path, dirs: &[&Path]) -> Vec<CleanOutcome> {
    dirs.iter()
        .map(|dir| {
            let path = root.join(dir);
            match fs::remove_dir_all(&path) {
                Ok(()) => {
                    info!("Removed {}", path.display());
                    CleanOutcome::Removed(path)
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!("Nothing to remove at {}: {}", path.display(), e);
                    CleanOutcome::Absent(path)
                }
                Err(e) => {
                    warn!("Could not remove {}: {}", path.display(), e);
                    CleanOutcome::Failed {
                        path,
                        message: e.to_string(),
                    }
                }
            }
        })
        .collect()
}
