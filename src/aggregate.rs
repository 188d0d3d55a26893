//! Copy a branch's generated site into the shared output tree.
//!
//! The copy is a one-way overlay: directories are merged into whatever the
//! target already holds, files replace same-named target files, and target
//! files missing from the source are left alone. An existing target file is
//! removed before copying, so the copy never inherits the old file's inode or
//! permissions. Symlinks in the source are followed and their targets copied.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Summary of one overlay copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
}

/// Recursively copy the contents of `source` into `target`.
pub fn copy_overlay(source: &Path, target: &Path) -> Result<CopyStats> {
    if !source.is_dir() {
        return Err(Error::Filesystem {
            message: format!("Source '{}' is not a directory", source.display()),
        });
    }

    fs::create_dir_all(target).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", target.display(), e),
    })?;

    let mut stats = CopyStats::default();

    for entry in WalkDir::new(source)
        .follow_links(true)
        .min_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to walk '{}': {}", source.display(), e),
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::Filesystem {
                message: format!("Unexpected path '{}': {}", entry.path().display(), e),
            })?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", dest.display(), e),
            })?;
            stats.dirs += 1;
            continue;
        }

        if dest.is_dir() {
            fs::remove_dir_all(&dest)?;
        } else if dest.symlink_metadata().is_ok() {
            fs::remove_file(&dest).map_err(|e| Error::Filesystem {
                message: format!("Failed to replace '{}': {}", dest.display(), e),
            })?;
        }

        fs::copy(entry.path(), &dest).map_err(|e| Error::Filesystem {
            message: format!(
                "Failed to copy '{}' to '{}': {}",
                entry.path().display(),
                dest.display(),
                e
            ),
        })?;
        stats.files += 1;
    }

    Ok(stats)
}
