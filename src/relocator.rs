//! Moves single files and folders without ever overwriting an existing entry

use crate::error::RelocationError;
use crate::paths::unique_path;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[cfg(windows)]
const CROSS_DEVICE_ERROR: i32 = 17; // ERROR_NOT_SAME_DEVICE
#[cfg(not(windows))]
const CROSS_DEVICE_ERROR: i32 = 18; // EXDEV

/// Moves `file` into `destination_dir`, renaming on collision.
///
/// Returns `Ok(None)` when the file already sits at its destination, and
/// `Ok(Some(new_path))` once it has been moved.
pub fn relocate(file: &Path, destination_dir: &Path) -> Result<Option<PathBuf>, RelocationError> {
    fs::create_dir_all(destination_dir).map_err(|e| RelocationError::new(file, e))?;

    let file_name = file.file_name().ok_or_else(|| {
        RelocationError::new(
            file,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;

    let candidate = destination_dir.join(file_name);
    if same_location(file, &candidate) {
        debug!(file = %file.display(), "already in place");
        return Ok(None);
    }

    let target = unique_path(&candidate);
    move_path(file, &target).map_err(|e| RelocationError::new(file, e))?;
    Ok(Some(target))
}

fn same_location(a: &Path, b: &Path) -> bool {
    resolve_parent(a) == resolve_parent(b)
}

// Canonicalizes the parent only, so a symlink is compared by where it
// lives rather than where it points.
fn resolve_parent(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|dir| dir.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// One lock per destination directory.
///
/// Holding a directory's lock across name resolution and the rename keeps
/// two workers from picking the same free name.
#[derive(Debug, Default)]
pub struct DestinationLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl DestinationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, dir: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(dir.to_path_buf()).or_default())
    }

    /// [`relocate`] while holding the lock of `destination_dir`
    pub fn relocate(
        &self,
        file: &Path,
        destination_dir: &Path,
    ) -> Result<Option<PathBuf>, RelocationError> {
        let lock = self.lock_for(destination_dir);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        relocate(file, destination_dir)
    }
}

/// Renames `src` to `dst`, copying then deleting when they sit on
/// different volumes. The source is removed only after a complete copy.
pub fn move_path(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(CROSS_DEVICE_ERROR) => {
            warn!(
                src = %src.display(),
                dst = %dst.display(),
                "rename crosses devices, falling back to copy"
            );
            copy_then_remove(src, dst)
        }
        Err(e) => Err(e),
    }
}

fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(src)?;

    if metadata.is_dir() {
        if let Err(e) = copy_dir_all(src, dst) {
            fs::remove_dir_all(dst).ok();
            return Err(e);
        }
        fs::remove_dir_all(src)
    } else {
        if let Err(e) = fs::copy(src, dst) {
            fs::remove_file(dst).ok();
            return Err(e);
        }
        fs::remove_file(src)
    }
}

fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
