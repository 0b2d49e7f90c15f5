use super::report::RunLog;
use super::{Mode, SourceSpec, FOLDERS_BUCKET};
use crate::paths::{is_within, unique_path};
use crate::relocator::move_path;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Moves the direct subfolders of every source into its `Folders` bucket.
///
/// Runs strictly one folder at a time. Folders inside the destination
/// root are left alone, as are folders that contain it. Returns the
/// number of folders moved.
pub fn sweep(
    sources: &[SourceSpec],
    mode: Mode,
    destination_root: &Path,
    log: &mut RunLog,
) -> usize {
    let mut moved = 0;

    for source in sources {
        let Ok(root) = fs::canonicalize(&source.path) else {
            continue;
        };
        let bucket = mode
            .origin_root(destination_root, &source.label)
            .join(FOLDERS_BUCKET);

        let mut children: Vec<(PathBuf, OsString)> = match fs::read_dir(&root) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(is_folder)
                .map(|entry| (entry.path(), entry.file_name()))
                .collect(),
            Err(e) => {
                warn!(source = %root.display(), error = %e, "failed to list source");
                log.push(format!("Failed to list {}: {}", root.display(), e));
                continue;
            }
        };
        children.sort();

        for (child, file_name) in children {
            let name = file_name.to_string_lossy();
            if is_within(&child, destination_root) {
                continue;
            }
            if is_within(destination_root, &child) {
                debug!(folder = %child.display(), "folder holds the destination");
                log.push(format!("Skipped folder {}: contains the destination", name));
                continue;
            }

            if let Err(e) = fs::create_dir_all(&bucket) {
                log.push(format!("Failed: folder {}: {}", name, e));
                continue;
            }

            let target = unique_path(&bucket.join(&file_name));
            match move_path(&child, &target) {
                Ok(()) => {
                    moved += 1;
                    log.push(format!("{} → {}", name, FOLDERS_BUCKET));
                }
                Err(e) => {
                    warn!(folder = %child.display(), error = %e, "folder move failed");
                    log.push(format!("Failed: folder {}: {}", name, e));
                }
            }
        }
    }

    moved
}

// Symlinks to folders count as folders; the link itself is moved.
fn is_folder(entry: &fs::DirEntry) -> bool {
    match entry.file_type() {
        Ok(t) if t.is_dir() => true,
        Ok(t) if t.is_symlink() => entry.path().is_dir(),
        _ => false,
    }
}
