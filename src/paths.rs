//! Path helpers: collision-free naming and extension-filtered file collection

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Returns `candidate` if nothing exists there, otherwise the first free
/// `"<stem> (N)<ext>"` sibling for N = 1, 2, 3, ...
pub fn unique_path(candidate: &Path) -> PathBuf {
    if !exists(candidate) {
        return candidate.to_path_buf();
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
    let stem = candidate
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    let extension = candidate.extension();

    let mut n: u64 = 1;
    loop {
        let mut name = OsString::from(&stem);
        name.push(format!(" ({})", n));
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }
        let attempt = parent.join(name);
        if !exists(&attempt) {
            return attempt;
        }
        n += 1;
    }
}

// Broken symlinks still occupy the name.
fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Collects regular files under `root` whose lower-cased extension is in
/// `extensions`.
///
/// Lists direct children only unless `recursive` is set. A missing or
/// unreadable root yields an empty list.
pub fn collect_matching(root: &Path, extensions: &[&str], recursive: bool) -> Vec<PathBuf> {
    collect_matching_excluding(root, extensions, recursive, None)
}

/// Like [`collect_matching`], but never descends into `excluded`.
pub fn collect_matching_excluding(
    root: &Path,
    extensions: &[&str],
    recursive: bool,
    excluded: Option<&Path>,
) -> Vec<PathBuf> {
    if extensions.is_empty() {
        return Vec::new();
    }

    let walker = WalkDir::new(root).min_depth(1);
    let walker = if recursive {
        walker
    } else {
        walker.max_depth(1)
    };

    walker
        .into_iter()
        .filter_entry(|entry| excluded.map_or(true, |ex| !entry.path().starts_with(ex)))
        .filter_map(Result::ok)
        .filter(is_file_entry)
        .filter(|entry| has_extension_in(entry.path(), extensions))
        .map(|entry| entry.into_path())
        .collect()
}

// Symlinks to files are collected; symlinked folders are not descended.
fn is_file_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn has_extension_in(path: &Path, extensions: &[&str]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let dotted = format!(".{}", ext.to_lowercase());
            extensions.iter().any(|e| *e == dotted)
        }
        None => false,
    }
}

/// Whether `path` is `root` itself or lives somewhere beneath it
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Makes a label or category name safe to use as a single path component
pub fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ' ' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    mod unique_path_tests {
        use super::*;

        #[test]
        fn test_unique_path_free_candidate_unchanged() {
            let temp_dir = TempDir::new().unwrap();
            let candidate = temp_dir.path().join("report.pdf");
            assert_eq!(unique_path(&candidate), candidate);
        }

        #[test]
        fn test_unique_path_first_collision() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("report.pdf"), b"a").unwrap();

            let resolved = unique_path(&temp_dir.path().join("report.pdf"));
            assert_eq!(resolved, temp_dir.path().join("report (1).pdf"));
        }

        #[test]
        fn test_unique_path_skips_taken_counters() {
            let temp_dir = TempDir::new().unwrap();
            for name in ["f.txt", "f (1).txt", "f (2).txt"] {
                fs::write(temp_dir.path().join(name), b"x").unwrap();
            }

            let resolved = unique_path(&temp_dir.path().join("f.txt"));
            assert_eq!(resolved, temp_dir.path().join("f (3).txt"));
        }

        #[test]
        fn test_unique_path_without_extension() {
            let temp_dir = TempDir::new().unwrap();
            fs::create_dir(temp_dir.path().join("Projects")).unwrap();

            let resolved = unique_path(&temp_dir.path().join("Projects"));
            assert_eq!(resolved, temp_dir.path().join("Projects (1)"));
        }

        #[test]
        fn test_unique_path_counter_goes_before_last_extension() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("backup.tar.gz"), b"x").unwrap();

            let resolved = unique_path(&temp_dir.path().join("backup.tar.gz"));
            assert_eq!(resolved, temp_dir.path().join("backup.tar (1).gz"));
        }
    }

    mod collect_tests {
        use super::*;

        fn setup_tree() -> TempDir {
            let temp_dir = TempDir::new().unwrap();
            let root = temp_dir.path();
            fs::write(root.join("a.pdf"), b"a").unwrap();
            fs::write(root.join("B.PDF"), b"b").unwrap();
            fs::write(root.join("c.txt"), b"c").unwrap();
            fs::create_dir_all(root.join("nested/deeper")).unwrap();
            fs::write(root.join("nested/d.pdf"), b"d").unwrap();
            fs::write(root.join("nested/deeper/e.pdf"), b"e").unwrap();
            temp_dir
        }

        fn names(paths: &[PathBuf]) -> Vec<String> {
            let mut names: Vec<String> = paths
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }

        #[test]
        fn test_collect_direct_children_only() {
            let temp_dir = setup_tree();
            let found = collect_matching(temp_dir.path(), &[".pdf"], false);
            assert_eq!(names(&found), vec!["B.PDF", "a.pdf"]);
        }

        #[test]
        fn test_collect_recursive() {
            let temp_dir = setup_tree();
            let found = collect_matching(temp_dir.path(), &[".pdf"], true);
            assert_eq!(names(&found), vec!["B.PDF", "a.pdf", "d.pdf", "e.pdf"]);
        }

        #[test]
        fn test_collect_ignores_directories_with_matching_names() {
            let temp_dir = TempDir::new().unwrap();
            fs::create_dir(temp_dir.path().join("folder.pdf")).unwrap();
            let found = collect_matching(temp_dir.path(), &[".pdf"], false);
            assert!(found.is_empty());
        }

        #[test]
        fn test_collect_missing_root_is_empty() {
            let found = collect_matching(Path::new("/nonexistent/path/12345"), &[".pdf"], true);
            assert!(found.is_empty());
        }

        #[test]
        fn test_collect_empty_extension_set() {
            let temp_dir = setup_tree();
            assert!(collect_matching(temp_dir.path(), &[], true).is_empty());
        }

        #[cfg(unix)]
        #[test]
        fn test_collect_follows_file_symlinks_only() {
            let temp_dir = setup_tree();
            let root = temp_dir.path();
            std::os::unix::fs::symlink(root.join("a.pdf"), root.join("link.pdf")).unwrap();
            std::os::unix::fs::symlink(root.join("nested"), root.join("dir.pdf")).unwrap();
            std::os::unix::fs::symlink(root.join("missing.pdf"), root.join("broken.pdf")).unwrap();

            let found = collect_matching(root, &[".pdf"], true);
            assert_eq!(names(&found), vec!["B.PDF", "a.pdf", "d.pdf", "e.pdf", "link.pdf"]);
        }

        #[test]
        fn test_collect_skips_excluded_subtree() {
            let temp_dir = setup_tree();
            let excluded = temp_dir.path().join("nested");
            let found =
                collect_matching_excluding(temp_dir.path(), &[".pdf"], true, Some(&excluded));
            assert_eq!(names(&found), vec!["B.PDF", "a.pdf"]);
        }
    }

    #[test]
    fn test_is_within() {
        assert!(is_within(Path::new("/a/b/c.txt"), Path::new("/a/b")));
        assert!(is_within(Path::new("/a/b"), Path::new("/a/b")));
        assert!(!is_within(Path::new("/a/bc/d.txt"), Path::new("/a/b")));
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("OpenOffice Calc"), "OpenOffice_Calc");
        assert_eq!(sanitize_component("Web/Code\\x"), "Web_Code_x");
        assert_eq!(sanitize_component("PDF"), "PDF");
    }
}
