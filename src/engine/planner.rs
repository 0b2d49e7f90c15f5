use super::{category_dir, Mode, SourceSpec};
use crate::paths::{collect_matching_excluding, is_within};
use crate::taxonomy::find_category;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One planned file-to-category relocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub source: PathBuf,
    /// Category directory the file moves into
    pub destination: PathBuf,
    pub category: String,
}

impl WorkItem {
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// The full set of work for one run, computed before anything moves
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub items: Vec<WorkItem>,
    /// Log lines for sources that could not be scanned
    pub warnings: Vec<String>,
}

impl Plan {
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Enumerates every file of the selected categories under each source.
///
/// Files already under `destination_root` are never planned, and a file
/// is planned at most once. Missing sources become warnings; empty
/// source or category lists give an empty plan.
pub fn plan(
    sources: &[SourceSpec],
    categories: &[String],
    mode: Mode,
    destination_root: &Path,
    recurse: bool,
) -> Plan {
    let mut plan = Plan::default();
    if sources.is_empty() || categories.is_empty() {
        return plan;
    }

    let mut seen: HashSet<PathBuf> = HashSet::new();

    for source in sources {
        let root = match fs::canonicalize(&source.path) {
            Ok(root) if root.is_dir() => root,
            Ok(_) | Err(_) => {
                warn!(source = %source.path.display(), "source not found");
                plan.warnings
                    .push(format!("Source not found: {}", source.path.display()));
                continue;
            }
        };

        let origin_root = mode.origin_root(destination_root, &source.label);

        for name in categories {
            let Some(category) = find_category(name) else {
                debug!(category = %name, "unknown category");
                continue;
            };

            let destination = category_dir(&origin_root, category.name);
            let files =
                collect_matching_excluding(&root, category.extensions, recurse, Some(destination_root));

            for file in files {
                if is_within(&file, destination_root) || !seen.insert(file.clone()) {
                    continue;
                }
                plan.items.push(WorkItem {
                    source: file,
                    destination: destination.clone(),
                    category: category.name.to_string(),
                });
            }
        }

        debug!(
            source = %root.display(),
            label = %source.label,
            planned = plan.items.len(),
            "source scanned"
        );
    }

    plan
}
