//! Concurrent classification-and-relocation engine
//!
//! A run goes through planning, moving and sweeping, then appends its
//! event log to `<destination>/log.txt`:
//!
//! 1. [`planner`] enumerates every matching file once and fixes the total.
//! 2. [`mover`] relocates the planned files on a bounded worker pool.
//! 3. [`sweeper`] moves leftover subfolders into a `Folders` bucket, one at a time.
//! 4. [`report`] persists the run block.
//!
//! Per-file and per-folder failures are logged and never abort the run;
//! only a destination that cannot be created does.

pub mod mover;
pub mod planner;
pub mod report;
pub mod sweeper;

use crate::error::{FsortError, Result};
use crate::paths::sanitize_component;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use mover::MoveSummary;
pub use planner::{Plan, WorkItem};
pub use report::RunLog;

/// Default width of the worker pool
pub const DEFAULT_WORKERS: usize = 4;

/// Name of the bucket that receives leftover subfolders
pub const FOLDERS_BUCKET: &str = "Folders";

/// Name of the append-only run log inside the destination root
pub const LOG_FILE_NAME: &str = "log.txt";

/// How relocated files are laid out under the destination root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Every source merges into one `<category>/` tree
    #[default]
    Simple,
    /// Each source gets its own `<label>/<category>/` subtree
    ByOrigin,
}

impl Mode {
    /// Root under which a source's category folders and `Folders` bucket live
    pub fn origin_root(&self, destination_root: &Path, source_label: &str) -> PathBuf {
        match self {
            Mode::Simple => destination_root.to_path_buf(),
            Mode::ByOrigin => destination_root.join(sanitize_label(source_label)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Simple => "simple",
            Mode::ByOrigin => "by-origin",
        }
    }
}

// A label always names exactly one folder below the destination root.
fn sanitize_label(label: &str) -> String {
    let label: String = label
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return "_".to_string();
    }
    if trimmed == "." || trimmed == ".." {
        return trimmed.replace('.', "_");
    }
    label
}

/// Directory for a category below an origin root
pub fn category_dir(origin_root: &Path, category: &str) -> PathBuf {
    origin_root.join(sanitize_component(category))
}

/// A labelled source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub label: String,
    pub path: PathBuf,
}

impl SourceSpec {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Everything a run needs besides its sources
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub destination_base: PathBuf,
    pub destination_name: String,
    pub mode: Mode,
    pub recurse: bool,
    pub categories: Vec<String>,
}

impl RunConfig {
    /// `<destination_base>/<destination_name>`
    pub fn destination_root(&self) -> PathBuf {
        self.destination_base.join(&self.destination_name)
    }

    /// Rejects destination names that are empty or would escape the base
    pub fn validate(&self) -> Result<()> {
        let name = self.destination_name.trim();
        if name.is_empty() {
            return Err(FsortError::InvalidDestination(
                "destination folder name is empty".to_string(),
            ));
        }
        if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(FsortError::InvalidDestination(format!(
                "'{}' is not a single folder name",
                self.destination_name
            )));
        }
        Ok(())
    }
}

/// Progress notification delivered after every state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub processed: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(processed: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            processed,
            total,
            message: message.into(),
        }
    }

    /// Completion ratio in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Receives progress events.
///
/// Events come from a single coordinator, so a sink is never called
/// concurrently; closures taking `&ProgressEvent` work directly.
pub trait ProgressSink {
    fn report(&mut self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressEvent),
{
    fn report(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _event: &ProgressEvent) {}
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Event lines in completion order
    pub log_lines: Vec<String>,
    pub moved_count: usize,
    pub log_file: PathBuf,
}

impl RunResult {
    /// Log lines about files or folders that were not organized
    pub fn problems(&self) -> impl Iterator<Item = &str> {
        const PREFIXES: [&str; 3] = ["Failed", "Skipped", "Source not found"];
        self.log_lines
            .iter()
            .map(String::as_str)
            .filter(|line| PREFIXES.iter().any(|p| line.starts_with(*p)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Planning,
    Counting,
    Moving,
    Sweeping,
    Reporting,
    Done,
    Failed,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Planning => "planning",
            RunPhase::Counting => "counting",
            RunPhase::Moving => "moving",
            RunPhase::Sweeping => "sweeping",
            RunPhase::Reporting => "reporting",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        }
    }
}

/// Runs organize jobs for a fixed set of sources and a [`RunConfig`]
#[derive(Debug, Clone)]
pub struct Organizer {
    sources: Vec<SourceSpec>,
    config: RunConfig,
    workers: usize,
}

impl Organizer {
    pub fn new(sources: Vec<SourceSpec>, config: RunConfig) -> Self {
        Self {
            sources,
            config,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Sets the worker pool width (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Computes the plan without touching the filesystem
    pub fn plan(&self) -> Result<Plan> {
        self.config.validate()?;
        let destination_root = absolute_destination(&self.config.destination_root());
        Ok(self.plan_into(&destination_root))
    }

    fn plan_into(&self, destination_root: &Path) -> Plan {
        planner::plan(
            &self.sources,
            &self.config.categories,
            self.config.mode,
            destination_root,
            self.config.recurse,
        )
    }

    /// Executes a full run, reporting progress to `progress`.
    ///
    /// Must not be called from inside an async runtime; the worker pool
    /// gets its own.
    pub fn run<P>(&self, progress: &mut P) -> Result<RunResult>
    where
        P: ProgressSink + ?Sized,
    {
        let started = Local::now();
        self.config.validate()?;

        let destination_root = self.config.destination_root();
        if let Err(source) = fs::create_dir_all(&destination_root) {
            enter(RunPhase::Failed);
            return Err(FsortError::Setup {
                path: destination_root,
                source,
            });
        }
        let destination_root = absolute_destination(&destination_root);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.workers)
            .thread_name("fsort-worker")
            .build()
            .map_err(|e| {
                enter(RunPhase::Failed);
                FsortError::Runtime(e)
            })?;

        enter(RunPhase::Planning);
        let plan = self.plan_into(&destination_root);
        let mut log = RunLog::new();
        log.extend(plan.warnings.iter().cloned());

        enter(RunPhase::Counting);
        let total = plan.total();
        info!(total, mode = self.config.mode.as_str(), "plan ready");
        progress.report(&ProgressEvent::new(
            0,
            total,
            format!("Total: {} files to organize", total),
        ));

        enter(RunPhase::Moving);
        let summary = runtime.block_on(mover::move_all(
            plan.items,
            &destination_root,
            self.workers,
            &mut log,
            &mut *progress,
        ));
        drop(runtime);

        enter(RunPhase::Sweeping);
        let folders = sweeper::sweep(&self.sources, self.config.mode, &destination_root, &mut log);

        progress.report(&ProgressEvent::new(
            summary.processed,
            total,
            format!("Done! {} files organized", summary.moved),
        ));

        enter(RunPhase::Reporting);
        let log_file = log.persist(&destination_root, summary.moved, started)?;

        info!(
            moved = summary.moved,
            skipped = summary.skipped,
            failed = summary.failed,
            folders,
            log = %log_file.display(),
            "run complete"
        );
        enter(RunPhase::Done);

        Ok(RunResult {
            log_lines: log.into_lines(),
            moved_count: summary.moved,
            log_file,
        })
    }
}

fn enter(phase: RunPhase) {
    debug!(phase = phase.as_str(), "entering phase");
}

fn absolute_destination(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// One-call entry point: plan, move, sweep and persist the run log.
///
/// Returns the event lines, the number of moved files and the path of the
/// log file.
pub fn organize<P>(
    sources: &[SourceSpec],
    categories: &[String],
    mode: Mode,
    destination_base: &Path,
    destination_name: &str,
    recurse: bool,
    progress: &mut P,
) -> Result<RunResult>
where
    P: ProgressSink + ?Sized,
{
    let config = RunConfig {
        destination_base: destination_base.to_path_buf(),
        destination_name: destination_name.to_string(),
        mode,
        recurse,
        categories: categories.to_vec(),
    };
    Organizer::new(sources.to_vec(), config).run(progress)
}
