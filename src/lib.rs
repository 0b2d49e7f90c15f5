//! Fsort - a concurrent file organizer library
//!
//! This crate classifies files by extension, moves them into per-category
//! folders on a small worker pool and keeps an append-only run log.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod paths;
pub mod relocator;
pub mod taxonomy;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use engine::{
    organize, Mode, NoProgress, Organizer, Plan, ProgressEvent, ProgressSink, RunConfig, RunLog,
    RunResult, SourceSpec, WorkItem,
};
pub use error::{FsortError, RelocationError, Result};
pub use paths::{collect_matching, unique_path};
pub use relocator::relocate;
pub use taxonomy::{all_categories, category_extensions, Category};
