use super::LOG_FILE_NAME;
use crate::error::{FsortError, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Ordered event lines of one run
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.lines.extend(lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Renders the block appended to the log file for this run
    pub fn render_block(&self, moved: usize, started: DateTime<Local>) -> String {
        let mut block = format!(
            "\n\n===== Run: {} =====\n",
            started.format("%Y-%m-%d %H:%M:%S")
        );
        for line in &self.lines {
            block.push_str(line);
            block.push('\n');
        }
        block.push_str(&format!("Moved files: {}\n", moved));
        block
    }

    /// Appends this run's block to `<destination_root>/log.txt`, creating
    /// the file if needed. Earlier runs are never truncated.
    pub fn persist(
        &self,
        destination_root: &Path,
        moved: usize,
        started: DateTime<Local>,
    ) -> Result<PathBuf> {
        let path = destination_root.join(LOG_FILE_NAME);
        let report_error = |source: std::io::Error| FsortError::Report {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(report_error)?;
        file.write_all(self.render_block(moved, started).as_bytes())
            .map_err(report_error)?;
        file.flush().map_err(report_error)?;

        Ok(path)
    }
}
