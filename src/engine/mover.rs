// Bounded worker pool that executes a plan and reports every completion
use super::planner::WorkItem;
use super::report::RunLog;
use super::{ProgressEvent, ProgressSink};
use crate::error::RelocationError;
use crate::paths::is_within;
use crate::relocator::DestinationLocks;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, warn};

/// Maximum number of file-name characters shown in a status line
const STATUS_NAME_LIMIT: usize = 50;

/// Aggregate counts for the moving phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveSummary {
    pub processed: usize,
    pub moved: usize,
    /// Already in place or inside the destination root
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug)]
enum Outcome {
    Moved(PathBuf),
    InPlace,
    Skipped,
    Failed(RelocationError),
}

#[derive(Debug)]
struct Completion {
    source: PathBuf,
    file_name: String,
    category: String,
    outcome: Outcome,
}

impl Completion {
    fn log_line(&self) -> String {
        match &self.outcome {
            Outcome::Moved(_) => format!("{} → {}", self.file_name, self.category),
            Outcome::InPlace => format!("Already in place: {}", self.source.display()),
            Outcome::Skipped => format!("Skipped: {}", self.source.display()),
            Outcome::Failed(e) => format!("Failed: {}", e),
        }
    }
}

/// Relocates every item using `workers` concurrent workers.
///
/// Log lines are appended to `log` and `progress` is called once per
/// completed item, in completion order, with `processed` rising by one
/// each time. Returns after every worker has drained.
pub async fn move_all<P>(
    items: Vec<WorkItem>,
    destination_root: &Path,
    workers: usize,
    log: &mut RunLog,
    progress: &mut P,
) -> MoveSummary
where
    P: ProgressSink + ?Sized,
{
    let total = items.len();
    let workers = workers.max(1).min(total.max(1));
    let queue = Arc::new(Mutex::new(VecDeque::from(items)));
    let locks = Arc::new(DestinationLocks::new());
    let (completion_tx, mut completion_rx) = mpsc::channel::<Completion>(workers * 2);

    let mut handles = Vec::with_capacity(workers);
    for id in 0..workers {
        let queue = Arc::clone(&queue);
        let locks = Arc::clone(&locks);
        let destination_root = destination_root.to_path_buf();
        let completion_tx = completion_tx.clone();
        handles.push(tokio::spawn(async move {
            worker(id, queue, locks, destination_root, completion_tx).await;
        }));
    }
    drop(completion_tx);

    let mut summary = MoveSummary::default();
    while let Some(completion) = completion_rx.recv().await {
        summary.processed += 1;
        match &completion.outcome {
            Outcome::Moved(target) => {
                summary.moved += 1;
                debug!(file = %completion.source.display(), to = %target.display(), "moved");
            }
            Outcome::InPlace | Outcome::Skipped => summary.skipped += 1,
            Outcome::Failed(e) => {
                summary.failed += 1;
                warn!(file = %e.path.display(), error = %e.source, "relocation failed");
            }
        }
        log.push(completion.log_line());

        progress.report(&ProgressEvent::new(
            summary.processed,
            total,
            status_message(summary.processed, total, &completion.file_name),
        ));
    }

    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "worker task failed");
        }
    }

    summary
}

async fn worker(
    id: usize,
    queue: Arc<Mutex<VecDeque<WorkItem>>>,
    locks: Arc<DestinationLocks>,
    destination_root: PathBuf,
    completion_tx: mpsc::Sender<Completion>,
) {
    loop {
        let item = {
            let mut queue = queue.lock().await;
            queue.pop_front()
        };
        let Some(item) = item else {
            break;
        };

        let source = item.source.clone();
        let file_name = item.file_name();
        let category = item.category.clone();

        let locks = Arc::clone(&locks);
        let root = destination_root.clone();
        let outcome =
            match tokio::task::spawn_blocking(move || process_item(&item, &root, &locks)).await {
                Ok(outcome) => outcome,
                Err(e) => Outcome::Failed(RelocationError::new(
                    &source,
                    io::Error::other(format!("relocation task panicked: {}", e)),
                )),
            };

        let completion = Completion {
            source,
            file_name,
            category,
            outcome,
        };
        if completion_tx.send(completion).await.is_err() {
            break;
        }
    }
    debug!(worker = id, "worker drained");
}

fn process_item(item: &WorkItem, destination_root: &Path, locks: &DestinationLocks) -> Outcome {
    if is_within(&item.source, destination_root) {
        return Outcome::Skipped;
    }
    match locks.relocate(&item.source, &item.destination) {
        Ok(Some(target)) => Outcome::Moved(target),
        Ok(None) => Outcome::InPlace,
        Err(e) => Outcome::Failed(e),
    }
}

fn status_message(processed: usize, total: usize, file_name: &str) -> String {
    let mut shown: String = file_name.chars().take(STATUS_NAME_LIMIT).collect();
    if file_name.chars().count() > STATUS_NAME_LIMIT {
        shown.push('…');
    }
    format!("[{}/{}] {}", processed, total, shown)
}
