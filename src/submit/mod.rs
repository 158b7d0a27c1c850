//! Concurrent task-submission pipeline.
//!
//! Fans a stream of source URIs out to a bounded pool of workers that each
//! call the remote task-creation operation, and collects per-item failures
//! without aborting the batch:
//!
//! ```text
//! source reader -> submission channel -> worker pool -> error channel -> collector
//! ```
//!
//! The submission channel is bounded, so a large source file never loads
//! fully into memory; the reader blocks when workers fall behind. Failures
//! are isolated per item: a batch of N items with K failures makes exactly N
//! submission attempts and reports exactly the K failures. Failed items are
//! never retried.
//!
//! Shutdown ordering, enforced by [`submit_batch`]:
//! 1. workers and the collector start before any item is enqueued,
//! 2. the submission channel closes only once the reader has sent everything,
//! 3. the error channel closes only after every worker has exited,
//! 4. the collector is joined before the batch returns.

mod source;


pub use source::SubmitSource;

use crate::download_station::TaskCreator;
use crate::error::{Error, Result};
use crate::format::truncate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Worker count for file-based batches
const FILE_WORKERS: usize = 3;

/// Buffered capacity of the submission channel
const QUEUE_DEPTH: usize = 5;

/// One failed submission: the source string paired with its error.
#[derive(Debug)]
pub struct SubmissionFailure {
    /// The source URI or path that could not be added
    pub uri: String,
    /// What went wrong creating the task
    pub error: Error,
}

/// Outcome of one submission batch.
///
/// Per-item failures are streamed to stderr as they occur; this report exists
/// for the caller's exit status and for tests.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Total submission attempts made (successes plus failures)
    pub attempted: usize,
    /// Every failed item, in the order failures were collected
    pub failures: Vec<SubmissionFailure>,
    /// Error that stopped the source reader early, if any.
    ///
    /// Items enqueued before the error still run to completion; this is
    /// reported separately from per-item failures.
    pub read_error: Option<Error>,
}

impl BatchReport {
    /// Whether every attempted item was submitted successfully and the whole
    /// source was read.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.read_error.is_none()
    }
}

/// Tunables for one batch
#[derive(Clone, Copy, Debug)]
pub struct BatchOptions {
    /// Number of concurrent workers
    pub workers: usize,
    /// Submission channel capacity
    pub queue_depth: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: FILE_WORKERS,
            queue_depth: QUEUE_DEPTH,
        }
    }
}

impl BatchOptions {
    /// Options for a single-item submission: one worker is enough.
    pub fn single() -> Self {
        Self {
            workers: 1,
            ..Self::default()
        }
    }

    /// The conventional pool size for the given source kind.
    pub fn for_source(source: &SubmitSource) -> Self {
        match source {
            SubmitSource::File(_) => Self::default(),
            SubmitSource::Url(_) => Self::single(),
        }
    }
}

/// Run one submission batch to completion.
///
/// Spawns the collector and `options.workers` workers, drives the source
/// reader on the current task, then joins workers and collector in order.
/// Per-item failures never surface as `Err` here; the only error paths are
/// worker/collector join failures (a panicked task).
pub async fn submit_batch(
    creator: Arc<dyn TaskCreator>,
    source: SubmitSource,
    options: BatchOptions,
) -> Result<BatchReport> {
    let workers = options.workers.max(1);
    let (item_tx, item_rx) = async_channel::bounded::<String>(options.queue_depth.max(1));
    let (failure_tx, failure_rx) = mpsc::unbounded_channel::<SubmissionFailure>();

    // Consumers first: no item may be enqueued before someone can claim it.
    let collector = spawn_collector(failure_rx);
    let handles: Vec<JoinHandle<usize>> = (0..workers)
        .map(|_| {
            let creator = Arc::clone(&creator);
            let item_rx = item_rx.clone();
            let failure_tx = failure_tx.clone();
            tokio::spawn(run_worker(creator, item_rx, failure_tx))
        })
        .collect();
    drop(item_rx);

    // Drive the reader; dropping the sender afterwards is the sole
    // termination signal for the pool.
    let read_error = source.feed(&item_tx).await;
    drop(item_tx);

    // All workers must have exited before the error channel may close.
    let mut attempted = 0;
    for joined in futures::future::join_all(handles).await {
        attempted += joined?;
    }
    drop(failure_tx);

    let failures = collector.await?;

    Ok(BatchReport {
        attempted,
        failures,
        read_error,
    })
}

/// Worker loop: claim items until the submission channel is closed and
/// drained, one remote create call per item. Returns the number of attempts.
async fn run_worker(
    creator: Arc<dyn TaskCreator>,
    item_rx: async_channel::Receiver<String>,
    failure_tx: mpsc::UnboundedSender<SubmissionFailure>,
) -> usize {
    let mut attempted = 0;
    while let Ok(uri) = item_rx.recv().await {
        attempted += 1;
        println!("Adding {}", truncate(&uri, 70));
        if let Err(error) = creator.create_task(&uri).await {
            tracing::warn!(uri = %uri, error = %error, "task submission failed");
            // Send can only fail after the collector is gone, which the
            // shutdown ordering rules out while any worker is running.
            let _ = failure_tx.send(SubmissionFailure { uri, error });
        }
    }
    attempted
}

/// Collector loop: stream each failure to the user as it arrives, keep it
/// for the batch report. Exits when the error channel closes.
fn spawn_collector(
    mut failure_rx: mpsc::UnboundedReceiver<SubmissionFailure>,
) -> JoinHandle<Vec<SubmissionFailure>> {
    tokio::spawn(async move {
        let mut failures = Vec::new();
        while let Some(failure) = failure_rx.recv().await {
            eprintln!("Task {} not added: {}", failure.uri, failure.error);
            failures.push(failure);
        }
        failures
    })
}
