//! Bounded-concurrency batch pipeline.
//!
//! The scheduler fans records out across a capped pool of spawned
//! tasks. Each task runs one record through synthesize, normalize and
//! write as a sequential unit; a semaphore caps how many records are in
//! flight at once, and the permit travels into the task so it is
//! released whenever the task ends, success or failure.
//!
//! Failure handling is policy-driven: [`FailurePolicy::FailFast`]
//! cancels the remainder of the batch on the first failure (in-flight
//! tasks stop between stages, undispatched records never start), while
//! [`FailurePolicy::KeepGoing`] attempts every record. Either way the
//! caller gets a [`BatchOutcome`] with per-record failures; process
//! exit policy stays out of this module.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::core::audio::{self, AudioFormat, AudioWriter, NormalizeError, WriteError, output_path};
use crate::core::record::Record;
use crate::core::tts::{SynthesisClient, SynthesisError};

/// Default cap on concurrently running record tasks.
pub const DEFAULT_CONCURRENCY: usize = 20;

// =============================================================================
// Failure Policy
// =============================================================================

/// What the scheduler does with the rest of the batch after a record
/// fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failure cancels the remainder of the batch.
    #[default]
    FailFast,
    /// Every record runs; failures aggregate into the outcome.
    KeepGoing,
}

// =============================================================================
// Task and Batch Outcomes
// =============================================================================

/// A single record's failure, tagged with the pipeline stage.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The provider call failed.
    #[error("{record}: {source}")]
    Synthesis {
        record: String,
        #[source]
        source: SynthesisError,
    },

    /// The returned PCM could not be normalized.
    #[error("{record}: {source}")]
    Normalize {
        record: String,
        #[source]
        source: NormalizeError,
    },

    /// The WAV file could not be produced.
    #[error("{record}: {source}")]
    Write {
        record: String,
        #[source]
        source: WriteError,
    },
}

impl TaskError {
    /// Output name of the record that failed.
    pub fn record(&self) -> &str {
        match self {
            Self::Synthesis { record, .. } => record,
            Self::Normalize { record, .. } => record,
            Self::Write { record, .. } => record,
        }
    }
}

/// Terminal state of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Every record was attempted.
    Completed,
    /// A failure cancelled the remainder of the batch.
    Aborted,
}

/// Aggregate result of one batch run.
///
/// Counts always satisfy `total == succeeded + failed + cancelled`;
/// `cancelled` covers both in-flight tasks that observed cancellation
/// and records never dispatched at all.
#[derive(Debug)]
pub struct BatchOutcome {
    pub state: BatchState,
    /// Records in the input script.
    pub total: usize,
    /// Records dispatched into a task.
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Per-record failures, ordered by script position.
    pub failures: Vec<TaskError>,
}

impl BatchOutcome {
    /// True when every record produced its output file.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.cancelled == 0
    }

    pub fn first_error(&self) -> Option<&TaskError> {
        self.failures.first()
    }
}

/// How a single dispatched task ended.
enum TaskOutcome {
    Succeeded,
    Failed(TaskError),
    Cancelled,
}

// =============================================================================
// Batch Scheduler
// =============================================================================

/// Fans records out across a capped pool of concurrent tasks.
///
/// All collaborators are injected, so the scheduler itself is provider
/// and filesystem agnostic; the only shared state across tasks is the
/// semaphore and the cancellation token.
pub struct BatchScheduler {
    client: Arc<dyn SynthesisClient>,
    writer: Arc<dyn AudioWriter>,
    dest: PathBuf,
    format: AudioFormat,
    concurrency: usize,
    policy: FailurePolicy,
}

impl BatchScheduler {
    pub fn new(
        client: Arc<dyn SynthesisClient>,
        writer: Arc<dyn AudioWriter>,
        dest: impl Into<PathBuf>,
        format: AudioFormat,
    ) -> Self {
        Self {
            client,
            writer,
            dest: dest.into(),
            format,
            concurrency: DEFAULT_CONCURRENCY,
            policy: FailurePolicy::default(),
        }
    }

    /// Cap on concurrently running tasks. Values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the whole batch and return the aggregate outcome.
    ///
    /// Returns only after every spawned task has been joined, so no
    /// record task outlives this call.
    pub async fn run(&self, records: Vec<Record>) -> BatchOutcome {
        let total = records.len();
        let fail_fast = self.policy == FailurePolicy::FailFast;

        info!(
            records = total,
            concurrency = self.concurrency,
            policy = ?self.policy,
            "Starting batch run"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let cancel = CancellationToken::new();
        let mut handles: Vec<JoinHandle<TaskOutcome>> = Vec::with_capacity(total);
        let mut attempted = 0usize;

        for record in records {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore is never closed; stop dispatching if it is.
                Err(_) => break,
            };
            if fail_fast && cancel.is_cancelled() {
                break;
            }

            attempted += 1;
            let client = Arc::clone(&self.client);
            let writer = Arc::clone(&self.writer);
            let dest = self.dest.clone();
            let format = self.format;
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let outcome =
                    run_record(&record, client.as_ref(), writer.as_ref(), &dest, format, &cancel)
                        .await;
                if fail_fast && matches!(outcome, TaskOutcome::Failed(_)) {
                    cancel.cancel();
                }
                outcome
            }));
        }

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut cancelled_in_flight = 0usize;
        let mut failures = Vec::new();

        for handle in handles {
            match handle.await {
                Ok(TaskOutcome::Succeeded) => succeeded += 1,
                Ok(TaskOutcome::Failed(err)) => {
                    failed += 1;
                    failures.push(err);
                }
                Ok(TaskOutcome::Cancelled) => cancelled_in_flight += 1,
                Err(e) => {
                    error!(error = %e, "Batch task panicked");
                    failed += 1;
                }
            }
        }

        let cancelled = cancelled_in_flight + (total - attempted);
        let state = if fail_fast && failed > 0 {
            BatchState::Aborted
        } else {
            BatchState::Completed
        };

        info!(
            total,
            attempted,
            succeeded,
            failed,
            cancelled,
            state = ?state,
            "Batch run finished"
        );

        BatchOutcome {
            state,
            total,
            attempted,
            succeeded,
            failed,
            cancelled,
            failures,
        }
    }
}

/// Run one record through the synthesize, normalize, write sequence.
///
/// Cancellation is checked before the provider call and again before
/// the write, so an aborting batch starts no new provider I/O and
/// leaves no files for records that had not finished.
async fn run_record(
    record: &Record,
    client: &dyn SynthesisClient,
    writer: &dyn AudioWriter,
    dest: &Path,
    format: AudioFormat,
    cancel: &CancellationToken,
) -> TaskOutcome {
    if cancel.is_cancelled() {
        debug!(record = %record.output_name, "Skipping record, batch cancelled");
        return TaskOutcome::Cancelled;
    }

    let raw = match client.synthesize(&record.text).await {
        Ok(raw) => raw,
        Err(source) => {
            warn!(record = %record.output_name, error = %source, "Synthesis failed");
            return TaskOutcome::Failed(TaskError::Synthesis {
                record: record.output_name.clone(),
                source,
            });
        }
    };

    let samples = match audio::normalize(&raw) {
        Ok(samples) => samples,
        Err(source) => {
            warn!(record = %record.output_name, error = %source, "Normalization failed");
            return TaskOutcome::Failed(TaskError::Normalize {
                record: record.output_name.clone(),
                source,
            });
        }
    };

    if cancel.is_cancelled() {
        debug!(record = %record.output_name, "Discarding record, batch cancelled");
        return TaskOutcome::Cancelled;
    }

    let path = output_path(dest, &record.output_name);
    if let Err(source) = writer.write(&path, &samples, format).await {
        warn!(record = %record.output_name, error = %source, "Write failed");
        return TaskOutcome::Failed(TaskError::Write {
            record: record.output_name.clone(),
            source,
        });
    }

    debug!(
        record = %record.output_name,
        samples = samples.len(),
        "Record complete"
    );
    TaskOutcome::Succeeded
}
