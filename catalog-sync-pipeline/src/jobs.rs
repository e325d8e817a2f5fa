//! Background resync jobs.
//!
//! [`ResyncJobRunner`] plays the part of a task queue: each enqueued resync
//! gets a [`JobId`] and is handed to a single worker task, which runs jobs
//! one at a time in enqueue order. The worker pulls steps from a
//! [`ResyncRun`](crate::ResyncRun), records the latest checkpoint and checks
//! for cancellation between steps.

use std::collections::HashMap;
use std::sync::Arc;

use catalog_sync_shared::SyncProgress;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch, Mutex, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engine::SyncEngine;
use crate::errors::SyncError;
use crate::resync::{ProgressSink, ResyncReport};

/// Identifier handed out for every enqueued job.
pub type JobId = Uuid;

/// Finished jobs kept around for status queries.
pub const DEFAULT_FINISHED_JOB_LIMIT: usize = 50;

type JobTable = Arc<RwLock<HashMap<JobId, JobRecord>>>;
type ChannelTable = Arc<Mutex<HashMap<JobId, JobChannels>>>;

/// State of a resync job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Queued,
    Running { progress: SyncProgress },
    Completed { report: ResyncReport },
    Failed(String),
    Cancelled,
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed { .. } | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }
}

/// A job as seen by the administrative surface.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: JobId,
    pub purge_all: bool,
    pub status: JobStatus,
    pub queued_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Per-job signalling, dropped once the job finishes.
struct JobChannels {
    cancel: watch::Sender<bool>,
    done: watch::Receiver<bool>,
}

struct QueuedJob {
    id: JobId,
    purge_all: bool,
    cancel: watch::Receiver<bool>,
    done: watch::Sender<bool>,
    sink: Option<Arc<dyn ProgressSink>>,
}

/// Runs resyncs in the background, one at a time.
pub struct ResyncJobRunner {
    engine: Arc<SyncEngine>,
    sink: Option<Arc<dyn ProgressSink>>,
    jobs: JobTable,
    channels: ChannelTable,
    queue: Mutex<Option<mpsc::UnboundedSender<QueuedJob>>>,
    finished_job_limit: usize,
}

impl ResyncJobRunner {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            engine,
            sink: None,
            jobs: Arc::new(RwLock::new(HashMap::new())),
            channels: Arc::new(Mutex::new(HashMap::new())),
            queue: Mutex::new(None),
            finished_job_limit: DEFAULT_FINISHED_JOB_LIMIT,
        }
    }

    /// Forward every checkpoint of every job to `sink`.
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Keep at most `limit` finished jobs; older ones are forgotten.
    pub fn with_finished_job_limit(mut self, limit: usize) -> Self {
        self.finished_job_limit = limit;
        self
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    /// Queue a resync and return its id immediately.
    pub async fn enqueue(&self, purge_all: bool) -> JobId {
        let id = Uuid::new_v4();
        let record = JobRecord {
            id,
            purge_all,
            status: JobStatus::Queued,
            queued_at: Utc::now(),
            started_at: None,
            finished_at: None,
        };
        self.jobs.write().await.insert(id, record);

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (done_tx, done_rx) = watch::channel(false);
        self.channels.lock().await.insert(
            id,
            JobChannels {
                cancel: cancel_tx,
                done: done_rx,
            },
        );

        let job = QueuedJob {
            id,
            purge_all,
            cancel: cancel_rx,
            done: done_tx,
            sink: self.sink.clone(),
        };

        let mut queue = self.queue.lock().await;
        let sender = match queue.as_ref() {
            Some(sender) if !sender.is_closed() => sender.clone(),
            _ => {
                let (sender, receiver) = mpsc::unbounded_channel();
                tokio::spawn(work(
                    self.engine.clone(),
                    self.jobs.clone(),
                    self.channels.clone(),
                    self.finished_job_limit,
                    receiver,
                ));
                *queue = Some(sender.clone());
                sender
            }
        };
        if sender.send(job).is_err() {
            error!(job_id = %id, "Resync worker is gone");
            finish(&self.jobs, id, JobStatus::Failed("resync worker is gone".to_string())).await;
            self.channels.lock().await.remove(&id);
            return id;
        }

        info!(job_id = %id, purge_all, "Resync job queued");
        id
    }

    pub async fn status(&self, id: JobId) -> Option<JobRecord> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// All known jobs, oldest first.
    pub async fn jobs(&self) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = self.jobs.read().await.values().cloned().collect();
        records.sort_by_key(|r| r.queued_at);
        records
    }

    /// Ask a job to stop at its next checkpoint.
    ///
    /// Documents already written are not rolled back. Returns `false` for
    /// unknown or finished jobs.
    pub async fn cancel(&self, id: JobId) -> bool {
        let finished = match self.jobs.read().await.get(&id) {
            Some(record) => record.status.is_finished(),
            None => return false,
        };
        if finished {
            return false;
        }

        match self.channels.lock().await.get(&id) {
            Some(channels) => channels.cancel.send(true).is_ok(),
            None => false,
        }
    }

    /// Wait for a job to finish and return its final record.
    ///
    /// Dropping the returned future does not affect the job.
    pub async fn wait(&self, id: JobId) -> Option<JobRecord> {
        let done = self
            .channels
            .lock()
            .await
            .get(&id)
            .map(|channels| channels.done.clone());

        // no channels left means the job already finished
        if let Some(mut done) = done {
            if done.wait_for(|finished| *finished).await.is_err() {
                let unfinished = self
                    .status(id)
                    .await
                    .is_some_and(|record| !record.status.is_finished());
                if unfinished {
                    error!(job_id = %id, "Resync job ended without a final status");
                    finish(&self.jobs, id, JobStatus::Failed("job ended unexpectedly".to_string()))
                        .await;
                    self.channels.lock().await.remove(&id);
                }
            }
        }

        self.status(id).await
    }
}

async fn work(
    engine: Arc<SyncEngine>,
    jobs: JobTable,
    channels: ChannelTable,
    finished_job_limit: usize,
    mut queue: mpsc::UnboundedReceiver<QueuedJob>,
) {
    while let Some(job) = queue.recv().await {
        let QueuedJob {
            id,
            purge_all,
            cancel,
            done,
            sink,
        } = job;

        // a panicking run only takes its own task down
        let run = tokio::spawn(run_job(engine.clone(), jobs.clone(), id, purge_all, cancel, sink));
        let status = match run.await {
            Ok(status) => status,
            Err(e) => {
                error!(job_id = %id, error = %e, "Resync job task failed");
                JobStatus::Failed(e.to_string())
            }
        };

        finish(&jobs, id, status).await;
        prune_finished(&jobs, finished_job_limit).await;
        channels.lock().await.remove(&id);
        let _ = done.send(true);
    }
}

async fn run_job(
    engine: Arc<SyncEngine>,
    jobs: JobTable,
    id: JobId,
    purge_all: bool,
    cancel: watch::Receiver<bool>,
    sink: Option<Arc<dyn ProgressSink>>,
) -> JobStatus {
    let cancelled_while_queued = *cancel.borrow();
    if cancelled_while_queued {
        info!(job_id = %id, "Resync job cancelled before it started");
        return JobStatus::Cancelled;
    }

    info!(job_id = %id, purge_all, "Resync job started");
    if let Some(record) = jobs.write().await.get_mut(&id) {
        record.started_at = Some(Utc::now());
        record.status = JobStatus::Running {
            progress: SyncProgress::new(0.0, "starting"),
        };
    }

    match drive(&engine, id, purge_all, &cancel, &jobs, sink.as_deref()).await {
        Ok(report) => JobStatus::Completed { report },
        Err(SyncError::Cancelled) => {
            warn!(job_id = %id, "Resync job cancelled");
            JobStatus::Cancelled
        }
        Err(e) => {
            error!(job_id = %id, error = %e, "Resync job failed");
            JobStatus::Failed(e.to_string())
        }
    }
}

async fn drive(
    engine: &SyncEngine,
    id: JobId,
    purge_all: bool,
    cancel: &watch::Receiver<bool>,
    jobs: &JobTable,
    sink: Option<&dyn ProgressSink>,
) -> Result<ResyncReport, SyncError> {
    let mut run = engine.start_resync(purge_all).await?;

    loop {
        let cancelled = *cancel.borrow();
        if cancelled {
            return Err(SyncError::Cancelled);
        }

        let Some(progress) = run.next_step().await? else {
            break;
        };

        if let Some(sink) = sink {
            sink.report(&progress);
        }
        set_status(jobs, id, JobStatus::Running { progress }).await;
    }

    Ok(run.into_report())
}

async fn set_status(jobs: &JobTable, id: JobId, status: JobStatus) {
    if let Some(record) = jobs.write().await.get_mut(&id) {
        record.status = status;
    }
}

async fn finish(jobs: &JobTable, id: JobId, status: JobStatus) {
    if let Some(record) = jobs.write().await.get_mut(&id) {
        record.status = status;
        record.finished_at = Some(Utc::now());
    }
}

/// Forget the oldest finished jobs beyond `limit`.
async fn prune_finished(jobs: &JobTable, limit: usize) {
    let mut jobs = jobs.write().await;

    let mut finished: Vec<(DateTime<Utc>, JobId)> = jobs
        .values()
        .filter_map(|r| r.finished_at.map(|at| (at, r.id)))
        .collect();
    if finished.len() <= limit {
        return;
    }

    finished.sort();
    let excess = finished.len() - limit;
    for (_, id) in finished.into_iter().take(excess) {
        jobs.remove(&id);
    }
}
