use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::{BatchId, BatchOptions, Job, JobStatus};

// @module: Injected job/batch state store

/// Point-in-time copy of a batch and its jobs.
///
/// Snapshots are cloned out of the store under the read lock, so a reporter
/// never observes a torn job record.
#[derive(Debug, Clone)]
pub struct BatchSnapshot {
    pub batch_id: BatchId,
    pub options: BatchOptions,
    pub created_at: DateTime<Utc>,
    pub cancelled: bool,
    pub jobs: Vec<Job>,
}

/// Storage seam for job and batch state.
///
/// The store is the only mutable structure shared between workers and
/// reporters. Writers address jobs by batch id and position; pickup uses an
/// exclusive `queued -> processing` transition so two workers can never own
/// the same job.
pub trait JobStore: Send + Sync {
    /// Create a batch with its jobs in `queued` state
    fn create_batch(&self, jobs: Vec<Job>, options: BatchOptions) -> BatchId;

    /// Cloned snapshot of a batch, or None when unknown
    fn snapshot(&self, batch_id: BatchId) -> Option<BatchSnapshot>;

    /// Exclusive pickup: transition the job to `processing` iff still queued
    fn try_start_job(&self, batch_id: BatchId, job_index: usize) -> bool;

    /// Record stage progress for a running job
    fn set_job_progress(&self, batch_id: BatchId, job_index: usize, percent: u8);

    /// Transition a job to `completed` with its artifacts
    fn complete_job(
        &self,
        batch_id: BatchId,
        job_index: usize,
        scene_count: usize,
        download_links: Vec<String>,
    );

    /// Transition a job to `failed` with a captured error message
    fn fail_job(&self, batch_id: BatchId, job_index: usize, error: String);

    /// Raise the batch cancel flag; returns false for an unknown batch
    fn cancel_batch(&self, batch_id: BatchId) -> bool;

    /// Whether the batch has been cancelled
    fn is_cancelled(&self, batch_id: BatchId) -> bool;

    /// Drop a batch from the store; returns false for an unknown batch
    fn evict(&self, batch_id: BatchId) -> bool;
}

#[derive(Debug)]
struct BatchRecord {
    options: BatchOptions,
    created_at: DateTime<Utc>,
    cancelled: bool,
    jobs: Vec<Job>,
}

/// In-memory store backed by a lock-guarded map.
///
/// Created at batch submission and retained until an explicit `evict`.
#[derive(Default)]
pub struct InMemoryJobStore {
    batches: RwLock<HashMap<BatchId, BatchRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle for injection into coordinator and reporter
    pub fn shared() -> Arc<dyn JobStore> {
        Arc::new(Self::new())
    }

    fn with_job<F>(&self, batch_id: BatchId, job_index: usize, mutate: F)
    where
        F: FnOnce(&mut Job),
    {
        let mut batches = self.batches.write();
        if let Some(record) = batches.get_mut(&batch_id) {
            if let Some(job) = record.jobs.get_mut(job_index) {
                mutate(job);
            }
        }
    }
}

impl JobStore for InMemoryJobStore {
    fn create_batch(&self, jobs: Vec<Job>, options: BatchOptions) -> BatchId {
        let batch_id = Uuid::new_v4();
        let record = BatchRecord {
            options,
            created_at: Utc::now(),
            cancelled: false,
            jobs,
        };
        self.batches.write().insert(batch_id, record);
        batch_id
    }

    fn snapshot(&self, batch_id: BatchId) -> Option<BatchSnapshot> {
        let batches = self.batches.read();
        batches.get(&batch_id).map(|record| BatchSnapshot {
            batch_id,
            options: record.options.clone(),
            created_at: record.created_at,
            cancelled: record.cancelled,
            jobs: record.jobs.clone(),
        })
    }

    fn try_start_job(&self, batch_id: BatchId, job_index: usize) -> bool {
        let mut batches = self.batches.write();
        let Some(record) = batches.get_mut(&batch_id) else {
            return false;
        };
        let Some(job) = record.jobs.get_mut(job_index) else {
            return false;
        };

        if job.status == JobStatus::Queued {
            job.status = JobStatus::Processing;
            true
        } else {
            false
        }
    }

    fn set_job_progress(&self, batch_id: BatchId, job_index: usize, percent: u8) {
        self.with_job(batch_id, job_index, |job| {
            if job.status == JobStatus::Processing {
                // Progress never moves backwards
                job.progress_percent = job.progress_percent.max(percent.min(100));
            }
        });
    }

    fn complete_job(
        &self,
        batch_id: BatchId,
        job_index: usize,
        scene_count: usize,
        download_links: Vec<String>,
    ) {
        self.with_job(batch_id, job_index, |job| {
            if !job.status.is_terminal() {
                job.status = JobStatus::Completed;
                job.progress_percent = 100;
                job.scene_count = Some(scene_count);
                job.download_links = download_links;
            }
        });
    }

    fn fail_job(&self, batch_id: BatchId, job_index: usize, error: String) {
        self.with_job(batch_id, job_index, |job| {
            if !job.status.is_terminal() {
                job.status = JobStatus::Failed;
                job.error = Some(error);
            }
        });
    }

    fn cancel_batch(&self, batch_id: BatchId) -> bool {
        let mut batches = self.batches.write();
        match batches.get_mut(&batch_id) {
            Some(record) => {
                record.cancelled = true;
                true
            }
            None => false,
        }
    }

    fn is_cancelled(&self, batch_id: BatchId) -> bool {
        let batches = self.batches.read();
        batches
            .get(&batch_id)
            .map(|record| record.cancelled)
            .unwrap_or(false)
    }

    fn evict(&self, batch_id: BatchId) -> bool {
        self.batches.write().remove(&batch_id).is_some()
    }
}
