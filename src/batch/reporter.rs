use std::sync::Arc;
use std::time::Duration;
use log::warn;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::BatchError;

use super::store::JobStore;
use super::{BatchId, BatchStatus, Job, JobStatus};

// @module: Derived batch status reporting

/// Consecutive reporter errors tolerated by the poll loop before giving up
const MAX_POLL_ERRORS: u32 = 5;

/// Per-job view included in a batch report
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub id: Uuid,
    pub filename: String,
    pub status: JobStatus,
    pub progress_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub download_links: Vec<String>,
}

impl From<&Job> for JobReport {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            filename: job.filename.clone(),
            status: job.status,
            progress_percent: job.progress_percent,
            scene_count: job.scene_count,
            error: job.error.clone(),
            download_links: job.download_links.clone(),
        }
    }
}

/// Aggregate batch progress derived from current job states.
///
/// Counts are always computed from the job snapshot, never stored, so they
/// cannot desync from the per-job truth.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: BatchId,
    pub status: BatchStatus,
    /// 0..100, monotonically non-decreasing (terminal jobs never revert)
    pub progress: u8,
    pub completed_jobs: usize,
    pub failed_jobs: usize,
    pub total_jobs: usize,
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Failed jobs with their captured error messages, for partial batches
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.jobs
            .iter()
            .filter(|job| job.status == JobStatus::Failed)
            .map(|job| {
                (
                    job.filename.as_str(),
                    job.error.as_deref().unwrap_or("unknown error"),
                )
            })
            .collect()
    }
}

/// Answers status queries by snapshotting the store and deriving aggregate
/// state on demand.
pub struct StatusReporter {
    store: Arc<dyn JobStore>,
}

impl StatusReporter {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Build the aggregate report for a batch
    pub fn report(&self, batch_id: BatchId) -> Result<BatchReport, BatchError> {
        let snapshot = self
            .store
            .snapshot(batch_id)
            .ok_or_else(|| BatchError::UnknownBatch(batch_id.to_string()))?;

        let total_jobs = snapshot.jobs.len();
        let completed_jobs = count_status(&snapshot.jobs, JobStatus::Completed);
        let failed_jobs = count_status(&snapshot.jobs, JobStatus::Failed);
        let terminal = completed_jobs + failed_jobs;

        let status = if terminal < total_jobs {
            BatchStatus::Processing
        } else if failed_jobs == 0 {
            BatchStatus::Completed
        } else if completed_jobs == 0 {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        };

        let progress = if total_jobs == 0 {
            100
        } else {
            ((terminal as f64 / total_jobs as f64) * 100.0).round() as u8
        };

        Ok(BatchReport {
            batch_id,
            status,
            progress,
            completed_jobs,
            failed_jobs,
            total_jobs,
            jobs: snapshot.jobs.iter().map(JobReport::from).collect(),
        })
    }

    /// Poll at a fixed interval until the batch reaches a terminal status.
    ///
    /// Reporter errors back off exponentially; after `MAX_POLL_ERRORS`
    /// consecutive failures the last error is returned. `on_report` fires
    /// for every successful poll, terminal report included.
    pub async fn wait_until_terminal(
        &self,
        batch_id: BatchId,
        poll_interval: Duration,
        mut on_report: impl FnMut(&BatchReport),
    ) -> Result<BatchReport, BatchError> {
        let mut consecutive_errors = 0u32;

        loop {
            match self.report(batch_id) {
                Ok(report) => {
                    consecutive_errors = 0;
                    on_report(&report);
                    if report.is_terminal() {
                        return Ok(report);
                    }
                    tokio::time::sleep(poll_interval).await;
                }
                Err(e) => {
                    consecutive_errors += 1;
                    if consecutive_errors >= MAX_POLL_ERRORS {
                        return Err(e);
                    }
                    let backoff = poll_interval * 2u32.pow(consecutive_errors);
                    warn!(
                        "Status poll failed ({}/{}), backing off {:?}: {}",
                        consecutive_errors, MAX_POLL_ERRORS, backoff, e
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

fn count_status(jobs: &[Job], status: JobStatus) -> usize {
    jobs.iter().filter(|job| job.status == status).count()
}
