use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use tokio::sync::Semaphore;

use crate::app_config::Config;
use crate::errors::BatchError;
use crate::export::OutputFormat;
use crate::pipeline::JobPipeline;
use crate::provider::{InputFile, TranscriptSource};
use crate::scene::styler::RendererHints;

use super::store::JobStore;
use super::{BatchId, BatchOptions, Job};

// @module: Batch submission and bounded worker pool

/// Bytes of transcript input assumed to process per second, for estimates
const ESTIMATE_BYTES_PER_SEC: u64 = 25_000;

/// Synchronous response to a batch submission
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    /// Identifier for status queries and dispatch
    pub batch_id: BatchId,

    /// Number of jobs created
    pub total_jobs: usize,

    /// Rough processing estimate derived from aggregate input size
    pub estimated_duration_secs: u64,
}

/// Accepts file sets, creates jobs and owns the worker pool that drives
/// each job through the pipeline.
pub struct BatchCoordinator {
    store: Arc<dyn JobStore>,
    source: Arc<dyn TranscriptSource>,
    config: Config,
}

impl BatchCoordinator {
    pub fn new(
        store: Arc<dyn JobStore>,
        source: Arc<dyn TranscriptSource>,
        config: Config,
    ) -> Self {
        Self {
            store,
            source,
            config,
        }
    }

    /// Validate and admit a file set as a new batch.
    ///
    /// Creates one `queued` job per file and returns immediately; an empty
    /// file list is rejected and no batch is created.
    pub fn submit(
        &self,
        files: Vec<InputFile>,
        options: BatchOptions,
    ) -> Result<SubmitReceipt, BatchError> {
        if files.is_empty() {
            return Err(BatchError::NoInputFiles);
        }

        let total_bytes: u64 = files.iter().map(|file| file.size_bytes).sum();
        let jobs: Vec<Job> = files
            .into_iter()
            .map(|file| Job::new(file.filename, file.path, file.size_bytes))
            .collect();
        let total_jobs = jobs.len();

        let batch_id = self.store.create_batch(jobs, options);
        let estimated_duration_secs =
            (total_bytes / ESTIMATE_BYTES_PER_SEC).max(total_jobs as u64);

        info!(
            "Batch {} submitted: {} job(s), ~{}s estimated",
            batch_id, total_jobs, estimated_duration_secs
        );

        Ok(SubmitReceipt {
            batch_id,
            total_jobs,
            estimated_duration_secs,
        })
    }

    /// Run all queued jobs of a batch through the pipeline on a bounded
    /// worker pool.
    ///
    /// Each job transitions `queued -> processing` via an exclusive pickup
    /// and reaches a terminal state on pipeline exit. One job's failure
    /// never aborts its siblings; completion order across jobs is
    /// nondeterministic.
    pub async fn dispatch(&self, batch_id: BatchId, output_dir: PathBuf) -> Result<(), BatchError> {
        let snapshot = self
            .store
            .snapshot(batch_id)
            .ok_or_else(|| BatchError::UnknownBatch(batch_id.to_string()))?;

        let concurrency = snapshot
            .options
            .concurrency
            .unwrap_or(self.config.batch.concurrency)
            .max(1);
        let formats = self.effective_formats(&snapshot.options);
        let hints = RendererHints {
            style: snapshot.options.style.clone(),
            position: snapshot.options.position.clone(),
        };

        let pipeline = Arc::new(JobPipeline::new(
            self.source.clone(),
            &self.config,
            formats,
            hints,
            output_dir,
        ));

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let total_jobs = snapshot.jobs.len();

        stream::iter(0..total_jobs)
            .map(|job_index| {
                let store = self.store.clone();
                let pipeline = pipeline.clone();
                let semaphore = semaphore.clone();

                async move {
                    let _permit = semaphore.acquire().await.expect("semaphore closed");
                    Self::run_job(store, pipeline, batch_id, job_index).await;
                }
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(())
    }

    /// Signal cancellation: queued jobs stop being picked up, in-flight
    /// jobs run to completion
    pub fn cancel(&self, batch_id: BatchId) -> bool {
        let cancelled = self.store.cancel_batch(batch_id);
        if cancelled {
            info!("Batch {} cancelled", batch_id);
        }
        cancelled
    }

    fn effective_formats(&self, options: &BatchOptions) -> Vec<OutputFormat> {
        if options.output_formats.is_empty() {
            self.config.output_formats.clone()
        } else {
            options.output_formats.clone()
        }
    }

    /// Drive one job to a terminal state; all failures are contained here
    async fn run_job(
        store: Arc<dyn JobStore>,
        pipeline: Arc<JobPipeline>,
        batch_id: BatchId,
        job_index: usize,
    ) {
        if store.is_cancelled(batch_id) {
            store.fail_job(
                batch_id,
                job_index,
                "batch cancelled before job started".to_string(),
            );
            return;
        }

        // Exclusive pickup: a job owned by another worker is skipped
        if !store.try_start_job(batch_id, job_index) {
            debug!("Job {} of batch {} already picked up, skipping", job_index, batch_id);
            return;
        }

        let Some(snapshot) = store.snapshot(batch_id) else {
            return;
        };
        let Some(job) = snapshot.jobs.get(job_index) else {
            return;
        };
        let source_path = job.source_path.clone();
        let filename = job.filename.clone();

        let progress_store = store.clone();
        let result = pipeline
            .run(&source_path, move |percent| {
                progress_store.set_job_progress(batch_id, job_index, percent);
            })
            .await;

        match result {
            Ok(outcome) => {
                debug!(
                    "Job {} completed: {} scene(s), {} artifact(s)",
                    filename,
                    outcome.scene_count,
                    outcome.download_links.len()
                );
                store.complete_job(
                    batch_id,
                    job_index,
                    outcome.scene_count,
                    outcome.download_links,
                );
            }
            Err(e) => {
                warn!("Job {} failed: {}", filename, e);
                store.fail_job(batch_id, job_index, e.to_string());
            }
        }
    }
}
