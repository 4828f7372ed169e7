use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{anyhow, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::app_config::Config;
use crate::batch::{
    BatchCoordinator, BatchOptions, BatchStatus, InMemoryJobStore, StatusReporter,
};
use crate::file_utils::FileManager;
use crate::provider::{FileTranscriptSource, InputFile};

// @module: Application controller for caption conversion

/// Main application controller wiring the CLI to the batch coordinator
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the conversion workflow for a file or directory of transcripts
    pub async fn run(
        &self,
        input_path: PathBuf,
        output_dir: PathBuf,
        options: BatchOptions,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        let files = self.collect_input_files(&input_path)?;
        info!("Found {} transcript file(s) to process", files.len());

        let store = InMemoryJobStore::shared();
        let coordinator = BatchCoordinator::new(
            store.clone(),
            Arc::new(FileTranscriptSource::new()),
            self.config.clone(),
        );
        let reporter = StatusReporter::new(store.clone());

        let receipt = coordinator.submit(files, options)?;
        info!(
            "Batch {} queued ({} job(s), ~{}s estimated)",
            receipt.batch_id, receipt.total_jobs, receipt.estimated_duration_secs
        );

        let multi_progress = MultiProgress::new();
        let bar = multi_progress.add(ProgressBar::new(100));
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let poll_interval = Duration::from_millis(self.config.batch.poll_interval_ms);
        let (dispatch_result, final_report) = tokio::join!(
            coordinator.dispatch(receipt.batch_id, output_dir),
            reporter.wait_until_terminal(receipt.batch_id, poll_interval, |report| {
                bar.set_position(report.progress as u64);
                bar.set_message(format!(
                    "{}/{} done, {} failed",
                    report.completed_jobs + report.failed_jobs,
                    report.total_jobs,
                    report.failed_jobs
                ));
            }),
        );
        dispatch_result?;
        let report = final_report?;
        bar.finish_and_clear();

        info!(
            "Batch {} finished in {}: {} ({}/{} completed, {} failed)",
            report.batch_id,
            Self::format_duration(start_time.elapsed()),
            report.status,
            report.completed_jobs,
            report.total_jobs,
            report.failed_jobs
        );

        for job in &report.jobs {
            if let Some(count) = job.scene_count {
                info!("  {} -> {} scene(s)", job.filename, count);
                for link in &job.download_links {
                    info!("    {}", link);
                }
            }
        }

        if report.status == BatchStatus::Partial {
            for (filename, error) in report.failures() {
                warn!("  {} failed: {}", filename, error);
            }
        }

        // The CLI is done with this batch; release its state
        store.evict(report.batch_id);

        if report.status == BatchStatus::Failed {
            return Err(anyhow!("All {} job(s) failed", report.total_jobs));
        }

        Ok(())
    }

    /// Gather the input file set for a submission
    fn collect_input_files(&self, input_path: &PathBuf) -> Result<Vec<InputFile>> {
        if FileManager::file_exists(input_path) {
            return Ok(vec![InputFile::from_path(input_path)]);
        }

        if FileManager::dir_exists(input_path) {
            let paths = FileManager::find_transcript_files(input_path)?;
            return Ok(paths.iter().map(InputFile::from_path).collect());
        }

        Err(anyhow!("Input path does not exist: {}", input_path.display()))
    }

    /// Human-readable duration for summary logging
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m{:02}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{}.{}s", total_secs, duration.subsec_millis() / 100)
        }
    }
}
