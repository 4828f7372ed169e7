/*!
 * End-to-end batch workflow tests over real files on disk
 */

use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;

use capscene::app_config::Config;
use capscene::batch::store::InMemoryJobStore;
use capscene::batch::{BatchCoordinator, BatchOptions, BatchStatus, JobStatus, StatusReporter};
use capscene::errors::BatchError;
use capscene::export::OutputFormat;
use capscene::provider::{FileTranscriptSource, InputFile};

use crate::common;

fn coordinator_with_store() -> (BatchCoordinator, StatusReporter) {
    let store = InMemoryJobStore::shared();
    let source = Arc::new(FileTranscriptSource::new());
    let coordinator = BatchCoordinator::new(store.clone(), source, Config::default());
    let reporter = StatusReporter::new(store);
    (coordinator, reporter)
}

fn srt_options() -> BatchOptions {
    BatchOptions {
        output_formats: vec![OutputFormat::Srt],
        ..BatchOptions::default()
    }
}

/// Test empty submissions are rejected before any batch exists
#[test]
fn test_submit_withNoFiles_shouldBeRejected() {
    let (coordinator, _) = coordinator_with_store();

    let result = coordinator.submit(Vec::new(), BatchOptions::default());

    assert!(matches!(result, Err(BatchError::NoInputFiles)));
}

/// Test the submission receipt counts jobs and never estimates below
/// one second per job
#[test]
fn test_submit_withSmallFiles_shouldEstimatePerJobFloor() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let files: Vec<InputFile> = (0..3)
        .map(|i| {
            let path = common::create_test_transcript(
                &temp_dir.path().to_path_buf(),
                &format!("clip_{}.srt", i),
            )
            .unwrap();
            InputFile::from_path(path)
        })
        .collect();
    let (coordinator, _) = coordinator_with_store();

    let receipt = coordinator.submit(files, BatchOptions::default())?;

    assert_eq!(receipt.total_jobs, 3);
    assert!(receipt.estimated_duration_secs >= 3);
    Ok(())
}

/// Test a healthy batch runs every job to completion
#[tokio::test]
async fn test_dispatch_withValidFiles_shouldCompleteAllJobs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("captions");
    let files: Vec<InputFile> = (0..3)
        .map(|i| {
            let path = common::create_test_transcript(
                &temp_dir.path().to_path_buf(),
                &format!("clip_{}.srt", i),
            )
            .unwrap();
            InputFile::from_path(path)
        })
        .collect();
    let (coordinator, reporter) = coordinator_with_store();

    let receipt = coordinator.submit(files, srt_options())?;
    coordinator.dispatch(receipt.batch_id, output_dir.clone()).await?;

    let report = reporter.report(receipt.batch_id)?;
    assert_eq!(report.status, BatchStatus::Completed);
    assert_eq!(report.progress, 100);
    assert_eq!(report.completed_jobs, 3);
    assert_eq!(report.failed_jobs, 0);
    for job in &report.jobs {
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress_percent, 100);
        assert!(job.scene_count.unwrap_or(0) > 0);
        assert_eq!(job.download_links.len(), 1);
        assert!(std::path::Path::new(&job.download_links[0]).exists());
    }
    Ok(())
}

/// Test one bad file degrades the batch to partial without touching the
/// other jobs
#[tokio::test]
async fn test_dispatch_withOneBadFile_shouldReportPartial() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("captions");
    let good_a = common::create_test_transcript(&temp_dir.path().to_path_buf(), "good_a.srt")?;
    let empty =
        common::create_test_file(&temp_dir.path().to_path_buf(), "empty.srt", "")?;
    let good_b = common::create_test_transcript(&temp_dir.path().to_path_buf(), "good_b.srt")?;
    let files = vec![
        InputFile::from_path(good_a),
        InputFile::from_path(empty),
        InputFile::from_path(good_b),
    ];
    let (coordinator, reporter) = coordinator_with_store();

    let receipt = coordinator.submit(files, srt_options())?;
    coordinator.dispatch(receipt.batch_id, output_dir).await?;

    let report = reporter.report(receipt.batch_id)?;
    assert_eq!(report.status, BatchStatus::Partial);
    assert_eq!(report.completed_jobs, 2);
    assert_eq!(report.failed_jobs, 1);
    assert_eq!(report.progress, 100);

    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "empty.srt");
    assert!(failures[0].1.contains("No parsable transcript segments"));

    // Successful siblings keep their artifacts
    for job in report.jobs.iter().filter(|job| job.status == JobStatus::Completed) {
        assert!(!job.download_links.is_empty());
    }
    Ok(())
}

/// Test cancelling before dispatch fails every queued job without running it
#[tokio::test]
async fn test_cancel_beforeDispatch_shouldFailQueuedJobs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("captions");
    let path = common::create_test_transcript(&temp_dir.path().to_path_buf(), "clip.srt")?;
    let (coordinator, reporter) = coordinator_with_store();

    let receipt = coordinator.submit(vec![InputFile::from_path(path)], srt_options())?;
    assert!(coordinator.cancel(receipt.batch_id));
    coordinator.dispatch(receipt.batch_id, output_dir.clone()).await?;

    let report = reporter.report(receipt.batch_id)?;
    assert_eq!(report.status, BatchStatus::Failed);
    assert_eq!(report.failed_jobs, 1);
    assert!(report.jobs[0]
        .error
        .as_deref()
        .unwrap_or("")
        .contains("cancelled"));
    assert!(!output_dir.exists());
    Ok(())
}

/// Test cancelling an unknown batch is a no-op
#[test]
fn test_cancel_withUnknownBatch_shouldReturnFalse() {
    let (coordinator, _) = coordinator_with_store();

    assert!(!coordinator.cancel(uuid::Uuid::new_v4()));
}

/// Test the poll loop observes the terminal report while dispatch runs
#[tokio::test]
async fn test_wait_until_terminal_withRunningBatch_shouldReturnFinalReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("captions");
    let path = common::create_test_transcript(&temp_dir.path().to_path_buf(), "clip.srt")?;
    let (coordinator, reporter) = coordinator_with_store();

    let receipt = coordinator.submit(vec![InputFile::from_path(path)], srt_options())?;

    let (dispatched, waited) = tokio::join!(
        coordinator.dispatch(receipt.batch_id, output_dir),
        reporter.wait_until_terminal(receipt.batch_id, Duration::from_millis(10), |_| {}),
    );

    dispatched?;
    let report = waited?;
    assert!(report.is_terminal());
    assert_eq!(report.status, BatchStatus::Completed);
    Ok(())
}

/// Test per-batch options override the configured concurrency and formats
#[tokio::test]
async fn test_dispatch_withBatchFormatOverride_shouldUseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("captions");
    let path = common::create_test_transcript(&temp_dir.path().to_path_buf(), "clip.srt")?;
    let options = BatchOptions {
        output_formats: vec![OutputFormat::Vtt, OutputFormat::Txt],
        concurrency: Some(1),
        ..BatchOptions::default()
    };
    let (coordinator, reporter) = coordinator_with_store();

    let receipt = coordinator.submit(vec![InputFile::from_path(path)], options)?;
    coordinator.dispatch(receipt.batch_id, output_dir).await?;

    let report = reporter.report(receipt.batch_id)?;
    let links = &report.jobs[0].download_links;
    assert_eq!(links.len(), 2);
    assert!(links.iter().any(|link| link.ends_with(".vtt")));
    assert!(links.iter().any(|link| link.ends_with(".txt")));
    Ok(())
}
