/*!
 * Tests for the job store and status reporter
 */

use std::path::PathBuf;
use std::sync::Arc;

use capscene::batch::store::{InMemoryJobStore, JobStore};
use capscene::batch::{BatchOptions, BatchStatus, Job, JobStatus, StatusReporter};

fn make_jobs(count: usize) -> Vec<Job> {
    (0..count)
        .map(|i| {
            Job::new(
                format!("file_{}.srt", i),
                PathBuf::from(format!("/tmp/file_{}.srt", i)),
                1_000,
            )
        })
        .collect()
}

fn store_with_jobs(count: usize) -> (Arc<dyn JobStore>, capscene::batch::BatchId) {
    let store = InMemoryJobStore::shared();
    let batch_id = store.create_batch(make_jobs(count), BatchOptions::default());
    (store, batch_id)
}

/// Test exclusive pickup: a job can only be started once
#[test]
fn test_try_start_job_withSecondPickup_shouldRefuse() {
    let (store, batch_id) = store_with_jobs(1);

    assert!(store.try_start_job(batch_id, 0));
    assert!(!store.try_start_job(batch_id, 0));

    let snapshot = store.snapshot(batch_id).unwrap();
    assert_eq!(snapshot.jobs[0].status, JobStatus::Processing);
}

/// Test terminal jobs never revert
#[test]
fn test_job_transitions_withTerminalState_shouldNotRevert() {
    let (store, batch_id) = store_with_jobs(1);

    store.try_start_job(batch_id, 0);
    store.complete_job(batch_id, 0, 3, vec!["out.jsx".to_string()]);

    // A late failure report must not overwrite the completed state
    store.fail_job(batch_id, 0, "too late".to_string());

    let snapshot = store.snapshot(batch_id).unwrap();
    assert_eq!(snapshot.jobs[0].status, JobStatus::Completed);
    assert_eq!(snapshot.jobs[0].scene_count, Some(3));
    assert!(snapshot.jobs[0].error.is_none());
}

/// Test progress only moves forward while processing
#[test]
fn test_set_job_progress_withBackwardsUpdate_shouldKeepMax() {
    let (store, batch_id) = store_with_jobs(1);

    store.try_start_job(batch_id, 0);
    store.set_job_progress(batch_id, 0, 50);
    store.set_job_progress(batch_id, 0, 25);

    let snapshot = store.snapshot(batch_id).unwrap();
    assert_eq!(snapshot.jobs[0].progress_percent, 50);
}

/// Test a fresh batch reports processing at zero progress
#[test]
fn test_report_withQueuedJobs_shouldBeProcessing() {
    let (store, batch_id) = store_with_jobs(3);
    let reporter = StatusReporter::new(store);

    let report = reporter.report(batch_id).unwrap();

    assert_eq!(report.status, BatchStatus::Processing);
    assert_eq!(report.progress, 0);
    assert_eq!(report.total_jobs, 3);
    assert_eq!(report.completed_jobs, 0);
    assert_eq!(report.failed_jobs, 0);
}

/// Test the derived status for each terminal mix
#[test]
fn test_report_withTerminalJobs_shouldDeriveStatus() {
    // All completed
    let (store, batch_id) = store_with_jobs(2);
    store.try_start_job(batch_id, 0);
    store.complete_job(batch_id, 0, 1, Vec::new());
    store.try_start_job(batch_id, 1);
    store.complete_job(batch_id, 1, 1, Vec::new());
    let report = StatusReporter::new(store).report(batch_id).unwrap();
    assert_eq!(report.status, BatchStatus::Completed);
    assert_eq!(report.progress, 100);

    // All failed
    let (store, batch_id) = store_with_jobs(2);
    store.try_start_job(batch_id, 0);
    store.fail_job(batch_id, 0, "bad".to_string());
    store.try_start_job(batch_id, 1);
    store.fail_job(batch_id, 1, "bad".to_string());
    let report = StatusReporter::new(store).report(batch_id).unwrap();
    assert_eq!(report.status, BatchStatus::Failed);

    // Mixed outcome
    let (store, batch_id) = store_with_jobs(2);
    store.try_start_job(batch_id, 0);
    store.complete_job(batch_id, 0, 1, Vec::new());
    store.try_start_job(batch_id, 1);
    store.fail_job(batch_id, 1, "bad".to_string());
    let report = StatusReporter::new(store).report(batch_id).unwrap();
    assert_eq!(report.status, BatchStatus::Partial);
    assert_eq!(report.completed_jobs, 1);
    assert_eq!(report.failed_jobs, 1);
}

/// Test progress is the rounded share of terminal jobs
#[test]
fn test_report_withPartialTerminal_shouldRoundProgress() {
    let (store, batch_id) = store_with_jobs(3);
    store.try_start_job(batch_id, 0);
    store.complete_job(batch_id, 0, 1, Vec::new());

    let report = StatusReporter::new(store).report(batch_id).unwrap();

    // 1 of 3 terminal: round(33.33) = 33
    assert_eq!(report.progress, 33);
    assert_eq!(report.status, BatchStatus::Processing);
    assert!(report.completed_jobs + report.failed_jobs <= report.total_jobs);
}

/// Test partial batches enumerate their failures
#[test]
fn test_failures_withPartialBatch_shouldListFailedJobs() {
    let (store, batch_id) = store_with_jobs(2);
    store.try_start_job(batch_id, 0);
    store.complete_job(batch_id, 0, 1, Vec::new());
    store.try_start_job(batch_id, 1);
    store.fail_job(batch_id, 1, "no parsable segments".to_string());

    let report = StatusReporter::new(store).report(batch_id).unwrap();
    let failures = report.failures();

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "file_1.srt");
    assert_eq!(failures[0].1, "no parsable segments");
}

/// Test unknown batches are reported as errors
#[test]
fn test_report_withUnknownBatch_shouldFail() {
    let store = InMemoryJobStore::shared();
    let reporter = StatusReporter::new(store);

    assert!(reporter.report(uuid::Uuid::new_v4()).is_err());
}

/// Test cancel flag and eviction
#[test]
fn test_cancel_and_evict_withKnownBatch_shouldApply() {
    let (store, batch_id) = store_with_jobs(1);

    assert!(!store.is_cancelled(batch_id));
    assert!(store.cancel_batch(batch_id));
    assert!(store.is_cancelled(batch_id));

    assert!(store.evict(batch_id));
    assert!(store.snapshot(batch_id).is_none());
    assert!(!store.evict(batch_id));
}
