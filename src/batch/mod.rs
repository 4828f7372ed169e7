/*!
 * Batch job coordination.
 *
 * This module contains the batch side of the application:
 * - `store`: injected job/batch state store with snapshot reads
 * - `coordinator`: submission validation and the bounded worker pool
 * - `reporter`: derived batch status, progress and poll helpers
 */

pub mod coordinator;
pub mod reporter;
pub mod store;

pub use coordinator::{BatchCoordinator, SubmitReceipt};
pub use reporter::{BatchReport, StatusReporter};
pub use store::{InMemoryJobStore, JobStore};

use std::fmt;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::export::OutputFormat;

/// Identifier of a submitted batch
pub type BatchId = Uuid;

/// Finite job state; terminal states never revert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Derived batch state, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Processing,
    Completed,
    Failed,
    Partial,
}

impl BatchStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Partial => "partial",
        };
        write!(f, "{}", s)
    }
}

/// The per-input-file unit of batch work.
///
/// Mutated only by the worker that owns it; reporters read cloned
/// snapshots.
#[derive(Debug, Clone)]
pub struct Job {
    /// Stable job identifier
    pub id: Uuid,

    /// Display filename
    pub filename: String,

    /// Path handed to the transcript source
    pub source_path: PathBuf,

    /// Input size in bytes
    pub size_bytes: u64,

    /// Current state
    pub status: JobStatus,

    /// Stage progress, 0..100
    pub progress_percent: u8,

    /// Number of scenes produced, present once completed
    pub scene_count: Option<usize>,

    /// Captured failure message, present once failed
    pub error: Option<String>,

    /// Paths of written artifacts
    pub download_links: Vec<String>,
}

impl Job {
    pub fn new(filename: String, source_path: PathBuf, size_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            source_path,
            size_bytes,
            status: JobStatus::Queued,
            progress_percent: 0,
            scene_count: None,
            error: None,
            download_links: Vec::new(),
        }
    }
}

/// Submission options carried with a batch.
///
/// `style` and `position` are opaque to the segmentation logic and
/// forwarded verbatim to the renderer metadata; `webhook_url` is carried
/// for clients that push their own notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Renderer style name, forwarded verbatim
    pub style: Option<String>,

    /// Renderer position name, forwarded verbatim
    pub position: Option<String>,

    /// Artifact formats each job produces; falls back to config when empty
    #[serde(default)]
    pub output_formats: Vec<OutputFormat>,

    /// Worker pool size override; falls back to config when absent
    pub concurrency: Option<usize>,

    /// Opaque webhook reference for push-notifying clients
    pub webhook_url: Option<String>,
}
