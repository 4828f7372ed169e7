/*!
 * Transcript source seam.
 *
 * The pipeline consumes raw transcript text through the `TranscriptSource`
 * trait so the production disk reader and test doubles (including sources
 * that simulate transient transcription-service failures) are
 * interchangeable.
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::SourceError;

/// Progress state reported by an upstream transcription service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// A transcript fetched from a source, with the upstream progress state
#[derive(Debug, Clone)]
pub struct FetchedTranscript {
    /// Raw block-structured transcript text
    pub raw_text: String,

    /// Upstream status at fetch time
    pub status: SourceStatus,

    /// Upstream numeric progress, 0..100
    pub progress: u8,
}

impl FetchedTranscript {
    /// A completed fetch wrapping the given text
    pub fn completed(raw_text: String) -> Self {
        Self {
            raw_text,
            status: SourceStatus::Completed,
            progress: 100,
        }
    }
}

/// Common trait for transcript sources
///
/// Implementations distinguish transient failures (retried by the pipeline
/// with backoff) from permanent ones (failed fast) via `SourceError`.
#[async_trait]
pub trait TranscriptSource: Send + Sync + Debug {
    /// Fetch the raw transcript for the given source path
    async fn fetch(&self, source_path: &Path) -> Result<FetchedTranscript, SourceError>;
}

/// Extensions accepted as transcript input
const TRANSCRIPT_EXTENSIONS: [&str; 2] = ["srt", "txt"];

/// Disk-backed transcript source for already-transcribed subtitle files
#[derive(Debug, Clone, Default)]
pub struct FileTranscriptSource;

impl FileTranscriptSource {
    pub fn new() -> Self {
        Self
    }

    /// Whether a path looks like a transcript this source can read
    pub fn accepts(path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                TRANSCRIPT_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl TranscriptSource for FileTranscriptSource {
    async fn fetch(&self, source_path: &Path) -> Result<FetchedTranscript, SourceError> {
        if !Self::accepts(source_path) {
            return Err(SourceError::Permanent(format!(
                "Unsupported file type: {}",
                source_path.display()
            )));
        }

        if !source_path.exists() {
            return Err(SourceError::Permanent(format!(
                "File not found: {}",
                source_path.display()
            )));
        }

        let raw_text = tokio::fs::read_to_string(source_path)
            .await
            .map_err(|e| match e.kind() {
                // Interrupted reads and timeouts are worth a retry
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::TimedOut => {
                    SourceError::Transient(format!("{}: {}", source_path.display(), e))
                }
                _ => SourceError::Permanent(format!("{}: {}", source_path.display(), e)),
            })?;

        Ok(FetchedTranscript::completed(raw_text))
    }
}

/// Owned source path plus display name, the per-file unit of a submission
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Path handed to the transcript source
    pub path: PathBuf,

    /// Display filename for reports
    pub filename: String,

    /// Input size in bytes, used for the submission estimate
    pub size_bytes: u64,
}

impl InputFile {
    /// Build an input record from a path, reading its size if available
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let size_bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            path,
            filename,
            size_bytes,
        }
    }
}
