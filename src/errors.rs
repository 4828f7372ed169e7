/*!
 * Error types for the capscene application.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by a transcript source (disk reader or remote service)
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transient failure (timeout, temporarily unavailable) - retryable
    #[error("transient source error: {0}")]
    Transient(String),

    /// Permanent failure (missing file, unsupported type) - not retryable
    #[error("source error: {0}")]
    Permanent(String),
}

impl SourceError {
    /// Whether the pipeline may retry the fetch that produced this error
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Errors that can occur while running a job pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Empty or unparsable transcript - the job fails fast, never retried
    #[error("input error: {0}")]
    Input(String),

    /// Transient source failures exhausted the retry budget
    #[error("source failed after {attempts} attempts: {last_error}")]
    SourceExhausted {
        /// Number of fetch attempts made
        attempts: u32,
        /// Message from the last failed attempt
        last_error: String,
    },

    /// Unexpected failure in a pipeline stage, contained at the job boundary
    #[error("pipeline error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for PipelineError {
    fn from(error: anyhow::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(error: std::io::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

/// Errors surfaced synchronously by the batch coordinator
#[derive(Error, Debug)]
pub enum BatchError {
    /// Submission contained no input files - the batch is never created
    #[error("no input files submitted")]
    NoInputFiles,

    /// The requested batch id is not present in the store
    #[error("unknown batch: {0}")]
    UnknownBatch(String),
}
