use std::path::{Path, PathBuf};
use std::sync::Arc;
use log::{debug, warn};

use crate::app_config::Config;
use crate::errors::PipelineError;
use crate::export::{self, OutputFormat};
use crate::file_utils::FileManager;
use crate::provider::TranscriptSource;
use crate::scene::styler::{RendererHints, StyledScene};
use crate::scene::{LineWrapper, SceneSegmenter, StyleAnnotator};
use crate::transcript;

// @module: Per-file caption pipeline

/// Stage checkpoints reported while a job runs
const PROGRESS_FETCHED: u8 = 25;
const PROGRESS_PARSED: u8 = 50;
const PROGRESS_STYLED: u8 = 75;
const PROGRESS_EXPORTED: u8 = 100;

/// Result summary of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Number of scenes produced
    pub scene_count: usize,

    /// Paths of written artifacts
    pub download_links: Vec<String>,
}

/// Composes the per-file transform: fetch -> parse -> segment -> annotate ->
/// wrap -> export. Stages run strictly sequentially within one job.
pub struct JobPipeline {
    source: Arc<dyn TranscriptSource>,
    segmenter: SceneSegmenter,
    wrapper: LineWrapper,
    formats: Vec<OutputFormat>,
    hints: RendererHints,
    output_dir: PathBuf,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl JobPipeline {
    pub fn new(
        source: Arc<dyn TranscriptSource>,
        config: &Config,
        formats: Vec<OutputFormat>,
        hints: RendererHints,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            source,
            segmenter: SceneSegmenter::new(config.segmentation),
            wrapper: LineWrapper::new(config.wrapping.max_line_length, config.wrapping.max_lines),
            formats,
            hints,
            output_dir,
            max_retries: config.batch.max_retries,
            retry_backoff_ms: config.batch.retry_backoff_ms,
        }
    }

    /// Run the full pipeline for one source file.
    ///
    /// `progress` is invoked with the stage checkpoint after each stage
    /// completes. Errors are returned, never panicked, so the worker pool
    /// can contain them at the job boundary.
    pub async fn run(
        &self,
        source_path: &Path,
        progress: impl Fn(u8),
    ) -> Result<PipelineOutcome, PipelineError> {
        let raw_text = self.fetch_with_retry(source_path).await?;
        progress(PROGRESS_FETCHED);

        let segments = transcript::parse_transcript(&raw_text);
        if segments.is_empty() {
            return Err(PipelineError::Input(format!(
                "No parsable transcript segments in {}",
                source_path.display()
            )));
        }
        progress(PROGRESS_PARSED);

        let scenes = self.build_scenes(&segments);
        progress(PROGRESS_STYLED);

        let download_links = self.export_scenes(source_path, &scenes)?;
        progress(PROGRESS_EXPORTED);

        Ok(PipelineOutcome {
            scene_count: scenes.len(),
            download_links,
        })
    }

    /// Fold, annotate and wrap segments into renderer-ready scenes.
    /// Directive stripping happens before wrapping so bracket tokens never
    /// consume line-length budget.
    fn build_scenes(&self, segments: &[crate::transcript::Segment]) -> Vec<StyledScene> {
        let scenes = self.segmenter.fold(segments);
        let mut styled = StyleAnnotator::annotate(&scenes);

        for scene in &mut styled {
            scene.text = self.wrapper.wrap(&scene.text);
        }

        styled
    }

    /// Fetch raw transcript text, retrying transient source failures with
    /// linearly increasing backoff. Permanent failures are never retried.
    async fn fetch_with_retry(&self, source_path: &Path) -> Result<String, PipelineError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.source.fetch(source_path).await {
                Ok(fetched) => return Ok(fetched.raw_text),
                Err(e) if e.is_transient() && attempt <= self.max_retries => {
                    let delay_ms = self.retry_backoff_ms * attempt as u64;
                    warn!(
                        "Transient fetch failure for {} (attempt {}/{}), retrying in {}ms: {}",
                        source_path.display(),
                        attempt,
                        self.max_retries + 1,
                        delay_ms,
                        e
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                }
                Err(e) if e.is_transient() => {
                    return Err(PipelineError::SourceExhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => {
                    return Err(PipelineError::Input(e.to_string()));
                }
            }
        }
    }

    /// Write one artifact per requested format and collect their paths
    fn export_scenes(
        &self,
        source_path: &Path,
        scenes: &[StyledScene],
    ) -> Result<Vec<String>, PipelineError> {
        FileManager::ensure_dir(&self.output_dir)?;

        let mut links = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            let output_path =
                FileManager::generate_output_path(source_path, &self.output_dir, format.extension());
            export::write_artifact(scenes, &self.hints, *format, &output_path)?;
            debug!("Wrote {} artifact: {}", format, output_path.display());
            links.push(output_path.to_string_lossy().to_string());
        }

        Ok(links)
    }
}
