/*!
 * Export writers for styled scenes.
 *
 * Each writer renders the full scene list to a byte-stream-ready string:
 * - `jsx`: After Effects script with one text layer per scene
 * - `srt` / `vtt`: subtitle files in the codec's canonical timestamp formats
 * - `plain`: wrapped text only, for quick review
 */

pub mod jsx;
pub mod plain;
pub mod srt;
pub mod vtt;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::scene::styler::{RendererHints, StyledScene};

/// Artifact formats a job can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// After Effects script (motion-graphics renderer input)
    Jsx,
    /// SubRip subtitle file
    Srt,
    /// WebVTT subtitle file
    Vtt,
    /// Plain wrapped text
    Txt,
}

impl OutputFormat {
    /// File extension for the artifact
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jsx => "jsx",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jsx" => Ok(Self::Jsx),
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "txt" | "text" => Ok(Self::Txt),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Render scenes to the requested format
pub fn render(scenes: &[StyledScene], hints: &RendererHints, format: OutputFormat) -> String {
    match format {
        OutputFormat::Jsx => jsx::render(scenes, hints),
        OutputFormat::Srt => srt::render(scenes),
        OutputFormat::Vtt => vtt::render(scenes),
        OutputFormat::Txt => plain::render(scenes),
    }
}

/// Render scenes and write the artifact to disk
pub fn write_artifact<P: AsRef<Path>>(
    scenes: &[StyledScene],
    hints: &RendererHints,
    format: OutputFormat,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = render(scenes, hints, format);
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {} artifact: {}", format, path.display()))
}
