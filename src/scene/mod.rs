/*!
 * Scene segmentation and styling.
 *
 * This module turns a flat sequence of timed segments into bounded scenes
 * with video-safe line wrapping and style annotations:
 * - `segmenter`: folds segments into duration-bounded scenes
 * - `styler`: extracts style directives and applies positional heuristics
 * - `wrapper`: reflows scene text into at most two video-safe lines
 */

pub mod segmenter;
pub mod styler;
pub mod wrapper;

pub use segmenter::{SceneThresholds, SceneSegmenter};
pub use styler::{StyleAnnotator, StyledScene};
pub use wrapper::LineWrapper;

use std::fmt;
use std::str::FromStr;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::timecode;

/// A group of consecutive segments merged under duration/break rules
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// 1-based scene number in emission order
    pub index: usize,

    /// Start time in ms (first folded segment's start)
    pub start_ms: u64,

    /// End time in ms (last folded segment's end)
    pub end_ms: u64,

    /// Concatenated segment text, space-joined
    pub text: String,
}

impl Scene {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    pub fn start_seconds(&self) -> f64 {
        timecode::ms_to_seconds(self.start_ms)
    }

    pub fn end_seconds(&self) -> f64 {
        timecode::ms_to_seconds(self.end_ms)
    }
}

/// Symbolic annotation attached to a scene for a downstream renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleTag {
    FadeIn,
    FadeOut,
    Bold,
    Highlight,
    Emphasis,
    Subtitle,
}

impl StyleTag {
    /// All tags recognized as bracketed text directives
    pub const ALL: [StyleTag; 6] = [
        StyleTag::FadeIn,
        StyleTag::FadeOut,
        StyleTag::Bold,
        StyleTag::Highlight,
        StyleTag::Emphasis,
        StyleTag::Subtitle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FadeIn => "fade-in",
            Self::FadeOut => "fade-out",
            Self::Bold => "bold",
            Self::Highlight => "highlight",
            Self::Emphasis => "emphasis",
            Self::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StyleTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fade-in" => Ok(Self::FadeIn),
            "fade-out" => Ok(Self::FadeOut),
            "bold" => Ok(Self::Bold),
            "highlight" => Ok(Self::Highlight),
            "emphasis" => Ok(Self::Emphasis),
            "subtitle" => Ok(Self::Subtitle),
            _ => Err(anyhow!("Unknown style tag: {}", s)),
        }
    }
}
