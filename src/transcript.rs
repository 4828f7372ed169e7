use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{anyhow, Result};
use log::{debug, warn};

use crate::timecode;

// @module: Transcript parsing into timed segments

// @const: SRT timestamp line regex
static TIMESTAMP_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2},\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2},\d{3})").unwrap()
});

// @struct: Single timed transcript segment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    // @field: Sequence number (renumbered after sorting)
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Segment text (multi-line joined with spaces)
    pub text: String,
}

impl Segment {
    pub fn new(seq_num: usize, start_ms: u64, end_ms: u64, text: String) -> Self {
        Segment {
            seq_num,
            start_ms,
            end_ms,
            text,
        }
    }

    // @creates: Validated segment
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_ms: u64, end_ms: u64, text: String) -> Result<Self> {
        if end_ms < start_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} < start time {}",
                end_ms, start_ms
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty segment text for block {}", seq_num));
        }

        Ok(Segment {
            seq_num,
            start_ms,
            end_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Segment duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        timecode::format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        timecode::format_timestamp(self.end_ms)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Parse a block-structured transcript into an ordered segment list.
///
/// Blocks are separated by blank lines: an index line, a timestamp line,
/// then one or more text lines. Malformed blocks are skipped with a
/// warning, never fatal. Empty input yields an empty list; the caller
/// decides whether zero segments fails the job.
pub fn parse_transcript(content: &str) -> Vec<Segment> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut skipped = 0usize;

    for (block_idx, block) in split_blocks(trimmed).into_iter().enumerate() {
        match parse_block(block_idx + 1, &block) {
            Ok(segment) => segments.push(segment),
            Err(e) => {
                skipped += 1;
                warn!("Skipping malformed transcript block {}: {}", block_idx + 1, e);
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} of {} transcript blocks", skipped, segments.len() + skipped);
    }

    // Sort by start time; ties keep original block order (stable sort)
    segments.sort_by_key(|segment| segment.start_ms);

    // Renumber to ensure sequential order after sorting
    for (i, segment) in segments.iter_mut().enumerate() {
        segment.seq_num = i + 1;
    }

    segments
}

/// Split transcript content into blank-line separated blocks
fn split_blocks(content: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim().to_string());
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Parse one block: index line, timestamp line, text lines
fn parse_block(block_num: usize, lines: &[String]) -> Result<Segment> {
    if lines.len() < 3 {
        return Err(anyhow!("Block has {} lines, expected at least 3", lines.len()));
    }

    // Strict block shape: line 1 is the index, line 2 the timing
    let caps = TIMESTAMP_LINE_REGEX
        .captures(&lines[1])
        .ok_or_else(|| anyhow!("No timestamp on line 2"))?;

    let start_ms = timecode::parse_timestamp(&caps[1])?;
    let end_ms = timecode::parse_timestamp(&caps[2])?;

    // Multi-line blocks collapse to a single space-joined line
    let text = lines[2..].join(" ");

    Segment::new_validated(block_num, start_ms, end_ms, text)
}
