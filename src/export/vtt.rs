use std::fmt::Write;

use crate::scene::styler::StyledScene;
use crate::timecode;

// @module: WebVTT scene writer

/// Render scenes as a WebVTT document with scene ids as cue identifiers
pub fn render(scenes: &[StyledScene]) -> String {
    let mut out = String::from("WEBVTT\n\n");

    for scene in scenes {
        let _ = writeln!(out, "{}", scene.id);
        let _ = writeln!(
            out,
            "{} --> {}",
            timecode::format_timestamp_vtt(scene.start_ms),
            timecode::format_timestamp_vtt(scene.end_ms)
        );
        let _ = writeln!(out, "{}", scene.text);
        let _ = writeln!(out);
    }

    out
}
