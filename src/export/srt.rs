use std::fmt::Write;

use crate::scene::styler::StyledScene;
use crate::timecode;

// @module: SubRip (SRT) scene writer

/// Render scenes as an SRT document, one cue per scene
pub fn render(scenes: &[StyledScene]) -> String {
    let mut out = String::new();

    for scene in scenes {
        // Infallible: writing to a String cannot fail
        let _ = writeln!(out, "{}", scene.index);
        let _ = writeln!(
            out,
            "{} --> {}",
            timecode::format_timestamp(scene.start_ms),
            timecode::format_timestamp(scene.end_ms)
        );
        let _ = writeln!(out, "{}", scene.text);
        let _ = writeln!(out);
    }

    out
}
