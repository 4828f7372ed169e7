use std::fmt::Write;

use crate::scene::styler::StyledScene;

// @module: Plain text scene writer

/// Render scenes as plain wrapped text, one blank-line separated block each
pub fn render(scenes: &[StyledScene]) -> String {
    let mut out = String::new();

    for scene in scenes {
        let _ = writeln!(out, "{}", scene.text);
        let _ = writeln!(out);
    }

    out.trim_end().to_string()
}
