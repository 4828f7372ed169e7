use std::fmt::Write;

use crate::scene::styler::{RendererHints, StyledScene};
use crate::scene::StyleTag;

// @module: After Effects JSX scene writer

/// Composition defaults for generated scripts
const COMP_NAME: &str = "Captions";
const COMP_WIDTH: u32 = 1920;
const COMP_HEIGHT: u32 = 1080;
const COMP_FPS: u32 = 30;
const FONT_SIZE: u32 = 48;
const BOTTOM_MARGIN: u32 = 100;

/// Render scenes as an After Effects script: one composition, one text
/// layer per scene with timing from the scene bounds, base caption styling
/// and per-style-tag animation blocks.
pub fn render(scenes: &[StyledScene], hints: &RendererHints) -> String {
    // Scenes can overlap, so the latest end is not always the last scene's
    let comp_duration = scenes
        .iter()
        .map(|scene| scene.end_seconds())
        .fold(0.0_f64, f64::max)
        + 2.0;

    let mut out = String::new();

    let _ = writeln!(out, "// Auto-generated After Effects caption script");
    if let Some(style) = &hints.style {
        let _ = writeln!(out, "// Requested style: {}", style);
    }
    if let Some(position) = &hints.position {
        let _ = writeln!(out, "// Requested position: {}", position);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "var comp = app.project.items.addComp(\"{}\", {}, {}, 1, {:.3}, {});",
        COMP_NAME, COMP_WIDTH, COMP_HEIGHT, comp_duration, COMP_FPS
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "var fontSize = {};", FONT_SIZE);
    let _ = writeln!(out, "var fontFamily = \"Arial-BoldMT\";");
    let _ = writeln!(out, "var textColor = [1, 1, 1];");
    let _ = writeln!(out, "var strokeColor = [0, 0, 0];");
    let _ = writeln!(out, "var strokeWidth = 3;");
    let _ = writeln!(out);

    for scene in scenes {
        render_scene(&mut out, scene);
    }

    let _ = writeln!(
        out,
        "alert(\"Caption import complete! \" + comp.layers.length + \" text layers created.\");"
    );

    out
}

fn render_scene(out: &mut String, scene: &StyledScene) {
    let var = format!("layer_{}", scene.id);
    let text = escape_jsx(&scene.text);
    let styles: Vec<&str> = scene.styles.iter().map(|tag| tag.as_str()).collect();

    let _ = writeln!(out, "// {} [{}]", scene.id, styles.join(", "));
    let _ = writeln!(out, "var {} = comp.layers.addText(\"{}\");", var, text);
    let _ = writeln!(out, "{}.startTime = {:.3};", var, scene.start_seconds());
    let _ = writeln!(out, "{}.inPoint = {:.3};", var, scene.start_seconds());
    let _ = writeln!(out, "{}.outPoint = {:.3};", var, scene.end_seconds());
    let _ = writeln!(
        out,
        "var {}_doc = {}.property(\"Source Text\").value;",
        var, var
    );
    let _ = writeln!(
        out,
        "{}_doc.fontSize = {};",
        var,
        if scene.has_style(StyleTag::Subtitle) {
            FONT_SIZE * 3 / 4
        } else {
            FONT_SIZE
        }
    );
    let _ = writeln!(out, "{}_doc.font = fontFamily;", var);
    let _ = writeln!(
        out,
        "{}_doc.fillColor = {};",
        var,
        if scene.has_style(StyleTag::Highlight) {
            "[1, 0.92, 0.23]"
        } else {
            "textColor"
        }
    );
    let _ = writeln!(out, "{}_doc.strokeColor = strokeColor;", var);
    let _ = writeln!(
        out,
        "{}_doc.strokeWidth = {};",
        var,
        if scene.has_style(StyleTag::Bold) { "strokeWidth + 2" } else { "strokeWidth" }
    );
    let _ = writeln!(out, "{}_doc.applyStroke = true;", var);
    let _ = writeln!(
        out,
        "{}_doc.justification = ParagraphJustification.CENTER_JUSTIFY;",
        var
    );
    let _ = writeln!(
        out,
        "{}.property(\"Source Text\").setValue({}_doc);",
        var, var
    );
    let _ = writeln!(
        out,
        "{}.property(\"Transform\").property(\"Position\").setValue([{}, {}]);",
        var,
        COMP_WIDTH / 2,
        COMP_HEIGHT - BOTTOM_MARGIN
    );

    let opacity = format!("{}.property(\"Transform\").property(\"Opacity\")", var);
    if scene.has_style(StyleTag::FadeIn) {
        let _ = writeln!(
            out,
            "{}.setValueAtTime({:.3}, 0);",
            opacity,
            scene.start_seconds()
        );
        let _ = writeln!(
            out,
            "{}.setValueAtTime({:.3}, 100);",
            opacity,
            scene.start_seconds() + 0.5
        );
    }
    if scene.has_style(StyleTag::FadeOut) {
        let _ = writeln!(
            out,
            "{}.setValueAtTime({:.3}, 100);",
            opacity,
            (scene.end_seconds() - 0.5).max(scene.start_seconds())
        );
        let _ = writeln!(
            out,
            "{}.setValueAtTime({:.3}, 0);",
            opacity,
            scene.end_seconds()
        );
    }
    if scene.has_style(StyleTag::Emphasis) {
        let scale = format!("{}.property(\"Transform\").property(\"Scale\")", var);
        let _ = writeln!(
            out,
            "{}.setValueAtTime({:.3}, [100, 100]);",
            scale,
            scene.start_seconds()
        );
        let _ = writeln!(
            out,
            "{}.setValueAtTime({:.3}, [110, 110]);",
            scale,
            scene.start_seconds() + 0.3
        );
    }

    let _ = writeln!(out);
}

/// Escape scene text for embedding in a JSX string literal
fn escape_jsx(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\r")
}
