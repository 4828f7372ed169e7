use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{Scene, StyleTag};

// @module: Style directive extraction and positional annotation

// @const: Bracketed style directive regex, case-insensitive
static DIRECTIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\s*(fade-in|fade-out|bold|highlight|emphasis|subtitle)\s*\]").unwrap()
});

// @const: Whitespace run regex for collapsing after directive removal
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Maximum length of a generated scene identifier
const MAX_ID_LENGTH: usize = 30;

/// Scene duration below which the emphasis heuristic fires, in ms
const EMPHASIS_DURATION_MS: u64 = 3_000;

/// A scene with its final style set, renderer identifier, and cleaned text
#[derive(Debug, Clone, PartialEq)]
pub struct StyledScene {
    /// 1-based scene number
    pub index: usize,

    /// Start time in ms
    pub start_ms: u64,

    /// End time in ms
    pub end_ms: u64,

    /// Scene text; directive-stripped on creation, wrapped by the pipeline
    pub text: String,

    /// De-duplicated union of explicit directives and heuristic tags
    pub styles: Vec<StyleTag>,

    /// Collision-safe identifier for addressing by downstream renderers
    pub id: String,
}

impl StyledScene {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    pub fn start_seconds(&self) -> f64 {
        crate::timecode::ms_to_seconds(self.start_ms)
    }

    pub fn end_seconds(&self) -> f64 {
        crate::timecode::ms_to_seconds(self.end_ms)
    }

    pub fn has_style(&self, tag: StyleTag) -> bool {
        self.styles.contains(&tag)
    }
}

/// Submission options forwarded verbatim to the downstream renderer
#[derive(Debug, Clone, Default, Serialize)]
pub struct RendererHints {
    /// Opaque style name from the submission options
    pub style: Option<String>,

    /// Opaque position name from the submission options
    pub position: Option<String>,
}

/// Annotates scenes with explicit directives and positional heuristics.
pub struct StyleAnnotator;

impl StyleAnnotator {
    /// Annotate a scene set.
    ///
    /// Explicit bracketed directives are stripped from the text and always
    /// survive into the final set. Heuristics add `fade-in` to the first
    /// scene, `fade-out` to the last, `emphasis` to scenes under 3 seconds
    /// and `highlight` to scenes whose cleaned text contains a question mark.
    pub fn annotate(scenes: &[Scene]) -> Vec<StyledScene> {
        let last_index = scenes.len();

        scenes
            .iter()
            .map(|scene| {
                let (cleaned, explicit) = Self::extract_directives(&scene.text);
                let mut styles = explicit;

                if scene.index == 1 {
                    push_unique(&mut styles, StyleTag::FadeIn);
                }
                if scene.index == last_index {
                    push_unique(&mut styles, StyleTag::FadeOut);
                }
                if scene.duration_ms() < EMPHASIS_DURATION_MS {
                    push_unique(&mut styles, StyleTag::Emphasis);
                }
                if cleaned.contains('?') {
                    push_unique(&mut styles, StyleTag::Highlight);
                }

                let id = Self::scene_id(scene.index, &cleaned);

                StyledScene {
                    index: scene.index,
                    start_ms: scene.start_ms,
                    end_ms: scene.end_ms,
                    text: cleaned,
                    styles,
                    id,
                }
            })
            .collect()
    }

    /// Strip bracketed directives from text, returning the cleaned text
    /// (whitespace collapsed) and the explicit tags in order of appearance.
    /// Stripping happens before wrapping so directives never consume the
    /// line-length budget.
    pub fn extract_directives(text: &str) -> (String, Vec<StyleTag>) {
        let mut explicit = Vec::new();

        for caps in DIRECTIVE_REGEX.captures_iter(text) {
            if let Ok(tag) = caps[1].to_lowercase().parse::<StyleTag>() {
                push_unique(&mut explicit, tag);
            }
        }

        let stripped = DIRECTIVE_REGEX.replace_all(text, " ");
        let cleaned = WHITESPACE_REGEX
            .replace_all(stripped.trim(), " ")
            .to_string();

        (cleaned, explicit)
    }

    /// Derive a renderer-addressable identifier from the scene index plus up
    /// to two significant words of the cleaned text. The result is limited
    /// to `[a-zA-Z0-9_]`, has no double underscores, never starts with a
    /// digit, and is capped at 30 characters with an index-suffixed
    /// truncation when over budget.
    pub fn scene_id(index: usize, cleaned_text: &str) -> String {
        let words: Vec<String> = cleaned_text
            .split_whitespace()
            .filter_map(|word| {
                let alnum: String = word
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect();
                if alnum.chars().count() >= 3 {
                    Some(alnum.to_lowercase())
                } else {
                    None
                }
            })
            .take(2)
            .collect();

        let mut id = format!("scene_{}", index);
        for word in &words {
            id.push('_');
            id.push_str(word);
        }

        let id = collapse_underscores(&id);

        if id.chars().count() > MAX_ID_LENGTH {
            let suffix = format!("_{}", index);
            let keep = MAX_ID_LENGTH.saturating_sub(suffix.chars().count());
            let mut truncated: String = id.chars().take(keep).collect();
            let trimmed = truncated.trim_end_matches('_').len();
            truncated.truncate(trimmed);
            truncated.push_str(&suffix);
            truncated
        } else {
            id
        }
    }
}

fn push_unique(styles: &mut Vec<StyleTag>, tag: StyleTag) {
    if !styles.contains(&tag) {
        styles.push(tag);
    }
}

fn collapse_underscores(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut prev_underscore = false;

    for c in id.chars() {
        if c == '_' {
            if !prev_underscore {
                out.push(c);
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    out.trim_end_matches('_').to_string()
}
