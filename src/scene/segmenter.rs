use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::transcript::Segment;
use super::Scene;

// @module: Greedy folding of segments into duration-bounded scenes

/// Duration and break thresholds governing scene cuts, in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SceneThresholds {
    /// Hard cap on accumulated scene duration
    #[serde(default = "default_max_scene_ms")]
    pub max_scene_ms: u64,

    /// Once exceeded, a natural break before the next segment forces a cut
    #[serde(default = "default_soft_break_ms")]
    pub soft_break_ms: u64,

    /// Inter-segment gap that counts as a natural break on its own
    #[serde(default = "default_break_gap_ms")]
    pub break_gap_ms: u64,

    /// Smaller gap that counts as a break after a trailing comma
    #[serde(default = "default_comma_gap_ms")]
    pub comma_gap_ms: u64,
}

fn default_max_scene_ms() -> u64 {
    15_000
}

fn default_soft_break_ms() -> u64 {
    10_000
}

fn default_break_gap_ms() -> u64 {
    1_000
}

fn default_comma_gap_ms() -> u64 {
    500
}

impl Default for SceneThresholds {
    fn default() -> Self {
        Self {
            max_scene_ms: default_max_scene_ms(),
            soft_break_ms: default_soft_break_ms(),
            break_gap_ms: default_break_gap_ms(),
            comma_gap_ms: default_comma_gap_ms(),
        }
    }
}

/// Folds an ordered segment sequence into scenes.
///
/// The fold is greedy and online: a single forward pass with no lookahead
/// beyond one segment, so the result is deterministic and O(n).
pub struct SceneSegmenter {
    thresholds: SceneThresholds,
}

impl SceneSegmenter {
    pub fn new(thresholds: SceneThresholds) -> Self {
        Self { thresholds }
    }

    /// Fold segments into scenes under the configured thresholds.
    ///
    /// Every input segment lands in exactly one scene; the final open scene
    /// is always emitted even when partially filled. A single segment whose
    /// own timing exceeds the hard cap still becomes its own scene - the cap
    /// governs accumulation across segments, not source timing.
    pub fn fold(&self, segments: &[Segment]) -> Vec<Scene> {
        if segments.is_empty() {
            return Vec::new();
        }

        let total_segments = segments.len();
        let mut scenes: Vec<Scene> = Vec::new();
        let mut folded_count = 0usize;

        let mut current = open_scene(&segments[0]);
        folded_count += 1;

        for pair in segments.windows(2) {
            let (previous, candidate) = (&pair[0], &pair[1]);

            if self.should_cut(&current, previous, candidate) {
                scenes.push(current);
                current = open_scene(candidate);
            } else {
                current.text.push(' ');
                current.text.push_str(&candidate.text);
                current.end_ms = current.end_ms.max(candidate.end_ms);
            }
            folded_count += 1;
        }

        scenes.push(current);

        // Renumber in emission order
        for (i, scene) in scenes.iter_mut().enumerate() {
            scene.index = i + 1;
        }

        if folded_count != total_segments {
            error!(
                "Lost segments during scene folding! Input: {}, folded: {}",
                total_segments, folded_count
            );
        } else {
            debug!("Folded {} segments into {} scenes", total_segments, scenes.len());
        }

        scenes
    }

    /// Decide whether the candidate segment starts a new scene
    fn should_cut(&self, current: &Scene, previous: &Segment, candidate: &Segment) -> bool {
        // Hypothetical duration if the candidate were folded in
        let hypothetical_ms = candidate.end_ms.saturating_sub(current.start_ms);

        if hypothetical_ms > self.thresholds.max_scene_ms {
            return true;
        }

        let running_ms = current.end_ms.saturating_sub(current.start_ms);
        running_ms > self.thresholds.soft_break_ms && self.is_natural_break(previous, candidate)
    }

    /// A natural break exists when the timing gap is large enough or the
    /// previous segment ends on sentence punctuation (comma needs a smaller
    /// gap to qualify).
    fn is_natural_break(&self, previous: &Segment, candidate: &Segment) -> bool {
        let gap_ms = candidate.start_ms.saturating_sub(previous.end_ms);

        if gap_ms >= self.thresholds.break_gap_ms {
            return true;
        }

        let trimmed = previous.text.trim_end();
        if trimmed.ends_with(['.', '!', '?']) {
            return true;
        }

        trimmed.ends_with(',') && gap_ms >= self.thresholds.comma_gap_ms
    }
}

fn open_scene(segment: &Segment) -> Scene {
    Scene {
        index: 0,
        start_ms: segment.start_ms,
        end_ms: segment.end_ms,
        text: segment.text.clone(),
    }
}
