/*!
 * Tests for scene segmentation
 */

use capscene::scene::{SceneSegmenter, SceneThresholds};
use capscene::transcript::Segment;

fn seg(start_ms: u64, end_ms: u64, text: &str) -> Segment {
    Segment::new(0, start_ms, end_ms, text.to_string())
}

fn segmenter() -> SceneSegmenter {
    SceneSegmenter::new(SceneThresholds::default())
}

/// Test a single segment yields a single scene
#[test]
fn test_fold_withSingleSegment_shouldYieldOneScene() {
    let scenes = segmenter().fold(&[seg(1_000, 3_500, "Hello everyone")]);

    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].index, 1);
    assert_eq!(scenes[0].start_ms, 1_000);
    assert_eq!(scenes[0].end_ms, 3_500);
    assert_eq!(scenes[0].text, "Hello everyone");
}

/// Test contiguous segments under the soft threshold fold into one scene
#[test]
fn test_fold_withShortContiguousSegments_shouldExtendScene() {
    let segments = vec![
        seg(0, 5_000, "First part"),
        seg(5_000, 10_000, "second part"),
        seg(10_000, 14_000, "third part"),
    ];

    let scenes = segmenter().fold(&segments);

    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].text, "First part second part third part");
    assert_eq!(scenes[0].end_ms, 14_000);
}

/// Test sentence punctuation forces a cut once the soft threshold is passed
#[test]
fn test_fold_withSentenceEndPastSoftThreshold_shouldCut() {
    let segments = vec![
        seg(0, 6_000, "A long opening stretch"),
        seg(6_000, 11_000, "that finally ends here."),
        seg(11_200, 14_000, "A fresh thought"),
    ];

    let scenes = segmenter().fold(&segments);

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].end_ms, 11_000);
    assert_eq!(scenes[1].start_ms, 11_200);
    assert_eq!(scenes[1].index, 2);
}

/// Test no punctuation and no gap keeps extending past the soft threshold
#[test]
fn test_fold_withNoNaturalBreak_shouldKeepExtending() {
    let segments = vec![
        seg(0, 6_000, "running on"),
        seg(6_000, 11_000, "and on"),
        seg(11_000, 14_000, "and on still"),
    ];

    let scenes = segmenter().fold(&segments);

    assert_eq!(scenes.len(), 1);
}

/// Test the hard cap cuts even without a natural break
#[test]
fn test_fold_withHardCapExceeded_shouldAlwaysCut() {
    let segments = vec![
        seg(0, 8_000, "first stretch"),
        seg(8_000, 14_000, "second stretch"),
        seg(14_000, 16_000, "over the cap"),
    ];

    let scenes = segmenter().fold(&segments);

    assert_eq!(scenes.len(), 2);
    for scene in &scenes {
        assert!(
            scene.duration_ms() <= 15_000,
            "scene {} exceeds hard cap: {}ms",
            scene.index,
            scene.duration_ms()
        );
    }
}

/// Test a trailing comma needs the smaller gap to qualify as a break
#[test]
fn test_fold_withTrailingComma_shouldCutOnlyWithGap() {
    let base = vec![
        seg(0, 6_000, "a slow build"),
        seg(6_000, 11_000, "with a pause,"),
    ];

    // Gap of 600ms after a comma qualifies
    let mut with_gap = base.clone();
    with_gap.push(seg(11_600, 14_000, "then more"));
    assert_eq!(segmenter().fold(&with_gap).len(), 2);

    // Gap of 300ms does not
    let mut without_gap = base;
    without_gap.push(seg(11_300, 14_000, "then more"));
    assert_eq!(segmenter().fold(&without_gap).len(), 1);
}

/// Test a large timing gap is a natural break on its own
#[test]
fn test_fold_withLargeGapPastSoftThreshold_shouldCut() {
    let segments = vec![
        seg(0, 6_000, "part one"),
        seg(6_000, 11_000, "part two"),
        seg(12_500, 14_500, "after silence"),
    ];

    let scenes = segmenter().fold(&segments);

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[1].start_ms, 12_500);
}

/// Test a single segment longer than the hard cap is still emitted
#[test]
fn test_fold_withOversizedSingleSegment_shouldEmitOwnScene() {
    let scenes = segmenter().fold(&[seg(0, 20_000, "one very long take")]);

    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].duration_ms(), 20_000);
}

/// Test every input segment lands in exactly one scene
#[test]
fn test_fold_withManySegments_shouldKeepAllText() {
    let segments: Vec<Segment> = (0..20)
        .map(|i| seg(i * 4_000, i * 4_000 + 3_500, &format!("word{}.", i)))
        .collect();

    let scenes = segmenter().fold(&segments);

    assert!(!scenes.is_empty());
    let total_words: usize = scenes
        .iter()
        .map(|scene| scene.text.split_whitespace().count())
        .sum();
    assert_eq!(total_words, 20);

    // Scene numbering is 1..N in emission order
    for (i, scene) in scenes.iter().enumerate() {
        assert_eq!(scene.index, i + 1);
    }
}

/// Test empty input yields no scenes
#[test]
fn test_fold_withEmptyInput_shouldReturnEmpty() {
    assert!(segmenter().fold(&[]).is_empty());
}
