/*!
 * Tests for the hallucination filter
 */

use subtrack::app_config::FilterConfig;
use subtrack::hallucination::{HallucinationFilter, RemovalReason};
use subtrack::text_utils::normalize_text;

use crate::common;

fn indices(cues: &[subtrack::Cue]) -> Vec<usize> {
    cues.iter().map(|c| c.index).collect()
}

fn texts(cues: &[subtrack::Cue]) -> Vec<&str> {
    cues.iter().map(|c| c.text.as_str()).collect()
}

#[test]
fn test_is_known_phrase_shouldMatchNormalizedPhrases() {
    let filter = HallucinationFilter::new();

    assert!(filter.is_known_phrase(&normalize_text("We'll be right back.")));
    assert!(filter.is_known_phrase(&normalize_text("Thanks for watching!")));
    assert!(filter.is_known_phrase(&normalize_text("Bye bye!")));
    assert!(!filter.is_known_phrase(&normalize_text("Thank you, Doctor.")));
}

#[test]
fn test_is_music_cue_shouldRequireOnlyGlyphs() {
    let filter = HallucinationFilter::new();

    assert!(filter.is_music_cue("♪"));
    assert!(filter.is_music_cue(" ♫ ♪ \n ♬ "));
    assert!(filter.is_music_cue("* * *"));
    assert!(!filter.is_music_cue(""));
    assert!(!filter.is_music_cue("   "));
    assert!(!filter.is_music_cue("♪ la la la ♪"));
}

#[test]
fn test_filter_phraseMidDialogue_shouldBeKept() {
    let cues = common::cues(&[(100.0, 103.0, "Hello there"), (105.0, 106.0, "Thank you."), (110.0, 112.0, "Let's go")]);

    let result = HallucinationFilter::new().filter(&cues, 0.0);

    assert!(result.removals.is_empty());
    assert_eq!(result.cues, cues);
}

#[test]
fn test_filter_isolatedPhrase_shouldBeRemoved() {
    let cues = common::cues(&[(10.0, 12.0, "Real line"), (100.0, 102.0, "Thank you."), (200.0, 202.0, "Another line")]);

    let result = HallucinationFilter::new().filter(&cues, 0.0);

    assert_eq!(result.removals.len(), 1);
    assert_eq!(result.removals[0].reason, RemovalReason::IsolatedHallucination);
    assert_eq!(result.removals[0].cue, cues[1]);
    assert_eq!(texts(&result.cues), vec!["Real line", "Another line"]);
    assert_eq!(indices(&result.cues), vec![1, 2]);
}

#[test]
fn test_filter_firstCue_shouldMeasureGapFromZero() {
    let near_start = common::cues(&[(10.0, 12.0, "Bye"), (100.0, 102.0, "Dialogue")]);
    assert!(HallucinationFilter::new().filter(&near_start, 0.0).removals.is_empty());

    let late_start = common::cues(&[(40.0, 42.0, "Bye!"), (100.0, 102.0, "Dialogue")]);
    let result = HallucinationFilter::new().filter(&late_start, 0.0);
    assert_eq!(result.count(RemovalReason::IsolatedHallucination), 1);
}

#[test]
fn test_filter_lastCue_shouldTreatGapAfterAsInfinite() {
    let cues = common::cues(&[(10.0, 12.0, "Dialogue"), (100.0, 101.0, "Thanks for watching!")]);

    let result = HallucinationFilter::new().filter(&cues, 0.0);

    assert_eq!(result.count(RemovalReason::IsolatedHallucination), 1);
    assert_eq!(texts(&result.cues), vec!["Dialogue"]);
}

#[test]
fn test_filter_isolatedMusic_shouldBeRemovedAsMusicSymbols() {
    let cues = common::cues(&[
        (5.0, 8.0, "Dialogue"),
        (60.0, 65.0, "♪ ♪"),
        (120.0, 125.0, "♪ la la la ♪"),
        (200.0, 202.0, "More dialogue"),
    ]);

    let result = HallucinationFilter::new().filter(&cues, 0.0);

    assert_eq!(result.removals.len(), 1);
    assert_eq!(result.removals[0].reason, RemovalReason::MusicSymbols);
    assert_eq!(texts(&result.cues), vec!["Dialogue", "♪ la la la ♪", "More dialogue"]);
}

#[test]
fn test_filter_repeatedRun_shouldRemoveWholeRunOnly() {
    let cues = common::cues(&[
        (10.0, 12.0, "Hello"),
        (100.0, 102.0, "Subtitles by the community"),
        (120.0, 122.0, "Subtitles by the community."),
        (140.0, 142.0, "subtitles by the community"),
        (160.0, 162.0, "Subtitles by the community"),
        (180.0, 182.0, "Subtitles by the community"),
        (185.0, 187.0, "Unrelated dialogue"),
    ]);

    let result = HallucinationFilter::new().filter(&cues, 0.0);

    assert_eq!(result.removals.len(), 5);
    assert!(result.removals.iter().all(|r| r.reason == RemovalReason::RepeatedHallucination));
    assert_eq!(
        result.removals.iter().map(|r| r.cue.index).collect::<Vec<_>>(),
        vec![2, 3, 4, 5, 6]
    );
    assert_eq!(texts(&result.cues), vec!["Hello", "Unrelated dialogue"]);
    assert_eq!(indices(&result.cues), vec![1, 2]);
}

#[test]
fn test_filter_repeatsWithShortGaps_shouldNotFormRun() {
    let cues = common::cues(&[
        (10.0, 12.0, "Same text"),
        (30.0, 32.0, "Same text"),
        (33.0, 35.0, "Same text"),
        (50.0, 52.0, "Same text"),
    ]);

    let result = HallucinationFilter::new().filter(&cues, 0.0);
    assert!(result.removals.is_empty());
}

#[test]
fn test_filter_runOfTwo_shouldNotBeRemoved() {
    let cues = common::cues(&[(10.0, 12.0, "Echo"), (40.0, 42.0, "Echo"), (45.0, 47.0, "Other")]);
    assert!(HallucinationFilter::new().filter(&cues, 0.0).removals.is_empty());
}

#[test]
fn test_filter_trailingSweep_shouldRemoveCreditsNoise() {
    let cues = common::cues(&[
        (100.0, 103.0, "Dialogue"),
        (3290.0, 3292.0, "Thank you"),
        (3310.0, 3312.0, "♪♪"),
        (3320.0, 3322.0, "Thanks for watching"),
        (3330.0, 3335.0, "Real credits line"),
    ]);

    let result = HallucinationFilter::new().filter(&cues, 3600.0);

    let reasons: Vec<RemovalReason> = result.removals.iter().map(|r| r.reason).collect();
    assert_eq!(reasons, vec![RemovalReason::TrailingMusic, RemovalReason::TrailingHallucination]);
    assert_eq!(texts(&result.cues), vec!["Dialogue", "Thank you", "Real credits line"]);
    assert_eq!(indices(&result.cues), vec![1, 2, 3]);
}

#[test]
fn test_filter_trailingSweep_shouldBeDisabledBelowTwiceTheWindow() {
    let cues = common::cues(&[(500.0, 502.0, "Dialogue"), (520.0, 521.0, "Thank you"), (530.0, 531.0, "♪")]);

    let short = HallucinationFilter::new().filter(&cues, 599.0);
    assert!(short.removals.is_empty());

    let long = HallucinationFilter::new().filter(&cues, 600.0);
    let reasons: Vec<RemovalReason> = long.removals.iter().map(|r| r.reason).collect();
    assert_eq!(reasons, vec![RemovalReason::TrailingHallucination, RemovalReason::TrailingMusic]);
    assert_eq!(texts(&long.cues), vec!["Dialogue"]);
}

#[test]
fn test_filter_removalLog_shouldListFirstPassBeforeTrailingSweep() {
    let cues = common::cues(&[
        (5.0, 7.0, "Opening"),
        (60.0, 61.0, "Bye"),
        (120.0, 122.0, "Middle"),
        (3400.0, 3401.0, "Bye bye"),
        (3410.0, 3412.0, "Credits"),
    ]);

    let result = HallucinationFilter::new().filter(&cues, 3600.0);

    let reasons: Vec<RemovalReason> = result.removals.iter().map(|r| r.reason).collect();
    assert_eq!(
        reasons,
        vec![RemovalReason::IsolatedHallucination, RemovalReason::TrailingHallucination]
    );
}

#[test]
fn test_filter_shouldBeIdempotent() {
    let cues = common::cues(&[
        (5.0, 7.0, "Hi"),
        (10.0, 12.0, "How are you"),
        (60.0, 61.0, "Thank you"),
        (120.0, 122.0, "Fine"),
        (125.0, 127.0, "Great"),
        (200.0, 201.0, "Ghost"),
        (220.0, 221.0, "Ghost"),
        (240.0, 241.0, "Ghost"),
        (300.0, 302.0, "Back to it"),
        (3500.0, 3501.0, "♪"),
    ]);
    let filter = HallucinationFilter::new();

    let first = filter.filter(&cues, 3600.0);
    assert_eq!(first.removals.len(), 5);
    assert_eq!(first.count(RemovalReason::RepeatedHallucination), 3);
    assert_eq!(first.count(RemovalReason::IsolatedHallucination), 1);
    assert_eq!(first.count(RemovalReason::MusicSymbols), 1);

    let second = filter.filter(&first.cues, 3600.0);
    assert!(second.removals.is_empty());
    assert_eq!(second.cues, first.cues);
}

#[test]
fn test_filter_shouldNotMutateInput() {
    let cues = common::cues(&[(10.0, 12.0, "Real line"), (100.0, 102.0, "Thank you."), (200.0, 202.0, "Another line")]);
    let snapshot = cues.clone();

    let _ = HallucinationFilter::new().filter(&cues, 0.0);

    assert_eq!(cues, snapshot);
}

#[test]
fn test_filter_withNoCues_shouldReturnEmptyResult() {
    let result = HallucinationFilter::new().filter(&[], 7200.0);
    assert!(result.cues.is_empty());
    assert!(result.removals.is_empty());
}

#[test]
fn test_filter_withCustomConfig_shouldUseThresholds() {
    let cues = common::cues(&[(10.0, 12.0, "Real line"), (30.0, 31.0, "Thank you"), (50.0, 52.0, "Another line")]);

    assert!(HallucinationFilter::new().filter(&cues, 0.0).removals.is_empty());

    let relaxed = HallucinationFilter::with_config(FilterConfig {
        isolation_gap_secs: 15.0,
        ..FilterConfig::default()
    });
    assert_eq!(relaxed.filter(&cues, 0.0).count(RemovalReason::IsolatedHallucination), 1);
}

#[test]
fn test_removal_reason_shouldDisplayAndSerializeAsSnakeCase() {
    assert_eq!(RemovalReason::IsolatedHallucination.to_string(), "isolated_hallucination");
    assert_eq!(RemovalReason::TrailingMusic.to_string(), "trailing_music");
    assert_eq!(
        serde_json::to_string(&RemovalReason::RepeatedHallucination).unwrap(),
        "\"repeated_hallucination\""
    );
}

#[test]
fn test_filter_repeatedUncasedScript_shouldRunAsEmptyText() {
    // Both texts normalize to empty, so they are identical for run detection
    let cues = common::cues(&[(10.0, 11.0, "「こんにちは」"), (30.0, 31.0, "「さようなら」"), (50.0, 51.0, "「ありがとう」")]);

    let result = HallucinationFilter::new().filter(&cues, 0.0);

    assert_eq!(result.count(RemovalReason::RepeatedHallucination), 3);
}
