/*!
 * Removal of transcription hallucinations.
 *
 * Speech-to-text engines tend to emit stock phrases ("thanks for watching")
 * or music notation during silence and end credits. Without confidence scores
 * to go on, cues are removed using structural heuristics:
 * - runs of identical cues spaced far apart
 * - known phrases and music cues surrounded by long silences
 * - known phrases and music cues in the final minutes of the media
 */

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::Result;
use log::{debug, info};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::app_config::FilterConfig;
use crate::subtitle_processor::{self, Cue};
use crate::text_utils::normalize_text;

/// Normalized phrases transcription engines produce out of nothing
pub static HALLUCINATION_PHRASES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "thank you",
        "thank you for watching",
        "thanks for watching",
        "please subscribe",
        "like and subscribe",
        "well be right back",
        "bye",
        "bye bye",
        "see you next time",
        "see you later",
    ]
    .into_iter()
    .collect()
});

/// Glyphs used as music placeholders
pub static MUSIC_GLYPHS: Lazy<HashSet<char>> = Lazy::new(|| ['♪', '♫', '♬', '♩', '*'].into_iter().collect());

/// Why a cue was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    IsolatedHallucination,
    RepeatedHallucination,
    MusicSymbols,
    TrailingHallucination,
    TrailingMusic,
}

impl RemovalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IsolatedHallucination => "isolated_hallucination",
            Self::RepeatedHallucination => "repeated_hallucination",
            Self::MusicSymbols => "music_symbols",
            Self::TrailingHallucination => "trailing_hallucination",
            Self::TrailingMusic => "trailing_music",
        }
    }
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A removed cue and the reason it was removed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Removal {
    pub cue: Cue,
    pub reason: RemovalReason,
}

/// Cleaned cues plus the audit log of removals
#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    /// Surviving cues, numbered 1..N
    pub cues: Vec<Cue>,
    /// Removals, first pass in file order then trailing sweep in file order
    pub removals: Vec<Removal>,
}

impl FilterResult {
    /// Number of removals for a given reason
    pub fn count(&self, reason: RemovalReason) -> usize {
        self.removals.iter().filter(|r| r.reason == reason).count()
    }
}

/// Hallucination filter over immutable phrase and glyph tables
#[derive(Debug, Clone)]
pub struct HallucinationFilter {
    config: FilterConfig,
    phrases: &'static HashSet<&'static str>,
    glyphs: &'static HashSet<char>,
}

impl Default for HallucinationFilter {
    fn default() -> Self {
        Self::with_config(FilterConfig::default())
    }
}

impl HallucinationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FilterConfig) -> Self {
        Self {
            config,
            phrases: &HALLUCINATION_PHRASES,
            glyphs: &MUSIC_GLYPHS,
        }
    }

    /// Whether normalized text is a known hallucination phrase
    pub fn is_known_phrase(&self, normalized: &str) -> bool {
        self.phrases.contains(normalized)
    }

    /// Whether the text consists solely of music glyphs (whitespace ignored)
    pub fn is_music_cue(&self, text: &str) -> bool {
        let trimmed = text.trim();
        !trimmed.is_empty()
            && trimmed
                .chars()
                .filter(|c| !c.is_whitespace())
                .all(|c| self.glyphs.contains(&c))
    }

    /// Remove hallucinated cues
    ///
    /// `duration` is the total media duration in seconds; the trailing sweep
    /// only runs for media at least twice as long as the trailing window.
    pub fn filter(&self, cues: &[Cue], duration: f64) -> FilterResult {
        let normalized: Vec<String> = cues.iter().map(|c| normalize_text(&c.text)).collect();
        let mut reasons: Vec<Option<RemovalReason>> = vec![None; cues.len()];

        self.mark_repeated_runs(cues, &normalized, &mut reasons);
        self.mark_isolated(cues, &normalized, &mut reasons);

        let mut removals: Vec<Removal> = Vec::new();
        let mut survivors: Vec<usize> = Vec::new();
        for (i, reason) in reasons.iter().enumerate() {
            match reason {
                Some(reason) => removals.push(Removal {
                    cue: cues[i].clone(),
                    reason: *reason,
                }),
                None => survivors.push(i),
            }
        }

        let survivors = self.trailing_sweep(cues, &normalized, survivors, duration, &mut removals);

        let kept: Vec<Cue> = survivors
            .iter()
            .enumerate()
            .map(|(n, &i)| cues[i].with_index(n + 1))
            .collect();

        debug!("Hallucination filter kept {} of {} cue(s)", kept.len(), cues.len());

        FilterResult {
            cues: kept,
            removals,
        }
    }

    // @marks: Maximal runs of identical cues with large gaps between them
    fn mark_repeated_runs(&self, cues: &[Cue], normalized: &[String], reasons: &mut [Option<RemovalReason>]) {
        let mut i = 0;
        while i < cues.len() {
            let mut j = i;
            while j + 1 < cues.len()
                && normalized[j + 1] == normalized[i]
                && cues[j + 1].start - cues[j].end > self.config.repeat_gap_secs
            {
                j += 1;
            }

            if j - i + 1 >= self.config.min_repeat_run {
                for reason in reasons.iter_mut().take(j + 1).skip(i) {
                    *reason = Some(RemovalReason::RepeatedHallucination);
                }
                i = j + 1;
            } else {
                i += 1;
            }
        }
    }

    // @marks: Phrase and music cues with long silences on both sides
    fn mark_isolated(&self, cues: &[Cue], normalized: &[String], reasons: &mut [Option<RemovalReason>]) {
        let remaining: Vec<usize> = (0..cues.len()).filter(|&i| reasons[i].is_none()).collect();

        let mut isolated = Vec::new();
        for (pos, &i) in remaining.iter().enumerate() {
            let cue = &cues[i];
            let gap_before = match pos.checked_sub(1) {
                Some(prev) => cue.start - cues[remaining[prev]].end,
                None => cue.start,
            };
            let gap_after = match remaining.get(pos + 1) {
                Some(&next) => cues[next].start - cue.end,
                None => f64::INFINITY,
            };

            if gap_before < self.config.isolation_gap_secs || gap_after < self.config.isolation_gap_secs {
                continue;
            }

            if self.is_known_phrase(&normalized[i]) {
                isolated.push((i, RemovalReason::IsolatedHallucination));
            } else if self.is_music_cue(&cues[i].text) {
                isolated.push((i, RemovalReason::MusicSymbols));
            }
        }

        for (i, reason) in isolated {
            reasons[i] = Some(reason);
        }
    }

    // @removes: Phrase and music cues inside the trailing window
    fn trailing_sweep(
        &self,
        cues: &[Cue],
        normalized: &[String],
        survivors: Vec<usize>,
        duration: f64,
        removals: &mut Vec<Removal>,
    ) -> Vec<usize> {
        let window = self.config.trailing_window_secs;
        if duration < 2.0 * window || survivors.is_empty() {
            return survivors;
        }

        let threshold = duration - window;
        survivors
            .into_iter()
            .filter(|&i| {
                let cue = &cues[i];
                if cue.start < threshold {
                    return true;
                }

                let reason = if self.is_known_phrase(&normalized[i]) {
                    RemovalReason::TrailingHallucination
                } else if self.is_music_cue(&cue.text) {
                    RemovalReason::TrailingMusic
                } else {
                    return true;
                };

                removals.push(Removal {
                    cue: cue.clone(),
                    reason,
                });
                false
            })
            .collect()
    }
}

/// Filter a subtitle file and write the cleaned cues
pub fn filter_subtitle_file<P1: AsRef<Path>, P2: AsRef<Path>>(
    input_path: P1,
    output_path: P2,
    duration: f64,
    config: &FilterConfig,
) -> Result<FilterResult> {
    let cues = subtitle_processor::read_cues(&input_path)?;
    let result = HallucinationFilter::with_config(config.clone()).filter(&cues, duration);

    subtitle_processor::write_cues(&output_path, &result.cues)?;

    if result.removals.is_empty() {
        info!("No hallucinations found in {} cue(s)", cues.len());
    } else {
        let summary: Vec<String> = [
            RemovalReason::RepeatedHallucination,
            RemovalReason::IsolatedHallucination,
            RemovalReason::MusicSymbols,
            RemovalReason::TrailingHallucination,
            RemovalReason::TrailingMusic,
        ]
        .iter()
        .filter_map(|&reason| match result.count(reason) {
            0 => None,
            n => Some(format!("{}={}", reason, n)),
        })
        .collect();

        info!(
            "Removed {} hallucinated cue(s), {} remaining ({})",
            result.removals.len(),
            result.cues.len(),
            summary.join(", ")
        );
    }

    Ok(result)
}
