/*!
 * Forced-subtitle alignment.
 *
 * Forced tracks often come from a different release than the main dialogue
 * track, so their timestamps cannot be trusted. Cues are paired with reference
 * cues by text similarity, and a linear transform fitted on the first and last
 * pairs is applied to every forced cue.
 */

use std::path::Path;

use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;

use crate::app_config::AlignmentConfig;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{self, Cue};
use crate::text_utils::{normalize_text, words};

/// Linear mapping `t_new = scale * t_old + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeTransform {
    pub scale: f64,
    pub offset: f64,
}

impl Default for TimeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl TimeTransform {
    /// Transform that leaves timings untouched
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// Fit through two (forced, reference) time pairs
    ///
    /// When both forced times are equal the scale falls back to 1 and only
    /// the offset is derived.
    pub fn from_points(forced1: f64, reference1: f64, forced2: f64, reference2: f64) -> Self {
        if forced2 == forced1 {
            return Self {
                scale: 1.0,
                offset: reference1 - forced1,
            };
        }

        let scale = (reference2 - reference1) / (forced2 - forced1);
        Self {
            scale,
            offset: reference1 - scale * forced1,
        }
    }

    /// Fit on the first and last accepted matches; `None` with fewer than two
    pub fn from_matches(matches: &[CueMatch]) -> Option<Self> {
        if matches.len() < 2 {
            return None;
        }

        let first = &matches[0];
        let last = &matches[matches.len() - 1];
        Some(Self::from_points(
            first.forced.start,
            first.reference.start,
            last.forced.start,
            last.reference.start,
        ))
    }

    /// Map a single time
    pub fn apply_time(&self, t: f64) -> f64 {
        self.scale * t + self.offset
    }

    /// Map the start and end of every cue; output is numbered 1..N
    pub fn apply(&self, cues: &[Cue]) -> Vec<Cue> {
        cues.iter()
            .enumerate()
            .map(|(i, cue)| {
                cue.with_times(self.apply_time(cue.start), self.apply_time(cue.end))
                    .with_index(i + 1)
            })
            .collect()
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset == 0.0
    }
}

/// A forced cue paired with the reference cue it was matched to
#[derive(Debug, Clone, PartialEq)]
pub struct CueMatch {
    pub reference: Cue,
    pub forced: Cue,
    /// Similarity that won the selection
    pub score: f64,
}

/// Result of aligning a forced file onto a reference file
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    /// Number of accepted matches
    pub match_count: usize,
    /// Transform applied (identity when alignment was skipped)
    pub transform: TimeTransform,
    /// Whether a transform was fitted and applied
    pub aligned: bool,
    /// Number of cues written to the output
    pub cue_count: usize,
}

/// Matches forced cues against reference cues by text
#[derive(Debug, Clone, Default)]
pub struct CueAligner {
    config: AlignmentConfig,
}

impl CueAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AlignmentConfig) -> Self {
        Self { config }
    }

    /// Similarity between two normalized texts, 0.0 when unrelated
    pub fn similarity(&self, forced: &str, reference: &str) -> f64 {
        if forced.is_empty() || reference.is_empty() {
            return 0.0;
        }
        if forced == reference {
            return 1.0;
        }
        if reference.contains(forced) {
            return 0.9;
        }
        if forced.contains(reference) {
            return 0.8;
        }

        let forced_words = words(forced);
        let reference_words = words(reference);
        let shared = forced_words
            .iter()
            .filter(|w| reference_words.contains(w))
            .count();

        let overlap = shared as f64 / forced_words.len().min(reference_words.len()) as f64;
        if overlap >= self.config.min_word_overlap {
            overlap * self.config.word_overlap_weight
        } else {
            0.0
        }
    }

    /// Pair each forced cue with its best reference cue
    ///
    /// After the first accepted match, only reference cues whose start lies
    /// within `max_time_distance_secs` of the forced cue's start are scored.
    pub fn find_matches(&self, reference: &[Cue], forced: &[Cue]) -> Vec<CueMatch> {
        let reference_norm: Vec<String> = reference.iter().map(|c| normalize_text(&c.text)).collect();
        let mut matches: Vec<CueMatch> = Vec::new();

        for forced_cue in forced {
            let forced_norm = normalize_text(&forced_cue.text);
            if forced_norm.is_empty() {
                continue;
            }

            let mut best: Option<(usize, f64)> = None;
            for (i, ref_cue) in reference.iter().enumerate() {
                if !matches.is_empty()
                    && (forced_cue.start - ref_cue.start).abs() > self.config.max_time_distance_secs
                {
                    continue;
                }

                let score = self.similarity(&forced_norm, &reference_norm[i]);
                if score > best.map_or(0.0, |(_, s)| s) {
                    best = Some((i, score));
                }
            }

            match best {
                Some((i, score)) if score >= self.config.min_match_score => {
                    debug!(
                        "Forced cue {} matched reference cue {} (score {:.2})",
                        forced_cue.index, reference[i].index, score
                    );
                    matches.push(CueMatch {
                        reference: reference[i].clone(),
                        forced: forced_cue.clone(),
                        score,
                    });
                }
                _ => debug!("Forced cue {} has no match", forced_cue.index),
            }
        }

        matches
    }

    /// Align forced cues in memory
    ///
    /// Returns the matches and, when at least two were found, the fitted
    /// transform with the transformed cues.
    pub fn align(&self, reference: &[Cue], forced: &[Cue]) -> (Vec<CueMatch>, Option<(TimeTransform, Vec<Cue>)>) {
        let matches = self.find_matches(reference, forced);
        let fitted = TimeTransform::from_matches(&matches).map(|t| (t, t.apply(forced)));
        (matches, fitted)
    }
}

/// Align a forced subtitle file onto a reference file and write the result
///
/// With fewer than two matches the forced file is copied through unchanged and
/// the identity transform is reported.
pub fn align_forced_subtitles<P1, P2, P3>(
    reference_path: P1,
    forced_path: P2,
    output_path: P3,
    config: &AlignmentConfig,
) -> Result<AlignmentReport>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
    P3: AsRef<Path>,
{
    let reference = subtitle_processor::read_cues(&reference_path)?;
    let forced = subtitle_processor::read_cues(&forced_path)?;

    let aligner = CueAligner::with_config(config.clone());
    let (matches, fitted) = aligner.align(&reference, &forced);
    let match_count = matches.len();

    let report = match fitted {
        Some((transform, aligned)) => {
            subtitle_processor::write_cues(&output_path, &aligned)?;
            info!(
                "Aligned {} forced cue(s) using {} match(es): scale={:.6}, offset={:.3}s",
                aligned.len(),
                match_count,
                transform.scale,
                transform.offset
            );
            AlignmentReport {
                match_count,
                transform,
                aligned: true,
                cue_count: aligned.len(),
            }
        }
        None => {
            warn!(
                "Only {} match(es) between forced and reference subtitles, copying forced file unchanged",
                match_count
            );
            FileManager::copy_file(&forced_path, &output_path)?;
            AlignmentReport {
                match_count,
                transform: TimeTransform::identity(),
                aligned: false,
                cue_count: forced.len(),
            }
        }
    };

    Ok(report)
}
