/*!
 * Time bounds, midpoint windows and dialogue extraction for a window.
 *
 * Used to pull a representative slice of dialogue out of a subtitle file,
 * for example to sample the middle of a feature for language checks.
 */

use log::debug;

use crate::subtitle_processor::{self, Cue};

/// Decides whether a cue was injected by a subtitle distributor
pub trait AdDetector {
    /// Returns true when the raw cue text is an advertisement
    fn is_ad(&self, text: &str) -> bool;
}

/// Flags cues containing any configured signature, case-insensitively
#[derive(Debug, Clone, Default)]
pub struct SignatureAdDetector {
    signatures: Vec<String>,
}

impl SignatureAdDetector {
    /// Create a detector from a list of signature substrings
    pub fn new<S: AsRef<str>>(signatures: &[S]) -> Self {
        Self {
            signatures: signatures
                .iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

impl AdDetector for SignatureAdDetector {
    fn is_ad(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.signatures.iter().any(|sig| lowered.contains(sig.as_str()))
    }
}

/// Never flags anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdDetector;

impl AdDetector for NoAdDetector {
    fn is_ad(&self, _text: &str) -> bool {
        false
    }
}

/// Earliest start and latest end across all cues
///
/// Returns `(0.0, 0.0)` when there are no cues; callers should read an all-zero
/// result as "no timing information".
pub fn time_bounds(cues: &[Cue]) -> (f64, f64) {
    if cues.is_empty() {
        return (0.0, 0.0);
    }

    let first = cues.iter().map(|c| c.start).fold(f64::INFINITY, f64::min);
    let last = cues.iter().map(|c| c.end).fold(0.0, f64::max);
    (first, last)
}

/// Time bounds of raw SRT content
pub fn time_bounds_of_content(content: &str) -> (f64, f64) {
    time_bounds(&subtitle_processor::parse_cues(content))
}

/// Window of `2 * half_window` seconds centred on the middle of `[first, last]`
///
/// Degenerate bounds, or spans no wider than the window, are returned unchanged.
pub fn middle_window(first: f64, last: f64, half_window: f64) -> (f64, f64) {
    if last <= first {
        return (first, last);
    }
    if last - first <= 2.0 * half_window {
        return (first, last);
    }

    let mid = first + (last - first) / 2.0;
    (mid - half_window, mid + half_window)
}

/// Text of every non-advertisement cue starting within `[start, end]`
///
/// Lines of all kept cues are joined with a single newline, in cue order.
pub fn extract_text_in_range(content: &str, start: f64, end: f64, ads: &dyn AdDetector) -> String {
    text_in_range(&subtitle_processor::parse_cues(content), start, end, ads)
}

/// Same as [`extract_text_in_range`] over already parsed cues
pub fn text_in_range(cues: &[Cue], start: f64, end: f64, ads: &dyn AdDetector) -> String {
    let mut ad_count = 0;

    let lines: Vec<&str> = cues
        .iter()
        .filter(|cue| {
            let is_ad = ads.is_ad(&cue.text);
            if is_ad {
                ad_count += 1;
            }
            !is_ad
        })
        .filter(|cue| cue.start >= start && cue.start <= end)
        .flat_map(|cue| cue.lines())
        .collect();

    if ad_count > 0 {
        debug!("Ignored {} advertisement cue(s)", ad_count);
    }

    lines.join("\n")
}

/// Text of the middle window of the content
///
/// Empty when the content carries no timing information.
pub fn extract_middle_text(content: &str, half_window: f64, ads: &dyn AdDetector) -> String {
    let cues = subtitle_processor::parse_cues(content);
    let (first, last) = time_bounds(&cues);
    if first == 0.0 && last == 0.0 {
        return String::new();
    }

    let (start, end) = middle_window(first, last, half_window);
    debug!("Extracting dialogue between {:.3}s and {:.3}s", start, end);
    text_in_range(&cues, start, end, ads)
}
