/*!
 * SRT timestamp codec.
 *
 * Converts between the `HH:MM:SS,mmm` clock notation and a number of seconds.
 * A dot is accepted in place of the comma on read; the comma is always emitted.
 */

use crate::errors::SubtitleError;

/// Separator between the start and end timestamps of a timing line
pub const TIMING_SEPARATOR: &str = "-->";

/// Parse an SRT timestamp (`HH:MM:SS,mmm` or `HH:MM:SS.mmm`) into seconds
pub fn parse_timestamp(timestamp: &str) -> Result<f64, SubtitleError> {
    let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());
    let normalized = timestamp.trim().replace('.', ",");

    let groups: Vec<&str> = normalized.split(',').collect();
    if groups.len() != 2 {
        return Err(invalid());
    }

    let clock: Vec<&str> = groups[0].split(':').collect();
    if clock.len() != 3 {
        return Err(invalid());
    }

    let field = |s: &str| parse_field(s).ok_or_else(invalid);
    let hours = field(clock[0])?;
    let minutes = field(clock[1])?;
    let seconds = field(clock[2])?;
    let millis = field(groups[1])?;

    let whole_seconds = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or_else(invalid)?;

    Ok(whole_seconds as f64 + millis as f64 / 1000.0)
}

// @parses: Unsigned decimal field, ASCII digits only (no sign or inner spaces)
fn parse_field(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Format seconds as a canonical SRT timestamp (HH:MM:SS,mmm)
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse a `start --> end` timing line into a pair of seconds
pub fn parse_timing_line(line: &str) -> Result<(f64, f64), SubtitleError> {
    let (start, end) = line
        .split_once(TIMING_SEPARATOR)
        .ok_or_else(|| SubtitleError::InvalidTimingLine(line.to_string()))?;

    Ok((parse_timestamp(start)?, parse_timestamp(end)?))
}
