use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::file_utils::FileManager;
use crate::timecode::{self, TIMING_SEPARATOR};

// @module: SRT cue model, parsing and serialization

// @const: Blank-line block boundary (whitespace-only lines count as blank)
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

// @const: UTF-8 byte order mark some rippers prepend
const BOM: char = '\u{feff}';

// @struct: Single timed subtitle cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    // @field: Sequence number (1-based)
    pub index: usize,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Text lines joined with '\n'
    pub text: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new(index: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        Cue {
            index,
            start,
            end,
            text: text.into(),
        }
    }

    /// Returns a copy of this cue with a different sequence number
    pub fn with_index(&self, index: usize) -> Self {
        Cue {
            index,
            ..self.clone()
        }
    }

    /// Returns a copy of this cue with different timings
    pub fn with_times(&self, start: f64, end: f64) -> Self {
        Cue {
            start,
            end,
            ..self.clone()
        }
    }

    /// Individual text lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Start time as an SRT timestamp
    pub fn format_start_time(&self) -> String {
        timecode::format_timestamp(self.start)
    }

    /// End time as an SRT timestamp
    pub fn format_end_time(&self) -> String {
        timecode::format_timestamp(self.end)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} {} {}", self.format_start_time(), TIMING_SEPARATOR, self.format_end_time())?;
        write!(f, "{}", self.text)
    }
}

/// Parse SRT content into cues
///
/// Parsing is best-effort: blocks without an index line, a valid timing line and
/// at least one text line are skipped. Garbage input yields an empty vector.
pub fn parse_cues(content: &str) -> Vec<Cue> {
    let normalized = content.replace("\r\n", "\n");
    let trimmed = normalized.trim_start_matches(BOM).trim();

    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cues = Vec::new();
    let mut skipped = 0;

    for block in BLOCK_SEPARATOR.split(trimmed) {
        match parse_block(block) {
            Some(cue) => cues.push(cue),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} malformed subtitle block(s), kept {}", skipped, cues.len());
    }

    cues
}

// @parses: One blank-line delimited block
fn parse_block(block: &str) -> Option<Cue> {
    let lines: Vec<&str> = block.lines().collect();
    if lines.len() < 3 {
        return None;
    }

    let index = lines[0].trim().parse::<usize>().ok()?;

    let timing = lines[1];
    if !timing.contains(TIMING_SEPARATOR) {
        return None;
    }
    let (start, end) = timecode::parse_timing_line(timing).ok()?;

    Some(Cue::new(index, start, end, lines[2..].join("\n")))
}

/// Serialize cues to SRT content
///
/// Blocks are separated by one blank line and the output ends with a newline.
pub fn serialize_cues(cues: &[Cue]) -> String {
    if cues.is_empty() {
        return String::new();
    }

    let blocks: Vec<String> = cues.iter().map(|cue| cue.to_string()).collect();
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Renumber cues sequentially starting at 1, preserving order
pub fn reindex(cues: &[Cue]) -> Vec<Cue> {
    cues.iter()
        .enumerate()
        .map(|(i, cue)| cue.with_index(i + 1))
        .collect()
}

/// Read the raw content of an SRT file
///
/// Invalid UTF-8 is decoded lossily; only the read itself can fail.
pub fn read_content<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read and parse an SRT file
pub fn read_cues<P: AsRef<Path>>(path: P) -> Result<Vec<Cue>> {
    Ok(parse_cues(&read_content(path)?))
}

/// Serialize cues and write them to an SRT file
pub fn write_cues<P: AsRef<Path>>(path: P, cues: &[Cue]) -> Result<()> {
    let path = path.as_ref();
    FileManager::write_to_file(path, &serialize_cues(cues))
        .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
}
