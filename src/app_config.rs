use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Forced-subtitle alignment settings
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Hallucination filter settings
    #[serde(default)]
    pub filter: FilterConfig,

    /// Time-window text extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for matching forced cues against a reference track
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AlignmentConfig {
    /// Minimum similarity score for a pairing to be accepted (0.0 to 1.0)
    #[serde(default = "default_min_match_score")]
    pub min_match_score: f64,

    /// Once a first match exists, reference cues further away than this
    /// (in seconds, comparing raw start times) are not considered
    #[serde(default = "default_max_time_distance_secs")]
    pub max_time_distance_secs: f64,

    /// Minimum word overlap ratio for a partial match
    #[serde(default = "default_min_word_overlap")]
    pub min_word_overlap: f64,

    /// Weight applied to the word overlap ratio to produce a score
    #[serde(default = "default_word_overlap_weight")]
    pub word_overlap_weight: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            min_match_score: default_min_match_score(),
            max_time_distance_secs: default_max_time_distance_secs(),
            min_word_overlap: default_min_word_overlap(),
            word_overlap_weight: default_word_overlap_weight(),
        }
    }
}

/// Settings for removing transcription hallucinations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FilterConfig {
    /// Silence (in seconds) required on both sides of an isolated cue
    #[serde(default = "default_isolation_gap_secs")]
    pub isolation_gap_secs: f64,

    /// Gap (in seconds) that consecutive repeats must exceed to form a run
    #[serde(default = "default_repeat_gap_secs")]
    pub repeat_gap_secs: f64,

    /// Minimum number of repeats for a run to be removed
    #[serde(default = "default_min_repeat_run")]
    pub min_repeat_run: usize,

    /// Length (in seconds) of the end-of-media window swept for credits noise
    #[serde(default = "default_trailing_window_secs")]
    pub trailing_window_secs: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            isolation_gap_secs: default_isolation_gap_secs(),
            repeat_gap_secs: default_repeat_gap_secs(),
            min_repeat_run: default_min_repeat_run(),
            trailing_window_secs: default_trailing_window_secs(),
        }
    }
}

/// Settings for extracting dialogue text from a time window
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Half width (in seconds) of the window taken around the midpoint
    #[serde(default = "default_half_window_secs")]
    pub half_window_secs: f64,

    /// Case-insensitive substrings identifying distributor advertisement cues
    #[serde(default = "default_ad_signatures")]
    pub ad_signatures: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            half_window_secs: default_half_window_secs(),
            ad_signatures: default_ad_signatures(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_min_match_score() -> f64 {
    0.4
}

fn default_max_time_distance_secs() -> f64 {
    60.0
}

fn default_min_word_overlap() -> f64 {
    0.6
}

fn default_word_overlap_weight() -> f64 {
    0.7
}

fn default_isolation_gap_secs() -> f64 {
    30.0
}

fn default_repeat_gap_secs() -> f64 {
    10.0
}

fn default_min_repeat_run() -> usize {
    3
}

fn default_trailing_window_secs() -> f64 {
    300.0 // credits tail
}

fn default_half_window_secs() -> f64 {
    300.0
}

fn default_ad_signatures() -> Vec<String> {
    [
        "opensubtitles",
        "advertise your product or brand here",
        "support us and become vip member",
        "subtitles by explosiveskull",
        "www.addic7ed.com",
        "subscene",
        "yts.mx",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when the
    /// file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.alignment;
        check_unit("alignment.min_match_score", a.min_match_score)?;
        check_unit("alignment.min_word_overlap", a.min_word_overlap)?;
        check_unit("alignment.word_overlap_weight", a.word_overlap_weight)?;
        check_non_negative("alignment.max_time_distance_secs", a.max_time_distance_secs)?;

        let f = &self.filter;
        check_non_negative("filter.isolation_gap_secs", f.isolation_gap_secs)?;
        check_non_negative("filter.repeat_gap_secs", f.repeat_gap_secs)?;
        check_non_negative("filter.trailing_window_secs", f.trailing_window_secs)?;
        if f.min_repeat_run < 2 {
            return Err(invalid("filter.min_repeat_run", "must be at least 2"));
        }

        check_non_negative("extraction.half_window_secs", self.extraction.half_window_secs)?;

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, &format!("{} is outside 0.0..=1.0", value)));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, &format!("{} must be a non-negative number", value)));
    }
    Ok(())
}
