use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::alignment::{self, AlignmentReport};
use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::hallucination::{self, Removal};
use crate::subtitle_processor;
use crate::time_range::{self, SignatureAdDetector};

// @module: Application controller for subtitle operations

/// Serializable summary of a hallucination filter run
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub duration_secs: f64,
    pub remaining_cues: usize,
    pub removals: Vec<Removal>,
}

/// Time window requested for text extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtractionWindow {
    /// Explicit inclusive range in seconds
    Range { start: f64, end: f64 },
    /// Window around the midpoint, using the configured half width
    Middle,
}

// @struct: Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @creates: Controller with validated configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Align a forced subtitle file onto a reference subtitle file
    pub fn align(&self, reference: &Path, forced: &Path, output: &Path) -> Result<AlignmentReport> {
        ensure_input(reference)?;
        ensure_input(forced)?;

        info!("Aligning {:?} onto {:?}", forced, reference);
        alignment::align_forced_subtitles(reference, forced, output, &self.config.alignment)
            .context("Forced subtitle alignment failed")
    }

    /// Remove hallucinations from a subtitle file, optionally writing a JSON report
    pub fn filter(&self, input: &Path, output: &Path, duration_secs: f64, report_path: Option<&Path>) -> Result<FilterReport> {
        ensure_input(input)?;
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(anyhow!("Invalid media duration: {}", duration_secs));
        }

        let result = hallucination::filter_subtitle_file(input, output, duration_secs, &self.config.filter)
            .context("Hallucination filtering failed")?;

        for removal in &result.removals {
            debug!(
                "Removed cue {} at {} ({}): {:?}",
                removal.cue.index,
                removal.cue.format_start_time(),
                removal.reason,
                removal.cue.text
            );
        }

        let report = FilterReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            duration_secs,
            remaining_cues: result.cues.len(),
            removals: result.removals,
        };

        if let Some(path) = report_path {
            FileManager::write_json(path, &report)
                .with_context(|| format!("Failed to write filter report: {:?}", path))?;
            info!("Filter report written to {:?}", path);
        }

        Ok(report)
    }

    /// Extract the dialogue text of a time window
    pub fn extract(&self, input: &Path, window: ExtractionWindow) -> Result<String> {
        ensure_input(input)?;

        let content = subtitle_processor::read_content(input)?;
        let ads = SignatureAdDetector::new(&self.config.extraction.ad_signatures);

        let text = match window {
            ExtractionWindow::Range { start, end } => {
                time_range::extract_text_in_range(&content, start, end, &ads)
            }
            ExtractionWindow::Middle => {
                time_range::extract_middle_text(&content, self.config.extraction.half_window_secs, &ads)
            }
        };

        if text.is_empty() {
            info!("No dialogue found in the requested window");
        }

        Ok(text)
    }

    /// Overall time bounds of a subtitle file, `None` when it has no timed cues
    pub fn bounds(&self, input: &Path) -> Result<Option<(f64, f64)>> {
        ensure_input(input)?;

        let cues = subtitle_processor::read_cues(input)?;
        if cues.is_empty() {
            return Ok(None);
        }
        Ok(Some(time_range::time_bounds(&cues)))
    }
}

fn ensure_input(path: &Path) -> Result<()> {
    if !FileManager::file_exists(path) {
        return Err(anyhow!("Input file does not exist: {:?}", path));
    }
    Ok(())
}
