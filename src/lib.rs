/*!
 * # subtrack - subtitle cue processing core
 *
 * A Rust library for cleaning up and resynchronizing SRT subtitles produced by
 * ripping and transcription pipelines.
 *
 * ## Features
 *
 * - Parse and serialize SRT cues (comma or dot millisecond separators)
 * - Compute time bounds and extract the dialogue of a time window, ignoring
 *   distributor advertisement cues
 * - Align a forced subtitle track onto a reference track by matching cue text
 *   and fitting a linear time transform
 * - Remove speech-to-text hallucinations (stock phrases, music placeholders,
 *   spaced-out repeats, credits noise)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: SRT timestamp codec
 * - `subtitle_processor`: Cue model, parser and serializer
 * - `text_utils`: Text normalization used for comparisons
 * - `time_range`: Bounds, midpoint windows and text extraction
 * - `alignment`: Forced subtitle alignment
 * - `hallucination`: Hallucination filter
 * - `app_config`: Configuration management
 * - `app_controller`: File-level operations used by the CLI
 * - `file_utils`: File system operations
 * - `errors`: Custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod alignment;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod hallucination;
pub mod subtitle_processor;
pub mod text_utils;
pub mod time_range;
pub mod timecode;

// Re-export main types for easier usage
pub use alignment::{AlignmentReport, CueAligner, CueMatch, TimeTransform, align_forced_subtitles};
pub use app_config::Config;
pub use errors::{ConfigError, SubtitleError};
pub use hallucination::{FilterResult, HallucinationFilter, Removal, RemovalReason, filter_subtitle_file};
pub use subtitle_processor::{Cue, parse_cues, serialize_cues};
pub use time_range::{AdDetector, NoAdDetector, SignatureAdDetector, extract_text_in_range, middle_window, text_in_range, time_bounds};
pub use timecode::{format_timestamp, parse_timestamp};
