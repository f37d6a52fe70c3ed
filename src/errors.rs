/*!
 * Error types for the subtrack library.
 *
 * This module contains custom error types for the different parts of the library,
 * using the thiserror crate for ergonomic error definitions. Application-level
 * failures travel as `anyhow::Error` with context attached. Malformed subtitle
 * content is never an error at the file level; these types only surface for
 * individual values and for configuration problems.
 */

use thiserror::Error;

/// Errors that can occur while decoding subtitle values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// A timestamp did not have the `HH:MM:SS,mmm` shape
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    /// A timing line had no `-->` separator
    #[error("Invalid timing line: {0}")]
    InvalidTimingLine(String),
}

/// Errors raised when a configuration value is out of range
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A threshold or ratio outside of its valid range
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },
}
