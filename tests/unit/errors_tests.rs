/*!
 * Tests for error types and conversions
 */

use subtrack::errors::{ConfigError, SubtitleError};

#[test]
fn test_subtitleError_invalidTimestamp_shouldDisplayInput() {
    let error = SubtitleError::InvalidTimestamp("12:34".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Invalid timestamp format"));
    assert!(display.contains("12:34"));
}

#[test]
fn test_subtitleError_invalidTimingLine_shouldDisplayLine() {
    let error = SubtitleError::InvalidTimingLine("00:00:01,000 -> 00:00:02,000".to_string());
    assert!(format!("{}", error).contains("-> 00:00:02,000"));
}

#[test]
fn test_configError_invalidValue_shouldDisplayFieldAndMessage() {
    let error = ConfigError::InvalidValue {
        field: "alignment.min_match_score".to_string(),
        message: "2 is outside 0.0..=1.0".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("alignment.min_match_score"));
    assert!(display.contains("outside"));
}

#[test]
fn test_configError_shouldConvertIntoAnyhowWithContext() {
    use anyhow::Context;

    let result: Result<(), ConfigError> = Err(ConfigError::InvalidValue {
        field: "filter.min_repeat_run".to_string(),
        message: "must be at least 2".to_string(),
    });
    let error = result.context("Configuration validation failed").unwrap_err();

    assert_eq!(error.to_string(), "Configuration validation failed");
    assert!(matches!(error.downcast_ref::<ConfigError>(), Some(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_subtitleError_shouldBeComparable() {
    assert_eq!(
        SubtitleError::InvalidTimestamp("x".to_string()),
        SubtitleError::InvalidTimestamp("x".to_string())
    );
    assert_ne!(
        SubtitleError::InvalidTimestamp("x".to_string()),
        SubtitleError::InvalidTimingLine("x".to_string())
    );
}
