//! Error handling for the harness
//!
//! Infrastructure errors (bad configuration, layout mismatches, file I/O)
//! and test failures (assert/expect-level checks) share one enum so that a
//! test function can propagate either with `?`.

use std::path::Path;
use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Main error type for harness operations
#[derive(Error, Debug)]
pub enum HarnessError {
    // Setup Errors
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Channel layout error: {reason}")]
    ChannelLayout { reason: String },

    #[error("Size error: {reason}")]
    Size { reason: String },

    #[error("Index error: {reason}")]
    Index { reason: String },

    #[error("Unsupported: {reason}")]
    Unsupported { reason: String },

    #[error("Invalid state: {reason}")]
    State { reason: String },

    // Test Failures
    #[error("{message}")]
    AssertionFailed { message: String },

    #[error("{} expectation(s) failed", .messages.len())]
    ExpectationsFailed { messages: Vec<String> },

    // Wav Errors
    #[error("Failed to read wav file {path}: {source}")]
    WavRead {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Failed to write wav file {path}: {source}")]
    WavWrite {
        path: String,
        #[source]
        source: hound::Error,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HarnessError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        HarnessError::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn channel_layout(reason: impl Into<String>) -> Self {
        HarnessError::ChannelLayout {
            reason: reason.into(),
        }
    }

    pub(crate) fn size(reason: impl Into<String>) -> Self {
        HarnessError::Size {
            reason: reason.into(),
        }
    }

    pub(crate) fn index(reason: impl Into<String>) -> Self {
        HarnessError::Index {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        HarnessError::Unsupported {
            reason: reason.into(),
        }
    }

    pub(crate) fn state(reason: impl Into<String>) -> Self {
        HarnessError::State {
            reason: reason.into(),
        }
    }

    pub(crate) fn wav_read(path: &Path, source: hound::Error) -> Self {
        HarnessError::WavRead {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn wav_write(path: &Path, source: hound::Error) -> Self {
        HarnessError::WavWrite {
            path: path.display().to_string(),
            source,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            HarnessError::Configuration { .. } => "CONFIGURATION_ERROR",
            HarnessError::ChannelLayout { .. } => "CHANNEL_LAYOUT_ERROR",
            HarnessError::Size { .. } => "SIZE_ERROR",
            HarnessError::Index { .. } => "INDEX_ERROR",
            HarnessError::Unsupported { .. } => "UNSUPPORTED_ERROR",
            HarnessError::State { .. } => "STATE_ERROR",
            HarnessError::AssertionFailed { .. } => "ASSERTION_FAILED",
            HarnessError::ExpectationsFailed { .. } => "EXPECTATIONS_FAILED",
            HarnessError::WavRead { .. } => "WAV_READ_ERROR",
            HarnessError::WavWrite { .. } => "WAV_WRITE_ERROR",
            HarnessError::Io(_) => "IO_ERROR",
            HarnessError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is a failed check rather than a broken test setup
    pub fn is_test_failure(&self) -> bool {
        matches!(
            self,
            HarnessError::AssertionFailed { .. } | HarnessError::ExpectationsFailed { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            HarnessError::Configuration { .. } => vec![
                "Check sample rate, block size, duration and channel counts",
                "Make sure an input signal is configured before running",
            ],
            HarnessError::ChannelLayout { .. } => vec![
                "Use matching input and output channel counts",
                "Use a mono input to broadcast into several output channels",
            ],
            HarnessError::Size { .. } | HarnessError::Index { .. } => {
                vec!["Check the duration, block size and frame ranges"]
            }
            HarnessError::Unsupported { .. } => vec![
                "Attach envelopes only to automatable parameters",
                "Render wav-backed signals at the file's own sample rate",
            ],
            HarnessError::State { .. } => vec!["Attach envelopes before preparing the effect"],
            HarnessError::WavRead { .. } => vec![
                "Check the data root path (--data-root-path)",
                "Run the generators to create missing reference files",
            ],
            HarnessError::WavWrite { .. } | HarnessError::Io(_) => {
                vec!["Check the output directory exists and is writable"]
            }
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            HarnessError::size("zero duration").error_code(),
            "SIZE_ERROR"
        );
        assert_eq!(
            HarnessError::channel_layout("2 -> 3").error_code(),
            "CHANNEL_LAYOUT_ERROR"
        );
    }

    #[test]
    fn test_failure_classification() {
        let assertion = HarnessError::AssertionFailed {
            message: "peak too high".to_string(),
        };
        assert!(assertion.is_test_failure());
        assert!(!HarnessError::state("envelope attached after prepare").is_test_failure());
    }

    #[test]
    fn test_expectation_summary_message() {
        let err = HarnessError::ExpectationsFailed {
            messages: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "2 expectation(s) failed");
    }

    #[test]
    fn test_assertion_displays_message_verbatim() {
        let err = HarnessError::AssertionFailed {
            message: "Condition: PeaksBelow (-3.00 dB)".to_string(),
        };
        assert_eq!(err.to_string(), "Condition: PeaksBelow (-3.00 dB)");
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = HarnessError::unsupported("envelope for param 7");
        assert!(!err.recovery_suggestions().is_empty());
    }
}
