//! Error types shared across gazefix crates.

use std::path::PathBuf;

/// Top-level error type for gazefix operations.
#[derive(Debug, thiserror::Error)]
pub enum GazefixError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using GazefixError.
pub type GazefixResult<T> = Result<T, GazefixError>;

impl GazefixError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output {
            message: msg.into(),
        }
    }

    /// Whether this error was raised while validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = GazefixError::config("min_points_per_fixation must be at least 1");
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "Configuration error: min_points_per_fixation must be at least 1"
        );
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = GazefixError::parse(7, "missing column");
        assert_eq!(err.to_string(), "Parse error on line 7: missing column");
        assert!(!err.is_config());
    }
}
