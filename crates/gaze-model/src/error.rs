//! Errors raised while decoding sample and fixation files.

use gazefix_common::GazefixError;

/// Errors that can occur when reading or writing gaze data.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },

    #[error("missing required column `{column}` in CSV header")]
    MissingColumn { column: &'static str },

    #[error("line {line}: expected {expected} fields, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid number `{value}` in column `{column}`")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("CSV input has no header row")]
    MissingHeader,

    #[error("I/O error on line {line}: {source}")]
    Io {
        line: usize,
        source: std::io::Error,
    },
}

impl CodecError {
    /// One-based input line the error refers to, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Json { line, .. }
            | Self::ShortRow { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::Io { line, .. } => Some(*line),
            Self::MissingColumn { .. } | Self::MissingHeader => None,
        }
    }
}

impl From<CodecError> for GazefixError {
    fn from(err: CodecError) -> Self {
        let line = err.line().unwrap_or(1);
        GazefixError::parse(line, err.to_string())
    }
}
