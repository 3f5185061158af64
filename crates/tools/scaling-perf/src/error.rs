//! Error types for the scaling analysis pipeline.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PerfError>;

/// Errors that can occur while loading trials or writing reports.
///
/// A missing sequential baseline and a zero mean time are not errors: both
/// degrade to missing metric values instead.
#[derive(Debug)]
pub enum PerfError {
    /// The raw trial CSV does not exist.
    InputNotFound {
        /// Path that was opened.
        path: PathBuf,
    },
    /// The raw trial CSV is missing a column or holds an unparseable value.
    InputMalformed {
        /// Name of the source (usually the file path).
        source: String,
        /// 1-based line number, if the problem is tied to a row.
        line: Option<u64>,
        /// Description of the problem.
        message: String,
    },
    /// I/O error with context.
    Io {
        /// What was being done.
        context: String,
        /// Underlying error.
        source: io::Error,
    },
    /// CSV encoding failed while writing a report.
    Csv {
        /// What was being done.
        context: String,
        /// Message from the CSV writer.
        message: String,
    },
    /// JSON encoding failed.
    Serialization {
        /// Message from the serializer.
        message: String,
    },
    /// The plotting backend failed to draw or encode a chart.
    Render {
        /// Image being produced.
        path: PathBuf,
        /// Message from the backend.
        message: String,
    },
}

impl PerfError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn malformed(source: &str, line: Option<u64>, message: impl Into<String>) -> Self {
        Self::InputMalformed {
            source: source.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Returns `true` if the error was caused by the input file rather than
    /// by writing outputs.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InputNotFound { .. } | Self::InputMalformed { .. })
    }
}

impl fmt::Display for PerfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound { path } => {
                write!(f, "input file not found: {}", path.display())
            }
            Self::InputMalformed {
                source,
                line: Some(line),
                message,
            } => write!(f, "malformed input {source}, line {line}: {message}"),
            Self::InputMalformed {
                source,
                line: None,
                message,
            } => write!(f, "malformed input {source}: {message}"),
            Self::Io { context, source } => write!(f, "I/O error while {context}: {source}"),
            Self::Csv { context, message } => write!(f, "CSV error while {context}: {message}"),
            Self::Serialization { message } => write!(f, "serialization error: {message}"),
            Self::Render { path, message } => {
                write!(f, "failed to render {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for PerfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for PerfError {
    fn from(e: io::Error) -> Self {
        Self::io("accessing the file system", e)
    }
}
