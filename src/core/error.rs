// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Internal error types for mpsio.
//!
//! Errors fall into two tiers:
//! - **File level** (`Io`, `Header`, `Aborted`): the whole read is unusable.
//! - **Row level** (`Row`): a single row or line could not be converted.
//!
//! The public reader entry points never surface these; they map every
//! file-level error to an empty record sequence. Row-level errors are
//! handled according to the active [`RowPolicy`](crate::RowPolicy).

use thiserror::Error;

/// Errors that can occur while reading an artifact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadError {
    /// The underlying stream could not be read or decompressed
    #[error("I/O error in {context}: {message}")]
    Io {
        /// What was being read
        context: String,
        /// Error message
        message: String,
    },

    /// The header row does not carry the columns an artifact requires
    #[error("Unrecognized header for {artifact}: missing columns [{}]", .missing.join(", "))]
    Header {
        /// Artifact being read (e.g. "eye_gaze")
        artifact: String,
        /// Required columns that were not found
        missing: Vec<String>,
    },

    /// A single row or line failed validation
    #[error("Invalid row at line {line}{}: {reason}", .column.as_ref().map(|c| format!(" (column '{c}')")).unwrap_or_default())]
    Row {
        /// 1-based line number in the decoded stream
        line: u64,
        /// Offending column, when known
        column: Option<String>,
        /// Why the row was rejected
        reason: String,
    },

    /// A strict read stopped on its first invalid row
    #[error("Read aborted at line {line}: {cause}")]
    Aborted {
        /// Line of the row that triggered the abort
        line: u64,
        /// Description of the row error
        cause: String,
    },
}

impl ReadError {
    /// Create an I/O error.
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        ReadError::Io {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a header error listing the missing columns.
    pub fn header<S: AsRef<str>>(artifact: impl Into<String>, missing: &[S]) -> Self {
        ReadError::Header {
            artifact: artifact.into(),
            missing: missing.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    /// Create a row error not tied to a particular column.
    pub fn row(line: u64, reason: impl Into<String>) -> Self {
        ReadError::Row {
            line,
            column: None,
            reason: reason.into(),
        }
    }

    /// Create a row error for a specific column.
    pub fn field(line: u64, column: impl Into<String>, reason: impl Into<String>) -> Self {
        ReadError::Row {
            line,
            column: Some(column.into()),
            reason: reason.into(),
        }
    }

    /// Escalate a row error into a file-level abort.
    ///
    /// File-level errors are returned unchanged.
    pub fn into_abort(self) -> Self {
        match self {
            ReadError::Row { line, .. } => {
                let cause = self.to_string();
                ReadError::Aborted { line, cause }
            }
            other => other,
        }
    }

    /// Whether this error concerns a single row rather than the whole file.
    pub fn is_row_level(&self) -> bool {
        matches!(self, ReadError::Row { .. })
    }

    /// Short name of the error variant, for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ReadError::Io { .. } => "io",
            ReadError::Header { .. } => "header",
            ReadError::Row { .. } => "row",
            ReadError::Aborted { .. } => "aborted",
        }
    }
}

impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        ReadError::Io {
            context: "stream".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for ReadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(e) => ReadError::io("csv stream", e.to_string()),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => ReadError::row(
                line,
                format!("expected {expected_len} fields, found {len}"),
            ),
            csv::ErrorKind::Utf8 { err, .. } => ReadError::row(line, format!("invalid UTF-8: {err}")),
            other => ReadError::row(line, format!("{other:?}")),
        }
    }
}

/// Result type for mpsio operations.
pub type Result<T> = std::result::Result<T, ReadError>;
