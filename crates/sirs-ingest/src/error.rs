//! Error types for loading the measurement exports.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an export.
///
/// Every variant except [`IngestError::FileRead`] and
/// [`IngestError::DataFrame`] describes malformed input; see
/// [`IngestError::is_malformed_input`].
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File starts with a byte order mark we cannot decode.
    #[error("unsupported encoding {encoding} in {path} (expected UTF-8)")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file is empty.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// A data row does not have as many fields as the header.
    #[error("malformed row in {path} at data row {row}: expected {expected} fields, found {found}")]
    MalformedRow {
        path: PathBuf,
        /// 1-based data row (the header is not counted).
        row: usize,
        expected: usize,
        found: usize,
    },

    /// CSV file has a header but no data rows.
    #[error("CSV file has no data rows: {path}")]
    NoDataRows { path: PathBuf },

    // === Schema Errors ===
    /// Required column not found in the header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// A cell could not be parsed into its expected type.
    #[error("invalid {column} value '{value}' in {path} at data row {row}: {reason}")]
    InvalidValue {
        path: PathBuf,
        /// 1-based data row (the header is not counted).
        row: usize,
        column: String,
        value: String,
        reason: &'static str,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// True when the input file itself is at fault and must be fixed before
    /// re-running.
    pub fn is_malformed_input(&self) -> bool {
        !matches!(
            self,
            IngestError::FileRead { .. } | IngestError::DataFrame { .. }
        )
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::InvalidValue {
            path: PathBuf::from("vitals.csv"),
            row: 3,
            column: "icustay_id".to_string(),
            value: "abc".to_string(),
            reason: "expected an integer identifier",
        };
        assert_eq!(
            err.to_string(),
            "invalid icustay_id value 'abc' in vitals.csv at data row 3: expected an integer identifier"
        );
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_malformed_row_display() {
        let err = IngestError::MalformedRow {
            path: PathBuf::from("labs.csv"),
            row: 2,
            expected: 6,
            found: 5,
        };
        assert_eq!(
            err.to_string(),
            "malformed row in labs.csv at data row 2: expected 6 fields, found 5"
        );
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
        assert!(!ingest_err.is_malformed_input());
    }
}
