//! CSV file reading into an all-text Polars DataFrame.
//!
//! Every column is read as text so that type conversion happens in one place
//! (the loader), where failures can be reported with row and column context.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};

/// Options controlling how an export is read.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Field separator (default `,`).
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl ReadOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Validate that the file exists, is not empty and is not UTF-16.
///
/// A UTF-8 BOM is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = open(path)?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    if bytes_read >= 2 {
        // UTF-16 LE BOM
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        // UTF-16 BE BOM
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Validate DataFrame shape after loading.
///
/// A header-only file is rejected: an export with no readings cannot produce
/// a cohort.
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.height() == 0 {
        return Err(IngestError::NoDataRows {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Validate that every data row has exactly as many fields as the header.
///
/// Polars pads a short row with nulls, which would turn a truncated line into
/// an absent reading.
pub fn validate_row_widths(path: &Path, options: &ReadOptions) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(false)
        .from_path(path)
        .map_err(|e| row_scan_error(path, e))?;

    for record in reader.byte_records() {
        record.map_err(|e| row_scan_error(path, e))?;
    }
    Ok(())
}

fn row_scan_error(path: &Path, err: csv::Error) -> IngestError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => IngestError::MalformedRow {
            path: path.to_path_buf(),
            // The header is record 0.
            row: pos.map_or(0, |pos| pos.record() as usize),
            expected: expected_len as usize,
            found: len as usize,
        },
        csv::ErrorKind::Io(source) => IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        _ => IngestError::CsvParse {
            path: path.to_path_buf(),
            message,
        },
    }
}

/// Reads a CSV file into a DataFrame whose columns are all text.
pub fn read_csv_frame(path: &Path, options: &ReadOptions) -> Result<DataFrame> {
    validate_encoding(path)?;
    validate_row_widths(path, options)?;

    let separator = options.delimiter;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(move |parse| parse.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    validate_dataframe_shape(&df, path)?;
    Ok(df)
}

/// Header names paired as `(normalized, stored)`: surrounding whitespace and
/// a UTF-8 BOM removed from the first, the second as the frame stores it.
pub fn normalized_headers(df: &DataFrame) -> Vec<(String, String)> {
    df.get_column_names()
        .iter()
        .map(|name| (normalize_header(name.as_str()), name.to_string()))
        .collect()
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}
