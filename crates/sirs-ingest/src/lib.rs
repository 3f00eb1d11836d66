//! Loading of the ICU vitals and labs exports.
//!
//! Each export is a long-format CSV with one reading per row:
//! `subject_id, hadm_id, icustay_id, charttime, <type>, valuenum`.
//! Files are read with Polars as text and then parsed strictly into
//! [`sirs_model::LongTable`]s; malformed input fails the load instead of
//! being dropped.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use sirs_ingest::{ReadOptions, SourceSchema, load_long_table};
//! use sirs_model::Source;
//!
//! let schema = SourceSchema::for_source(Source::Vitals);
//! let vitals = load_long_table(Path::new("vitals.csv"), &schema, &ReadOptions::default())?;
//! ```

mod csv;
mod error;
mod loader;
mod parse;
mod schema;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{ReadOptions, normalized_headers, read_csv_frame};

// === Loading ===
pub use loader::load_long_table;
pub use parse::{ValueCell, parse_charttime, parse_identifier, parse_value};
pub use schema::{
    CHARTTIME, HADM_ID, ICUSTAY_ID, ResolvedColumns, SUBJECT_ID, SourceSchema, VALUENUM,
};
