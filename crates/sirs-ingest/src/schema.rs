//! Required-column resolution for the two exports.

use std::path::Path;

use sirs_model::Source;

use crate::error::{IngestError, Result};

pub const SUBJECT_ID: &str = "subject_id";
pub const HADM_ID: &str = "hadm_id";
pub const ICUSTAY_ID: &str = "icustay_id";
pub const CHARTTIME: &str = "charttime";
pub const VALUENUM: &str = "valuenum";

const VITALS_TYPE_CANDIDATES: &[&str] = &["vitalid", "vital", "label", "itemid"];
const LABS_TYPE_CANDIDATES: &[&str] = &["label", "labid", "itemid"];

/// Which columns of an export carry the measurement type and value.
#[derive(Debug, Clone)]
pub struct SourceSchema {
    pub source: Source,
    /// Candidate names for the measurement-type column, tried in order.
    pub type_columns: Vec<String>,
    pub value_column: String,
}

impl SourceSchema {
    /// Default schema for a source.
    pub fn for_source(source: Source) -> Self {
        let candidates = match source {
            Source::Vitals => VITALS_TYPE_CANDIDATES,
            Source::Labs => LABS_TYPE_CANDIDATES,
        };
        Self {
            source,
            type_columns: candidates.iter().map(|name| (*name).to_string()).collect(),
            value_column: VALUENUM.to_string(),
        }
    }

    /// Use exactly one measurement-type column.
    #[must_use]
    pub fn with_type_column(mut self, name: impl Into<String>) -> Self {
        self.type_columns = vec![name.into()];
        self
    }

    #[must_use]
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    /// Resolve the required columns against a header row.
    ///
    /// `headers` pairs each normalized header with the column name as stored
    /// in the frame. Matching is case-insensitive.
    pub fn resolve(&self, headers: &[(String, String)], path: &Path) -> Result<ResolvedColumns> {
        let find = |wanted: &str| -> Result<String> {
            lookup(headers, wanted).ok_or_else(|| IngestError::MissingColumn {
                column: wanted.to_string(),
                path: path.to_path_buf(),
            })
        };

        let type_code = self
            .type_columns
            .iter()
            .find_map(|candidate| lookup(headers, candidate))
            .ok_or_else(|| IngestError::MissingColumn {
                column: self.type_columns.join(" | "),
                path: path.to_path_buf(),
            })?;

        Ok(ResolvedColumns {
            subject_id: find(SUBJECT_ID)?,
            hadm_id: find(HADM_ID)?,
            icustay_id: find(ICUSTAY_ID)?,
            charttime: find(CHARTTIME)?,
            type_code,
            value: find(&self.value_column)?,
        })
    }
}

fn lookup(headers: &[(String, String)], wanted: &str) -> Option<String> {
    headers
        .iter()
        .find(|(normalized, _)| normalized.eq_ignore_ascii_case(wanted))
        .map(|(_, actual)| actual.clone())
}

/// Actual frame column names for each required field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub subject_id: String,
    pub hadm_id: String,
    pub icustay_id: String,
    pub charttime: String,
    pub type_code: String,
    pub value: String,
}
