//! Measurement catalogue and long-form measurement records.
//!
//! The catalogue maps the codes found in the vitals and labs exports onto
//! canonical column names. Codes that are not in the catalogue still become
//! columns; they sort after every catalogue column so that column order is
//! fixed and total.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::TimelineKey;

/// Which export a measurement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Vitals,
    Labs,
}

impl Source {
    /// Short tag used in logs and to disambiguate merged column names.
    pub fn tag(self) -> &'static str {
        match self {
            Source::Vitals => "vitals",
            Source::Labs => "labs",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A known measurement type.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementDef {
    /// Canonical column name in the wide tables.
    pub column: &'static str,
    /// Human readable label.
    pub label: &'static str,
    /// Unit as recorded in the exports.
    pub unit: &'static str,
    pub source: Source,
    /// Codes that map to this column (case-insensitive).
    pub codes: &'static [&'static str],
}

impl MeasurementDef {
    pub fn matches(&self, code: &str) -> bool {
        let trimmed = code.trim();
        self.codes
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(trimmed))
    }
}

const fn def(
    source: Source,
    column: &'static str,
    label: &'static str,
    unit: &'static str,
    codes: &'static [&'static str],
) -> MeasurementDef {
    MeasurementDef {
        column,
        label,
        unit,
        source,
        codes,
    }
}

/// Catalogue in canonical column order: vitals first, then labs.
pub const MEASUREMENTS: &[MeasurementDef] = &[
    def(Source::Vitals, "HeartRate", "Heart rate", "bpm", &["HeartRate", "HR"]),
    def(Source::Vitals, "SysBP", "Systolic blood pressure", "mmHg", &["SysBP"]),
    def(Source::Vitals, "DiasBP", "Diastolic blood pressure", "mmHg", &["DiasBP"]),
    def(Source::Vitals, "MeanBP", "Mean arterial pressure", "mmHg", &["MeanBP"]),
    def(Source::Vitals, "RespRate", "Respiratory rate", "breaths/min", &["RespRate", "RR"]),
    def(Source::Vitals, "TempC", "Temperature", "degC", &["TempC", "Temperature"]),
    def(Source::Vitals, "SpO2", "Oxygen saturation", "%", &["SpO2"]),
    def(Source::Vitals, "Glucose", "Glucose (fingerstick)", "mg/dL", &["Glucose"]),
    def(Source::Labs, "AnionGap", "Anion gap", "mEq/L", &["ANION GAP", "ANIONGAP"]),
    def(Source::Labs, "Albumin", "Albumin", "g/dL", &["ALBUMIN"]),
    def(Source::Labs, "Bands", "Band neutrophils", "%", &["BANDS"]),
    def(Source::Labs, "Bicarbonate", "Bicarbonate", "mEq/L", &["BICARBONATE"]),
    def(Source::Labs, "Bilirubin", "Bilirubin", "mg/dL", &["BILIRUBIN"]),
    def(Source::Labs, "Creatinine", "Creatinine", "mg/dL", &["CREATININE"]),
    def(Source::Labs, "Chloride", "Chloride", "mEq/L", &["CHLORIDE"]),
    def(Source::Labs, "Glucose", "Glucose", "mg/dL", &["GLUCOSE"]),
    def(Source::Labs, "Hematocrit", "Hematocrit", "%", &["HEMATOCRIT"]),
    def(Source::Labs, "Hemoglobin", "Hemoglobin", "g/dL", &["HEMOGLOBIN"]),
    def(Source::Labs, "Lactate", "Lactate", "mmol/L", &["LACTATE"]),
    def(Source::Labs, "Platelet", "Platelet count", "K/uL", &["PLATELET"]),
    def(Source::Labs, "Potassium", "Potassium", "mEq/L", &["POTASSIUM"]),
    def(Source::Labs, "PTT", "Partial thromboplastin time", "sec", &["PTT"]),
    def(Source::Labs, "INR", "International normalized ratio", "ratio", &["INR"]),
    def(Source::Labs, "PT", "Prothrombin time", "sec", &["PT"]),
    def(Source::Labs, "Sodium", "Sodium", "mEq/L", &["SODIUM"]),
    def(Source::Labs, "BUN", "Blood urea nitrogen", "mg/dL", &["BUN"]),
    def(Source::Labs, "WBC", "White blood cell count", "K/uL", &["WBC"]),
    def(Source::Labs, "PaCO2", "Arterial CO2 partial pressure", "mmHg", &["PACO2", "PCO2"]),
];

/// Look up a catalogue entry by source and code.
pub fn lookup(source: Source, code: &str) -> Option<&'static MeasurementDef> {
    MEASUREMENTS
        .iter()
        .find(|def| def.source == source && def.matches(code))
}

/// Canonical column name for a source code.
///
/// Known codes resolve through the catalogue; unknown codes are trimmed and
/// inner whitespace runs become `_`.
pub fn column_for_code(source: Source, code: &str) -> String {
    if let Some(def) = lookup(source, code) {
        return def.column.to_string();
    }
    code.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Position of a column in the catalogue, honouring any merge suffix.
fn catalogue_rank(column: &str) -> Option<usize> {
    let (base, source) = split_source_suffix(column);
    MEASUREMENTS
        .iter()
        .position(|def| def.column == base && source.is_none_or(|s| s == def.source))
}

/// Split a trailing `_vitals` / `_labs` tag added when merging.
pub fn split_source_suffix(column: &str) -> (&str, Option<Source>) {
    for source in [Source::Vitals, Source::Labs] {
        if let Some(base) = column
            .strip_suffix(source.tag())
            .and_then(|rest| rest.strip_suffix('_'))
        {
            return (base, Some(source));
        }
    }
    (column, None)
}

/// Remove a trailing `_vitals` / `_labs` tag added when merging.
pub fn strip_source_suffix(column: &str) -> &str {
    split_source_suffix(column).0
}

/// Total order over measurement columns: catalogue order first, then unknown
/// columns alphabetically.
pub fn compare_columns(left: &str, right: &str) -> Ordering {
    match (catalogue_rank(left), catalogue_rank(right)) {
        (Some(a), Some(b)) => a.cmp(&b).then_with(|| left.cmp(right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.cmp(right),
    }
}

/// One raw reading from a long-form export.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub key: TimelineKey,
    /// Canonical column name (see [`column_for_code`]).
    pub column: String,
    /// `None` when the export has an empty or `NaN` value cell.
    pub value: Option<f64>,
}

/// Long-form table loaded from one export.
#[derive(Debug, Clone)]
pub struct LongTable {
    pub source: Source,
    pub records: Vec<MeasurementRecord>,
}

impl LongTable {
    pub fn new(source: Source, records: Vec<MeasurementRecord>) -> Self {
        Self { source, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
