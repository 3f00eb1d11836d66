//! SIRS criteria evaluation.
//!
//! An absent operand makes its comparison false: a patient with no recorded
//! value is assumed not to meet that criterion. Missingness is never
//! propagated into the flags or the count.

use sirs_model::{AnnotatedTimeline, SirsFlags, WideTable, strip_source_suffix};

pub const TEMPERATURE: &str = "TempC";
pub const HEART_RATE: &str = "HeartRate";
pub const RESP_RATE: &str = "RespRate";
pub const PACO2: &str = "PaCO2";
pub const WBC: &str = "WBC";
pub const BANDS: &str = "Bands";

/// Thresholds of the four SIRS criteria.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SirsRules {
    /// Crit1: temperature above this (degC).
    pub temperature_high: f64,
    /// Crit1: temperature below this (degC).
    pub temperature_low: f64,
    /// Crit2: heart rate above this (beats/min).
    pub heart_rate_high: f64,
    /// Crit3: respiratory rate above this (breaths/min).
    pub resp_rate_high: f64,
    /// Crit3: PaCO2 below this (mmHg).
    pub paco2_low: f64,
    /// Crit4: WBC below this (10^3/mm^3).
    pub wbc_low: f64,
    /// Crit4: WBC above this (10^3/mm^3).
    pub wbc_high: f64,
    /// Crit4: band neutrophils above this (%).
    pub bands_high: f64,
}

impl Default for SirsRules {
    fn default() -> Self {
        Self {
            temperature_high: 38.0,
            temperature_low: 36.0,
            heart_rate_high: 90.0,
            resp_rate_high: 20.0,
            paco2_low: 32.0,
            wbc_low: 4.0,
            wbc_high: 12.0,
            bands_high: 10.0,
        }
    }
}

/// Operands of one row, each possibly absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SirsInputs {
    pub temperature: Option<f64>,
    pub heart_rate: Option<f64>,
    pub resp_rate: Option<f64>,
    pub paco2: Option<f64>,
    pub wbc: Option<f64>,
    pub bands: Option<f64>,
}

fn above(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

fn below(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v < threshold)
}

impl SirsRules {
    pub fn evaluate(&self, inputs: &SirsInputs) -> SirsFlags {
        SirsFlags {
            temperature: above(inputs.temperature, self.temperature_high)
                || below(inputs.temperature, self.temperature_low),
            heart_rate: above(inputs.heart_rate, self.heart_rate_high),
            respiratory: above(inputs.resp_rate, self.resp_rate_high)
                || below(inputs.paco2, self.paco2_low),
            white_cells: below(inputs.wbc, self.wbc_low)
                || above(inputs.wbc, self.wbc_high)
                || above(inputs.bands, self.bands_high),
        }
    }

    /// Evaluate every row of a (forward-filled) timeline.
    pub fn annotate(&self, table: WideTable) -> AnnotatedTimeline {
        let columns = OperandColumns::resolve(&table);
        let flags = table
            .rows
            .values()
            .map(|values| self.evaluate(&columns.inputs(values)))
            .collect();
        AnnotatedTimeline { table, flags }
    }
}

/// Column positions of the criteria operands in a given table.
#[derive(Debug, Clone, Copy, Default)]
struct OperandColumns {
    temperature: Option<usize>,
    heart_rate: Option<usize>,
    resp_rate: Option<usize>,
    paco2: Option<usize>,
    wbc: Option<usize>,
    bands: Option<usize>,
}

impl OperandColumns {
    fn resolve(table: &WideTable) -> Self {
        let find = |name: &str| {
            table.column_index(name).or_else(|| {
                table
                    .columns
                    .iter()
                    .position(|column| strip_source_suffix(column) == name)
            })
        };
        Self {
            temperature: find(TEMPERATURE),
            heart_rate: find(HEART_RATE),
            resp_rate: find(RESP_RATE),
            paco2: find(PACO2),
            wbc: find(WBC),
            bands: find(BANDS),
        }
    }

    fn inputs(&self, values: &[Option<f64>]) -> SirsInputs {
        let get = |idx: Option<usize>| idx.and_then(|i| values[i]);
        SirsInputs {
            temperature: get(self.temperature),
            heart_rate: get(self.heart_rate),
            resp_rate: get(self.resp_rate),
            paco2: get(self.paco2),
            wbc: get(self.wbc),
            bands: get(self.bands),
        }
    }
}
