//! Load one export into a typed long table.

use std::path::Path;

use polars::prelude::{DataFrame, DataType, StringChunked};
use tracing::debug;

use sirs_model::{LongTable, MeasurementRecord, StayKey, TimelineKey, column_for_code};

use crate::csv::{ReadOptions, normalized_headers, read_csv_frame};
use crate::error::{IngestError, Result};
use crate::parse::{ValueCell, parse_charttime, parse_identifier, parse_value};
use crate::schema::SourceSchema;

/// Read and strictly parse an export.
///
/// Any unparseable identifier, chart time, type code or value aborts the load
/// with the file, the 1-based data row and the column name.
pub fn load_long_table(
    path: &Path,
    schema: &SourceSchema,
    options: &ReadOptions,
) -> Result<LongTable> {
    let df = read_csv_frame(path, options)?;
    let headers = normalized_headers(&df);
    let columns = schema.resolve(&headers, path)?;

    let subject = text_column(&df, &columns.subject_id)?;
    let hadm = text_column(&df, &columns.hadm_id)?;
    let icustay = text_column(&df, &columns.icustay_id)?;
    let charttime = text_column(&df, &columns.charttime)?;
    let type_code = text_column(&df, &columns.type_code)?;
    let value = text_column(&df, &columns.value)?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row = idx + 1;
        let invalid = |column: &str, raw: Option<&str>, reason: &'static str| {
            IngestError::InvalidValue {
                path: path.to_path_buf(),
                row,
                column: column.to_string(),
                value: raw.unwrap_or("").to_string(),
                reason,
            }
        };
        let identifier = |chunked: &StringChunked, column: &str| -> Result<i64> {
            let raw = chunked.get(idx);
            raw.and_then(parse_identifier)
                .ok_or_else(|| invalid(column, raw, "expected an integer identifier"))
        };

        let stay = StayKey::new(
            identifier(&subject, &columns.subject_id)?,
            identifier(&hadm, &columns.hadm_id)?,
            identifier(&icustay, &columns.icustay_id)?,
        );

        let raw_time = charttime.get(idx);
        let time = raw_time
            .and_then(parse_charttime)
            .ok_or_else(|| invalid(&columns.charttime, raw_time, "expected a timestamp"))?;

        let raw_code = type_code.get(idx);
        let code = raw_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| invalid(&columns.type_code, raw_code, "missing measurement type"))?;

        let raw_value = value.get(idx);
        let reading = match raw_value.map_or(ValueCell::Absent, parse_value) {
            ValueCell::Present(number) => Some(number),
            ValueCell::Absent => None,
            ValueCell::Invalid => {
                return Err(invalid(&columns.value, raw_value, "expected a finite number"));
            }
        };

        records.push(MeasurementRecord {
            key: TimelineKey::new(stay, time),
            column: column_for_code(schema.source, code),
            value: reading,
        });
    }

    debug!(
        source = %schema.source,
        path = %path.display(),
        records = records.len(),
        "export loaded"
    );
    Ok(LongTable::new(schema.source, records))
}

fn text_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column.str()?.clone())
}
