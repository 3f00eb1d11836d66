//! Polars frames for the cohort and timeline outputs.

use std::fs::File;
use std::path::Path;

use polars::prelude::{Column, CsvWriter, DataFrame, NamedFrom, SerWriter, Series};

use sirs_model::{
    AnnotatedTimeline, CHARTTIME_FORMAT, ImputedCohort, MAX_SIRS_COLUMN, StayKey,
    mean_column_name,
};

use crate::error::{CohortError, Result};

pub const SUBJECT_ID: &str = "subject_id";
pub const HADM_ID: &str = "hadm_id";
pub const ICUSTAY_ID: &str = "icustay_id";
pub const CHARTTIME: &str = "charttime";
pub const SIRS_COUNT: &str = "SIRSCount";
pub const SIRS_MET: &str = "SIRSMet";

fn identifier_columns<'a>(stays: impl Iterator<Item = &'a StayKey> + Clone) -> Vec<Column> {
    vec![
        Series::new(SUBJECT_ID.into(), stays.clone().map(|s| s.subject_id).collect::<Vec<i64>>())
            .into(),
        Series::new(HADM_ID.into(), stays.clone().map(|s| s.hadm_id).collect::<Vec<i64>>()).into(),
        Series::new(ICUSTAY_ID.into(), stays.map(|s| s.icustay_id).collect::<Vec<i64>>()).into(),
    ]
}

/// One row per stay: identifiers, `mean<Column>` per measurement, then
/// `maxSIRSCount`.
pub fn cohort_frame(cohort: &ImputedCohort) -> Result<DataFrame> {
    let mut columns = identifier_columns(cohort.stays.iter().map(|s| &s.stay));
    for (idx, column) in cohort.columns.iter().enumerate() {
        let values: Vec<f64> = cohort.stays.iter().map(|s| s.means[idx]).collect();
        columns.push(Series::new(mean_column_name(column).as_str().into(), values).into());
    }
    let max_counts: Vec<u32> = cohort
        .stays
        .iter()
        .map(|s| u32::from(s.max_sirs_count))
        .collect();
    columns.push(Series::new(MAX_SIRS_COLUMN.into(), max_counts).into());
    DataFrame::new(columns).map_err(Into::into)
}

/// Forward-filled timeline with `SIRSCrit1..4`, `SIRSCount` and `SIRSMet`.
pub fn timeline_frame(timeline: &AnnotatedTimeline) -> Result<DataFrame> {
    let table = &timeline.table;
    let mut columns = identifier_columns(table.rows.keys().map(|k| &k.stay));
    let charttimes: Vec<String> = table
        .rows
        .keys()
        .map(|k| k.charttime.format(CHARTTIME_FORMAT).to_string())
        .collect();
    columns.push(Series::new(CHARTTIME.into(), charttimes).into());

    for (idx, column) in table.columns.iter().enumerate() {
        let values: Vec<Option<f64>> = table.rows.values().map(|row| row[idx]).collect();
        columns.push(Series::new(column.as_str().into(), values).into());
    }

    let flags = &timeline.flags;
    let criteria: [(&str, fn(&sirs_model::SirsFlags) -> bool); 4] = [
        ("SIRSCrit1", |f| f.temperature),
        ("SIRSCrit2", |f| f.heart_rate),
        ("SIRSCrit3", |f| f.respiratory),
        ("SIRSCrit4", |f| f.white_cells),
    ];
    for (name, criterion) in criteria {
        let values: Vec<bool> = flags.iter().map(criterion).collect();
        columns.push(Series::new(name.into(), values).into());
    }
    let counts: Vec<u32> = flags.iter().map(|f| u32::from(f.count())).collect();
    columns.push(Series::new(SIRS_COUNT.into(), counts).into());
    let met: Vec<bool> = flags.iter().map(|f| f.meets_threshold()).collect();
    columns.push(Series::new(SIRS_MET.into(), met).into());

    DataFrame::new(columns).map_err(Into::into)
}

/// Write a frame as comma-separated CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| CohortError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
