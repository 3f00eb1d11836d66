//! Data model for the SIRS cohort pipeline.
//!
//! - [`ids`]: stay and timeline keys (the patient / admission / stay hierarchy)
//! - [`measurement`]: measurement catalogue and long-form records
//! - [`table`]: wide per-timestamp tables and SIRS flags
//! - [`summary`]: per-stay aggregates and the imputed cohort
//! - [`report`]: serializable run counts

pub mod ids;
pub mod measurement;
pub mod report;
pub mod summary;
pub mod table;

pub use ids::{CHARTTIME_FORMAT, StayKey, TimelineKey};
pub use measurement::{
    LongTable, MEASUREMENTS, MeasurementDef, MeasurementRecord, Source, column_for_code,
    compare_columns, lookup, split_source_suffix, strip_source_suffix,
};
pub use report::{RunReport, SourceCounts};
pub use summary::{
    CohortTable, ImputedCohort, ImputedStay, MAX_SIRS_COLUMN, StaySummary, mean_column_name,
};
pub use table::{AnnotatedTimeline, SIRS_THRESHOLD, SirsFlags, WideTable};
