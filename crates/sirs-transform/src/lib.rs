//! Timeline construction for the SIRS cohort.
//!
//! Stages, each producing a new table from the previous one:
//! - **Dedup/pivot**: average duplicate readings, spread to one row per timestamp
//! - **Merge**: full outer join of the vitals and labs timelines
//! - **Fill**: last value carried forward within each ICU stay
//! - **Criteria**: SIRS flags, count and threshold per row
//!
//! # Example
//!
//! ```ignore
//! use sirs_transform::{SirsRules, dedupe_and_pivot, forward_fill, outer_join};
//!
//! let vitals = dedupe_and_pivot(&vitals_long).table;
//! let labs = dedupe_and_pivot(&labs_long).table;
//! let merged = outer_join(&vitals, Source::Vitals, &labs, Source::Labs);
//! let timeline = SirsRules::default().annotate(forward_fill(&merged));
//! ```

mod criteria;
mod fill;
mod merge;
mod pivot;

pub use criteria::{
    BANDS, HEART_RATE, PACO2, RESP_RATE, SirsInputs, SirsRules, TEMPERATURE, WBC,
};
pub use fill::forward_fill;
pub use merge::outer_join;
pub use pivot::{DedupeOutcome, PivotOutcome, dedupe_and_pivot, dedupe_readings, pivot};
