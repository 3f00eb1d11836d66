//! Cohort pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Load**: read and strictly parse the vitals and labs exports
//! 2. **Timeline**: dedupe/pivot each export, outer join, forward fill
//! 3. **Criteria**: evaluate the four SIRS criteria per timeline row
//! 4. **Cohort**: aggregate per stay, impute absent means
//! 5. **Output**: write the cohort CSV and optional timeline / report
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use sirs_cohort::{KnnImputer, build_cohort, cohort_frame, summarize_stays, timeline_frame, write_csv};
use sirs_ingest::{ReadOptions, SourceSchema, load_long_table};
use sirs_model::{
    AnnotatedTimeline, ImputedCohort, LongTable, RunReport, Source, SourceCounts, WideTable,
};
use sirs_transform::{SirsRules, dedupe_and_pivot, forward_fill, outer_join};

/// Everything a run can be configured with.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub vitals_schema: SourceSchema,
    pub labs_schema: SourceSchema,
    pub read: ReadOptions,
    pub rules: SirsRules,
    pub imputer: KnnImputer,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            vitals_schema: SourceSchema::for_source(Source::Vitals),
            labs_schema: SourceSchema::for_source(Source::Labs),
            read: ReadOptions::default(),
            rules: SirsRules::default(),
            imputer: KnnImputer::default(),
        }
    }
}

// ============================================================================
// Load
// ============================================================================

#[derive(Debug)]
pub struct LoadResult {
    pub vitals: LongTable,
    pub labs: LongTable,
}

pub fn load(vitals_path: &Path, labs_path: &Path, options: &PipelineOptions) -> Result<LoadResult> {
    let vitals = load_long_table(vitals_path, &options.vitals_schema, &options.read)
        .with_context(|| format!("load vitals export {}", vitals_path.display()))?;
    let labs = load_long_table(labs_path, &options.labs_schema, &options.read)
        .with_context(|| format!("load labs export {}", labs_path.display()))?;
    Ok(LoadResult { vitals, labs })
}

// ============================================================================
// Timeline
// ============================================================================

#[derive(Debug)]
pub struct TimelineResult {
    /// Joined and forward-filled, not yet annotated.
    pub table: WideTable,
    pub vitals: SourceCounts,
    pub labs: SourceCounts,
}

fn pivot_source(long: &LongTable) -> (WideTable, SourceCounts) {
    let outcome = dedupe_and_pivot(long);
    let counts = SourceCounts {
        source: Some(long.source),
        records: long.len(),
        duplicates_collapsed: outcome.duplicates_collapsed,
        wide_rows: outcome.table.height(),
        columns: outcome.table.width(),
    };
    (outcome.table, counts)
}

pub fn build_timeline(loaded: &LoadResult) -> TimelineResult {
    let (vitals_wide, vitals) = pivot_source(&loaded.vitals);
    let (labs_wide, labs) = pivot_source(&loaded.labs);
    let merged = outer_join(&vitals_wide, Source::Vitals, &labs_wide, Source::Labs);
    let table = forward_fill(&merged);
    TimelineResult {
        table,
        vitals,
        labs,
    }
}

// ============================================================================
// Cohort
// ============================================================================

#[derive(Debug)]
pub struct CohortResult {
    pub cohort: ImputedCohort,
    /// Absent per-stay means before imputation.
    pub empty_aggregates: usize,
    pub stays_meeting_threshold: usize,
}

pub fn build_imputed_cohort(
    timeline: &AnnotatedTimeline,
    imputer: &KnnImputer,
) -> Result<CohortResult> {
    let summaries = summarize_stays(timeline).context("aggregate stays")?;
    let empty_aggregates = summaries.absent_cells();
    let stays_meeting_threshold = summaries.stays_meeting_threshold();
    let cohort = build_cohort(&summaries, imputer).context("impute cohort aggregates")?;
    Ok(CohortResult {
        cohort,
        empty_aggregates,
        stays_meeting_threshold,
    })
}

// ============================================================================
// Full run
// ============================================================================

#[derive(Debug)]
pub struct PipelineOutput {
    pub timeline: AnnotatedTimeline,
    pub cohort: ImputedCohort,
    pub report: RunReport,
}

/// Run stages 1 to 4 in memory.
pub fn run_pipeline(
    vitals_path: &Path,
    labs_path: &Path,
    options: &PipelineOptions,
) -> Result<PipelineOutput> {
    let load_span = info_span!("load");
    let start = Instant::now();
    let loaded = load_span.in_scope(|| load(vitals_path, labs_path, options))?;
    info!(
        vitals_records = loaded.vitals.len(),
        labs_records = loaded.labs.len(),
        duration_ms = start.elapsed().as_millis(),
        "load complete"
    );

    let timeline_span = info_span!("timeline");
    let start = Instant::now();
    let TimelineResult {
        table,
        vitals,
        labs,
    } = timeline_span.in_scope(|| build_timeline(&loaded));
    info!(
        rows = table.height(),
        stays = table.stay_count(),
        columns = table.width(),
        duplicates_collapsed = vitals.duplicates_collapsed + labs.duplicates_collapsed,
        duration_ms = start.elapsed().as_millis(),
        "timeline complete"
    );

    let criteria_span = info_span!("criteria");
    let start = Instant::now();
    let timeline = criteria_span.in_scope(|| options.rules.annotate(table));
    let rows_meeting_threshold = timeline.rows_meeting_threshold();
    info!(
        rows_meeting_threshold,
        duration_ms = start.elapsed().as_millis(),
        "criteria complete"
    );

    let cohort_span = info_span!("cohort", neighbors = options.imputer.neighbors);
    let start = Instant::now();
    let CohortResult {
        cohort,
        empty_aggregates,
        stays_meeting_threshold,
    } = cohort_span.in_scope(|| build_imputed_cohort(&timeline, &options.imputer))?;
    info!(
        stays = cohort.stays.len(),
        empty_aggregates,
        imputed_cells = cohort.imputed_cells,
        duration_ms = start.elapsed().as_millis(),
        "cohort complete"
    );

    let report = RunReport {
        vitals,
        labs,
        timeline_rows: timeline.table.height(),
        stays: cohort.stays.len(),
        measurement_columns: cohort.columns.len(),
        rows_meeting_threshold,
        stays_meeting_threshold,
        empty_aggregates,
        imputed_cells: cohort.imputed_cells,
    };
    Ok(PipelineOutput {
        timeline,
        cohort,
        report,
    })
}

// ============================================================================
// Output
// ============================================================================

/// Where the output stage writes. Only `cohort` is mandatory.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub cohort: PathBuf,
    pub timeline: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
}

pub fn write_outputs(output: &PipelineOutput, paths: &OutputPaths) -> Result<()> {
    let output_span = info_span!("output");
    let _guard = output_span.enter();
    let start = Instant::now();

    let mut df = cohort_frame(&output.cohort).context("build cohort frame")?;
    write_csv(&mut df, &paths.cohort).context("write cohort csv")?;
    debug!(path = %paths.cohort.display(), rows = df.height(), "wrote cohort");

    if let Some(path) = &paths.timeline {
        let mut df = timeline_frame(&output.timeline).context("build timeline frame")?;
        write_csv(&mut df, path).context("write timeline csv")?;
        debug!(path = %path.display(), rows = df.height(), "wrote timeline");
    }

    if let Some(path) = &paths.report_json {
        let json = serde_json::to_string_pretty(&output.report).context("serialize run report")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        debug!(path = %path.display(), "wrote run report");
    }

    info!(duration_ms = start.elapsed().as_millis(), "output complete");
    Ok(())
}
