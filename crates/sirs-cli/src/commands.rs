use anyhow::{Result, bail};
use comfy_table::Table;
use tracing::{info, info_span};

use sirs_cli::pipeline::{OutputPaths, PipelineOptions, run_pipeline, write_outputs};
use sirs_cohort::{KnnImputer, Weighting};
use sirs_ingest::ReadOptions;
use sirs_model::MEASUREMENTS;

use crate::cli::{RunArgs, WeightingArg};
use crate::summary::apply_table_style;
use crate::types::RunResult;

pub fn run_measurements() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Column", "Source", "Description", "Unit", "Codes"]);
    apply_table_style(&mut table);
    for def in MEASUREMENTS {
        table.add_row(vec![
            def.column.to_string(),
            def.source.to_string(),
            def.label.to_string(),
            def.unit.to_string(),
            def.codes.join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_cohort(args: &RunArgs) -> Result<RunResult> {
    let run_span = info_span!(
        "run",
        vitals = %args.vitals.display(),
        labs = %args.labs.display()
    );
    let _run_guard = run_span.enter();

    let options = pipeline_options(args)?;
    let output = run_pipeline(&args.vitals, &args.labs, &options)?;

    if args.dry_run {
        info!("dry run, no files written");
        return Ok(RunResult {
            report: output.report,
            written: Vec::new(),
            dry_run: true,
        });
    }

    let paths = OutputPaths {
        cohort: args.output.clone(),
        timeline: args.timeline_output.clone(),
        report_json: args.report_json.clone(),
    };
    write_outputs(&output, &paths)?;
    let mut written = vec![paths.cohort];
    written.extend(paths.timeline);
    written.extend(paths.report_json);

    Ok(RunResult {
        report: output.report,
        written,
        dry_run: false,
    })
}

fn pipeline_options(args: &RunArgs) -> Result<PipelineOptions> {
    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{}'", args.delimiter);
    }
    let mut options = PipelineOptions {
        read: ReadOptions::default().with_delimiter(args.delimiter as u8),
        imputer: KnnImputer::new(args.neighbors).with_weighting(match args.weighting {
            WeightingArg::Uniform => Weighting::Uniform,
            WeightingArg::Distance => Weighting::Distance,
        }),
        ..PipelineOptions::default()
    };
    if let Some(name) = &args.vitals_type_column {
        options.vitals_schema = options.vitals_schema.with_type_column(name.as_str());
    }
    if let Some(name) = &args.labs_type_column {
        options.labs_schema = options.labs_schema.with_type_column(name.as_str());
    }
    if let Some(name) = &args.value_column {
        options.vitals_schema = options.vitals_schema.with_value_column(name.as_str());
        options.labs_schema = options.labs_schema.with_value_column(name.as_str());
    }
    Ok(options)
}
