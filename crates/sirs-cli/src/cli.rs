//! CLI argument definitions for the SIRS cohort builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sirs-cohort",
    version,
    about = "Build a per-ICU-stay SIRS cohort from MIMIC-III vitals and labs exports",
    long_about = "Build a per-ICU-stay SIRS cohort from MIMIC-III vitals and labs exports.\n\n\
                  Pivots both long-format exports, joins them on stay and chart time,\n\
                  carries values forward within each stay, evaluates the four SIRS\n\
                  criteria, aggregates per stay and fills gaps with KNN imputation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the cohort table from a vitals and a labs export.
    Run(RunArgs),

    /// List the known measurement types.
    Measurements,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Long-format vital signs export (pivoted_vital.csv).
    #[arg(value_name = "VITALS")]
    pub vitals: PathBuf,

    /// Long-format lab results export (pivoted_lab.csv).
    #[arg(value_name = "LABS")]
    pub labs: PathBuf,

    /// Cohort CSV to write, one row per ICU stay.
    #[arg(long = "output", short = 'o', value_name = "PATH", default_value = "sirs_cohort.csv")]
    pub output: PathBuf,

    /// Also write the SIRS-annotated, forward-filled timeline.
    #[arg(long = "timeline-output", value_name = "PATH")]
    pub timeline_output: Option<PathBuf>,

    /// Write stage counts as JSON.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Number of neighbours used by the imputer.
    #[arg(long = "neighbors", value_name = "K", default_value_t = 5)]
    pub neighbors: usize,

    /// How neighbour values are combined.
    #[arg(long = "weighting", value_enum, default_value = "uniform")]
    pub weighting: WeightingArg,

    /// Field delimiter of both exports.
    #[arg(long = "delimiter", value_name = "CHAR", default_value_t = ',')]
    pub delimiter: char,

    /// Measurement-type column of the vitals export (default: auto-detect).
    #[arg(long = "vitals-type-column", value_name = "NAME")]
    pub vitals_type_column: Option<String>,

    /// Measurement-type column of the labs export (default: auto-detect).
    #[arg(long = "labs-type-column", value_name = "NAME")]
    pub labs_type_column: Option<String>,

    /// Value column of both exports (default: valuenum).
    #[arg(long = "value-column", value_name = "NAME")]
    pub value_column: Option<String>,

    /// Run every stage and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WeightingArg {
    Uniform,
    Distance,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
