use std::path::PathBuf;

use sirs_model::RunReport;

#[derive(Debug)]
pub struct RunResult {
    pub report: RunReport,
    /// Files written, in write order. Empty on a dry run.
    pub written: Vec<PathBuf>,
    pub dry_run: bool,
}
