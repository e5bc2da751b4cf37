use tracing::info;

use crate::cycle;
use crate::grouping::group_by;
use crate::model::{Dimension, Issue, Report, SearchCriteria};
use crate::render::OutputFormat;
use crate::status::StatusSets;
use crate::util::DisplayTz;

/// Validated options for one report run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
  pub format: OutputFormat,
  pub component_analysis: bool,
  pub label_analysis: bool,
  pub statuses: StatusSets,
  pub tz: DisplayTz,
}

impl Default for ReportConfig {
  fn default() -> Self {
    Self {
      format: OutputFormat::Console,
      component_analysis: false,
      label_analysis: false,
      statuses: StatusSets::default(),
      tz: DisplayTz::Utc,
    }
  }
}

/// Run the pipeline up to (not including) rendering.
pub fn build_report(criteria: SearchCriteria, issues: Vec<Issue>, cfg: &ReportConfig) -> Report {
  let (per_issue, overall) = cycle::compute(issues, &cfg.statuses);

  info!(
    issues = overall.count,
    with_cycle_time = overall.with_cycle_time,
    "computed cycle times"
  );

  let component_groups = cfg
    .component_analysis
    .then(|| group_by(&per_issue, Dimension::Component));
  let label_groups = cfg.label_analysis.then(|| group_by(&per_issue, Dimension::Label));

  Report {
    criteria,
    per_issue,
    overall,
    component_groups,
    label_groups,
  }
}

/// Build and render in one step.
pub fn generate(criteria: SearchCriteria, issues: Vec<Issue>, cfg: &ReportConfig) -> anyhow::Result<String> {
  let report = build_report(criteria, issues, cfg);
  cfg.format.renderer(cfg.tz.clone()).render(&report)
}
