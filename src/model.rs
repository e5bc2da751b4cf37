// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the issue, cycle-time, grouping and report types shared by computation and rendering
// role: model/types
// outputs: Plain data structs with serde derives; no behavior beyond small accessors
// invariants:
// - CycleTimeResult owns exactly one Issue (1:1 with the input list)
// - cycle_days is Some only when both timestamps exist and done_at >= in_progress_at
// - Group.members index into Report.per_issue; stats derive from those members only
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
  pub from_status: String,
  pub to_status: String,
  pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
  pub key: String,
  pub summary: String,
  pub status: String,
  #[serde(default)]
  pub labels: BTreeSet<String>,
  #[serde(default)]
  pub components: BTreeSet<String>,
  #[serde(default)]
  pub transitions: Vec<StatusTransition>,
}

/// Why an issue has no cycle time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
  NoTransitions,
  MissingInProgress,
  MissingDone,
  DoneBeforeInProgress,
}

impl DataQuality {
  pub fn note(self) -> &'static str {
    match self {
      DataQuality::NoTransitions => "no status transitions",
      DataQuality::MissingInProgress => "never entered an in-progress status",
      DataQuality::MissingDone => "never entered a done status",
      DataQuality::DoneBeforeInProgress => "done before in progress",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleTimeResult {
  pub issue: Issue,
  pub in_progress_at: Option<DateTime<Utc>>,
  pub done_at: Option<DateTime<Utc>>,
  pub cycle_days: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub quality: Option<DataQuality>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
  pub count: usize,
  pub with_cycle_time: usize,
  /// Mean of present cycle days, rounded half-up to one decimal.
  pub average: Option<f64>,
  pub min: Option<i64>,
  pub max: Option<i64>,
  pub total: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
  Component,
  Label,
}

impl Dimension {
  pub fn title(self) -> &'static str {
    match self {
      Dimension::Component => "Component",
      Dimension::Label => "Label",
    }
  }

  pub fn plural(self) -> &'static str {
    match self {
      Dimension::Component => "Components",
      Dimension::Label => "Labels",
    }
  }

  pub fn keys(self, issue: &Issue) -> &BTreeSet<String> {
    match self {
      Dimension::Component => &issue.components,
      Dimension::Label => &issue.labels,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
  pub key: String,
  /// Indexes into `Report::per_issue`.
  pub members: Vec<usize>,
  pub stats: SummaryStats,
}

impl Group {
  pub fn results<'a>(&'a self, all: &'a [CycleTimeResult]) -> impl Iterator<Item = &'a CycleTimeResult> + 'a {
    self.members.iter().filter_map(move |&i| all.get(i))
  }
}

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
  pub project: String,
  pub team: String,
  pub labels: Vec<String>,
  pub range: DateRange,
  pub in_progress_statuses: Vec<String>,
  pub done_statuses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
  pub criteria: SearchCriteria,
  pub per_issue: Vec<CycleTimeResult>,
  pub overall: SummaryStats,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub component_groups: Option<Vec<Group>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label_groups: Option<Vec<Group>>,
}

impl Report {
  /// Grouping dimensions present in this report, components first.
  pub fn dimensions(&self) -> Vec<(Dimension, &[Group])> {
    let mut out = Vec::new();
    if let Some(g) = &self.component_groups {
      out.push((Dimension::Component, g.as_slice()));
    }
    if let Some(g) = &self.label_groups {
      out.push((Dimension::Label, g.as_slice()));
    }
    out
  }
}
