// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Select a renderer by OutputFormat and share the cell formatting every renderer uses
// role: rendering/dispatch
// inputs: Immutable Report; DisplayTz for timestamps
// outputs: One String per render call
// invariants:
// - Every number and absent marker is produced here, so all formats print identical figures
// - Renderers borrow the Report and never mutate it; rendering twice yields identical bytes
// - Section order: criteria, summary, issues, then per dimension ranking and breakdown
// errors: Only CSV writer failures, surfaced as anyhow errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{CycleTimeResult, Dimension, Group, SearchCriteria, SummaryStats};
use crate::util::{format_instant, DisplayTz};

pub mod confluence;
pub mod console;
pub mod csv;
pub mod html;
pub mod markdown;

pub const TITLE: &str = "Cycle Time Report";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_ISSUES: &str = "No matching issues found.";
pub const EMPTY_SET: &str = "-";

pub const ISSUE_HEADERS: [&str; 9] = [
  "Key",
  "Summary",
  "Status",
  "Labels",
  "Components",
  "In Progress",
  "Done",
  "Cycle Time (days)",
  "Note",
];

pub const GROUP_ISSUE_HEADERS: [&str; 5] = ["Key", "Summary", "Status", "Cycle Time (days)", "Note"];

pub trait Renderer {
  fn render(&self, report: &crate::model::Report) -> Result<String>;
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
  Console,
  Markdown,
  Html,
  Confluence,
  Csv,
}

impl OutputFormat {
  pub const ALL: [OutputFormat; 5] = [
    OutputFormat::Console,
    OutputFormat::Markdown,
    OutputFormat::Html,
    OutputFormat::Confluence,
    OutputFormat::Csv,
  ];

  pub fn renderer(self, tz: DisplayTz) -> Box<dyn Renderer> {
    match self {
      OutputFormat::Console => Box::new(console::ConsoleRenderer { tz }),
      OutputFormat::Markdown => Box::new(markdown::MarkdownRenderer { tz }),
      OutputFormat::Html => Box::new(html::HtmlRenderer { tz }),
      OutputFormat::Confluence => Box::new(confluence::ConfluenceRenderer { tz }),
      OutputFormat::Csv => Box::new(csv::CsvRenderer { tz }),
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      OutputFormat::Console => "console",
      OutputFormat::Markdown => "markdown",
      OutputFormat::Html => "html",
      OutputFormat::Confluence => "confluence",
      OutputFormat::Csv => "csv",
    }
  }
}

impl fmt::Display for OutputFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for OutputFormat {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_ascii_lowercase();
    OutputFormat::ALL
      .into_iter()
      .find(|f| f.name() == wanted)
      .ok_or_else(|| ConfigError::UnknownFormat(s.to_string()))
  }
}

// --- shared cell formatting ---

pub fn days(v: Option<i64>) -> String {
  v.map(|d| d.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn average(v: Option<f64>) -> String {
  v.map(|a| format!("{a:.1}")).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn instant(v: Option<DateTime<Utc>>, tz: &DisplayTz) -> String {
  v.map(|at| format_instant(at, tz))
    .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn join_set(set: &BTreeSet<String>) -> String {
  if set.is_empty() {
    EMPTY_SET.to_string()
  } else {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
  }
}

/// Criteria echo as (label, value) pairs in display order.
pub fn criteria_rows(c: &SearchCriteria, tz: &DisplayTz) -> Vec<(&'static str, String)> {
  let labels = if c.labels.is_empty() {
    "(any)".to_string()
  } else {
    c.labels.join(", ")
  };
  vec![
    ("Project", c.project.clone()),
    ("Delivery Team", c.team.clone()),
    ("Labels", labels),
    (
      "Date Range",
      format!("{} to {}", c.range.start.format("%Y-%m-%d"), c.range.end.format("%Y-%m-%d")),
    ),
    ("In Progress Statuses", c.in_progress_statuses.join(", ")),
    ("Done Statuses", c.done_statuses.join(", ")),
    ("Timezone", tz.label()),
  ]
}

/// Summary figures as (label, value) pairs in display order.
pub fn stats_rows(s: &SummaryStats) -> Vec<(&'static str, String)> {
  vec![
    ("Total Issues", s.count.to_string()),
    ("Issues With Cycle Time", s.with_cycle_time.to_string()),
    ("Average Cycle Time (days)", average(s.average)),
    ("Min Cycle Time (days)", days(s.min)),
    ("Max Cycle Time (days)", days(s.max)),
    ("Total Cycle Time (days)", days(s.total)),
  ]
}

pub fn issue_cells(r: &CycleTimeResult, tz: &DisplayTz) -> [String; 9] {
  [
    r.issue.key.clone(),
    r.issue.summary.clone(),
    r.issue.status.clone(),
    join_set(&r.issue.labels),
    join_set(&r.issue.components),
    instant(r.in_progress_at, tz),
    instant(r.done_at, tz),
    days(r.cycle_days),
    note(r),
  ]
}

pub fn group_issue_cells(r: &CycleTimeResult) -> [String; 5] {
  [
    r.issue.key.clone(),
    r.issue.summary.clone(),
    r.issue.status.clone(),
    days(r.cycle_days),
    note(r),
  ]
}

pub fn note(r: &CycleTimeResult) -> String {
  r.quality.map(|q| q.note().to_string()).unwrap_or_default()
}

pub fn rank_headers(dim: Dimension) -> [&'static str; 7] {
  [
    "Rank",
    dim.title(),
    "Tickets",
    "With Cycle Time",
    "Average (days)",
    "Min (days)",
    "Max (days)",
  ]
}

/// One row per ranked group (groups without an average are left out).
pub fn rank_rows(groups: &[Group]) -> Vec<[String; 7]> {
  crate::grouping::ranked(groups)
    .into_iter()
    .enumerate()
    .map(|(i, g)| {
      [
        (i + 1).to_string(),
        g.key.clone(),
        g.stats.count.to_string(),
        g.stats.with_cycle_time.to_string(),
        average(g.stats.average),
        days(g.stats.min),
        days(g.stats.max),
      ]
    })
    .collect()
}

pub fn ranking_title(dim: Dimension) -> String {
  format!("{} Ranking", dim.title())
}

pub fn breakdown_title(dim: Dimension) -> String {
  format!("{} Breakdown", dim.title())
}

pub fn no_groups(dim: Dimension) -> String {
  format!("No {} found.", dim.plural().to_lowercase())
}

pub fn no_ranked_groups(dim: Dimension) -> String {
  format!("No {} with cycle time data.", dim.plural().to_lowercase())
}
