//! CSV output: one headed table per section, sections separated by a blank line.
//!
//! Group breakdowns are flattened to one row per (group, issue) so a spreadsheet
//! can pivot on the group column.

use anyhow::{Context, Result};

use super::{
  average, criteria_rows, days, group_issue_cells, issue_cells, rank_headers, rank_rows, stats_rows, Renderer,
  GROUP_ISSUE_HEADERS, ISSUE_HEADERS, NO_ISSUES,
};
use crate::model::{Dimension, Group, Report};
use crate::util::DisplayTz;

pub struct CsvRenderer {
  pub tz: DisplayTz,
}

impl Renderer for CsvRenderer {
  fn render(&self, report: &Report) -> Result<String> {
    let mut sections: Vec<String> = Vec::new();

    sections.push(section(
      &["Field", "Value"],
      criteria_rows(&report.criteria, &self.tz)
        .into_iter()
        .map(|(k, v)| vec![k.to_string(), v]),
    )?);

    sections.push(section(
      &["Metric", "Value"],
      stats_rows(&report.overall)
        .into_iter()
        .map(|(k, v)| vec![k.to_string(), v]),
    )?);

    if report.per_issue.is_empty() {
      sections.push(section(&["Result"], std::iter::once(vec![NO_ISSUES.to_string()]))?);
    } else {
      sections.push(section(
        &ISSUE_HEADERS,
        report.per_issue.iter().map(|r| issue_cells(r, &self.tz).to_vec()),
      )?);
    }

    for (dim, groups) in report.dimensions() {
      sections.push(section(&rank_headers(dim), rank_rows(groups).into_iter().map(|r| r.to_vec()))?);
      sections.push(breakdown(report, dim, groups)?);
    }

    Ok(sections.join("\n"))
  }
}

fn breakdown(report: &Report, dim: Dimension, groups: &[Group]) -> Result<String> {
  let mut headers: Vec<&str> = vec![
    dim.title(),
    "Tickets",
    "With Cycle Time",
    "Average (days)",
    "Min (days)",
    "Max (days)",
  ];
  headers.extend(GROUP_ISSUE_HEADERS);

  let rows = groups.iter().flat_map(|g| {
    let stats = [
      g.key.clone(),
      g.stats.count.to_string(),
      g.stats.with_cycle_time.to_string(),
      average(g.stats.average),
      days(g.stats.min),
      days(g.stats.max),
    ];
    g.results(&report.per_issue).map(move |r| {
      let mut row = stats.to_vec();
      row.extend(group_issue_cells(r));
      row
    })
  });

  section(&headers, rows)
}

fn section<I>(headers: &[&str], rows: I) -> Result<String>
where
  I: IntoIterator<Item = Vec<String>>,
{
  let mut w = ::csv::Writer::from_writer(Vec::new());
  w.write_record(headers).context("writing csv header")?;
  for row in rows {
    w.write_record(&row).context("writing csv row")?;
  }
  let bytes = w
    .into_inner()
    .map_err(|e| anyhow::anyhow!("flushing csv writer: {}", e.error()))?;
  String::from_utf8(bytes).context("csv output was not utf-8")
}
