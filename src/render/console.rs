//! Plain-text terminal layout: labelled lines, aligned ranking tables, per-issue blocks.

use std::fmt::Write as _;

use anyhow::Result;

use super::{
  breakdown_title, criteria_rows, group_issue_cells, issue_cells, no_groups, no_ranked_groups, rank_headers,
  rank_rows, ranking_title, stats_rows, Renderer, GROUP_ISSUE_HEADERS, ISSUE_HEADERS, NO_ISSUES, TITLE,
};
use crate::model::{Dimension, Group, Report};
use crate::util::DisplayTz;

pub struct ConsoleRenderer {
  pub tz: DisplayTz,
}

impl Renderer for ConsoleRenderer {
  fn render(&self, report: &Report) -> Result<String> {
    let mut out = String::new();

    heading(&mut out, TITLE, '=');
    for (label, value) in criteria_rows(&report.criteria, &self.tz) {
      writeln!(out, "{label}: {value}")?;
    }
    out.push('\n');

    heading(&mut out, "Summary", '-');
    for (label, value) in stats_rows(&report.overall) {
      writeln!(out, "{label}: {value}")?;
    }
    out.push('\n');

    heading(&mut out, "Issues", '-');
    if report.per_issue.is_empty() {
      writeln!(out, "{NO_ISSUES}")?;
    }
    for r in &report.per_issue {
      let cells = issue_cells(r, &self.tz).map(|c| one_line(&c));
      writeln!(out, "{}: {}", cells[0], cells[1])?;
      // Status through Cycle Time; the note line only when there is one.
      for (label, value) in ISSUE_HEADERS.iter().zip(cells.iter()).skip(2).take(6) {
        writeln!(out, "  {label}: {value}")?;
      }
      if !cells[8].is_empty() {
        writeln!(out, "  {}: {}", ISSUE_HEADERS[8], cells[8])?;
      }
    }

    for (dim, groups) in report.dimensions() {
      out.push('\n');
      self.render_dimension(&mut out, report, dim, groups)?;
    }

    Ok(out)
  }
}

impl ConsoleRenderer {
  fn render_dimension(&self, out: &mut String, report: &Report, dim: Dimension, groups: &[Group]) -> Result<()> {
    heading(out, &ranking_title(dim), '-');
    let rows = rank_rows(groups);
    if rows.is_empty() {
      writeln!(out, "{}", no_ranked_groups(dim))?;
    } else {
      out.push_str(&table(&rank_headers(dim), &rows));
    }
    out.push('\n');

    heading(out, &breakdown_title(dim), '-');
    if groups.is_empty() {
      writeln!(out, "{}", no_groups(dim))?;
    }
    for g in groups {
      writeln!(out, "[{}]", one_line(&g.key))?;
      for (label, value) in stats_rows(&g.stats) {
        writeln!(out, "  {label}: {value}")?;
      }
      let rows: Vec<[String; 5]> = g.results(&report.per_issue).map(group_issue_cells).collect();
      out.push_str(&indent(&table(&GROUP_ISSUE_HEADERS, &rows), "  "));
      out.push('\n');
    }
    Ok(())
  }
}

fn heading(out: &mut String, text: &str, underline: char) {
  out.push_str(text);
  out.push('\n');
  out.extend(std::iter::repeat(underline).take(text.chars().count()));
  out.push('\n');
}

/// Left-aligned columns padded to the widest cell, two spaces apart.
fn table<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> String {
  let rows: Vec<[String; N]> = rows.iter().map(|r| r.clone().map(|c| one_line(&c))).collect();
  let mut widths: [usize; N] = [0; N];
  for (w, h) in widths.iter_mut().zip(headers.iter()) {
    *w = h.chars().count();
  }
  for row in &rows {
    for (w, cell) in widths.iter_mut().zip(row.iter()) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
  push_row(&mut out, &header_cells, &widths);
  let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
  push_row(&mut out, &rule, &widths);
  for row in &rows {
    push_row(&mut out, row, &widths);
  }
  out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
  let mut line = String::new();
  for (i, (cell, w)) in cells.iter().zip(widths.iter()).enumerate() {
    if i > 0 {
      line.push_str("  ");
    }
    line.push_str(cell);
    let pad = w.saturating_sub(cell.chars().count());
    line.extend(std::iter::repeat(' ').take(pad));
  }
  out.push_str(line.trim_end());
  out.push('\n');
}

/// Line breaks inside free text would tear aligned rows apart.
fn one_line(s: &str) -> String {
  s.replace("\r\n", " ").replace('\r', " ").replace('\n', " ")
}

fn indent(text: &str, prefix: &str) -> String {
  text.lines().map(|l| format!("{prefix}{l}\n")).collect()
}
