use std::fmt::Write as _;

use anyhow::Result;

use super::{
  breakdown_title, criteria_rows, group_issue_cells, issue_cells, no_groups, no_ranked_groups, rank_headers,
  rank_rows, ranking_title, stats_rows, Renderer, GROUP_ISSUE_HEADERS, ISSUE_HEADERS, NO_ISSUES, TITLE,
};
use crate::model::Report;
use crate::util::DisplayTz;

pub struct MarkdownRenderer {
  pub tz: DisplayTz,
}

impl Renderer for MarkdownRenderer {
  fn render(&self, report: &Report) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "# {TITLE}\n")?;

    writeln!(out, "## Search Criteria\n")?;
    out.push_str(&pairs_table("Field", criteria_rows(&report.criteria, &self.tz)));

    writeln!(out, "\n## Summary\n")?;
    out.push_str(&pairs_table("Metric", stats_rows(&report.overall)));

    writeln!(out, "\n## Issues\n")?;
    if report.per_issue.is_empty() {
      writeln!(out, "_{NO_ISSUES}_")?;
    } else {
      let rows: Vec<[String; 9]> = report.per_issue.iter().map(|r| issue_cells(r, &self.tz)).collect();
      out.push_str(&table(&ISSUE_HEADERS, &rows));
    }

    for (dim, groups) in report.dimensions() {
      writeln!(out, "\n## {}\n", ranking_title(dim))?;
      let rows = rank_rows(groups);
      if rows.is_empty() {
        writeln!(out, "_{}_", no_ranked_groups(dim))?;
      } else {
        out.push_str(&table(&rank_headers(dim), &rows));
      }

      writeln!(out, "\n## {}\n", breakdown_title(dim))?;
      if groups.is_empty() {
        writeln!(out, "_{}_", no_groups(dim))?;
      }
      for (i, g) in groups.iter().enumerate() {
        if i > 0 {
          out.push('\n');
        }
        writeln!(out, "### {}\n", escape(&g.key))?;
        out.push_str(&pairs_table("Metric", stats_rows(&g.stats)));
        out.push('\n');
        let rows: Vec<[String; 5]> = g.results(&report.per_issue).map(group_issue_cells).collect();
        out.push_str(&table(&GROUP_ISSUE_HEADERS, &rows));
      }
    }

    Ok(out)
  }
}

/// Escape text for a GFM table cell.
pub fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '|' => out.push_str("\\|"),
      '\r' => {}
      '\n' => out.push(' '),
      c => out.push(c),
    }
  }
  out
}

fn row<S: AsRef<str>>(cells: &[S]) -> String {
  let inner: Vec<String> = cells.iter().map(|c| escape(c.as_ref())).collect();
  format!("| {} |\n", inner.join(" | "))
}

fn table<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> String {
  let mut out = row(&headers[..]);
  out.push('|');
  for _ in 0..N {
    out.push_str("---|");
  }
  out.push('\n');
  for r in rows {
    out.push_str(&row(&r[..]));
  }
  out
}

fn pairs_table(first: &str, pairs: Vec<(&'static str, String)>) -> String {
  let rows: Vec<[String; 2]> = pairs.into_iter().map(|(k, v)| [k.to_string(), v]).collect();
  table(&[first, "Value"], &rows)
}
