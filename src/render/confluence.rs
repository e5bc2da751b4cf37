use std::fmt::Write as _;

use anyhow::Result;

use super::{
  breakdown_title, criteria_rows, group_issue_cells, issue_cells, no_groups, no_ranked_groups, rank_headers,
  rank_rows, ranking_title, stats_rows, Renderer, GROUP_ISSUE_HEADERS, ISSUE_HEADERS, NO_ISSUES, TITLE,
};
use crate::model::Report;
use crate::util::DisplayTz;

/// Confluence wiki markup (`h1.`, `||header||`, `|cell|`).
pub struct ConfluenceRenderer {
  pub tz: DisplayTz,
}

impl Renderer for ConfluenceRenderer {
  fn render(&self, report: &Report) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "h1. {TITLE}\n")?;

    writeln!(out, "h2. Search Criteria")?;
    out.push_str(&pairs_table("Field", criteria_rows(&report.criteria, &self.tz)));

    writeln!(out, "\nh2. Summary")?;
    out.push_str(&pairs_table("Metric", stats_rows(&report.overall)));

    writeln!(out, "\nh2. Issues")?;
    if report.per_issue.is_empty() {
      writeln!(out, "{{info}}{NO_ISSUES}{{info}}")?;
    } else {
      let rows: Vec<[String; 9]> = report.per_issue.iter().map(|r| issue_cells(r, &self.tz)).collect();
      out.push_str(&table(&ISSUE_HEADERS, &rows));
    }

    for (dim, groups) in report.dimensions() {
      writeln!(out, "\nh2. {}", ranking_title(dim))?;
      let rows = rank_rows(groups);
      if rows.is_empty() {
        writeln!(out, "{{info}}{}{{info}}", no_ranked_groups(dim))?;
      } else {
        out.push_str(&table(&rank_headers(dim), &rows));
      }

      writeln!(out, "\nh2. {}", breakdown_title(dim))?;
      if groups.is_empty() {
        writeln!(out, "{{info}}{}{{info}}", no_groups(dim))?;
      }
      for g in groups {
        writeln!(out, "\nh3. {}", escape(&g.key))?;
        out.push_str(&pairs_table("Metric", stats_rows(&g.stats)));
        let rows: Vec<[String; 5]> = g.results(&report.per_issue).map(group_issue_cells).collect();
        out.push_str(&table(&GROUP_ISSUE_HEADERS, &rows));
      }
    }

    Ok(out)
  }
}

/// Backslash-escape wiki markup so free text renders literally inside a table cell.
/// Empty text becomes a single space; Confluence collapses `||` into a header cell otherwise.
pub fn escape(s: &str) -> String {
  if s.trim().is_empty() {
    return " ".to_string();
  }
  let mut out = String::with_capacity(s.len() + 8);
  for ch in s.chars() {
    match ch {
      '\\' | '|' | '[' | ']' | '{' | '}' | '*' | '_' | '+' | '^' | '~' | '?' | '!' | '#' | '-' | '(' | ':' => {
        out.push('\\');
        out.push(ch);
      }
      '\r' => {}
      '\n' => out.push(' '),
      c => out.push(c),
    }
  }
  out
}

/// Cells that only ever hold keys, numbers, dates or `N/A` skip escaping so they stay readable.
/// A colon is only plain inside a clock time; elsewhere it can start an emoticon such as `:D`.
fn plain(s: &str) -> bool {
  let chars: Vec<char> = s.chars().collect();
  let clock_colons = chars.iter().enumerate().all(|(i, &c)| {
    c != ':' || (i > 0 && chars[i - 1].is_ascii_digit() && chars.get(i + 1).is_some_and(char::is_ascii_digit))
  });
  clock_colons
    && !s.is_empty()
    && s
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.' | '/' | ' '))
    && !s.starts_with('-')
    && !s.contains(" -")
    && !s.contains("- ")
}

fn cell(s: &str) -> String {
  if plain(s) {
    s.to_string()
  } else {
    escape(s)
  }
}

fn table<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> String {
  let mut out = String::from("||");
  for h in headers {
    out.push_str(h);
    out.push_str("||");
  }
  out.push('\n');
  for row in rows {
    out.push('|');
    for c in row {
      out.push_str(&cell(c));
      out.push('|');
    }
    out.push('\n');
  }
  out
}

fn pairs_table(first: &str, pairs: Vec<(&'static str, String)>) -> String {
  let mut out = format!("||{first}||Value||\n");
  for (label, value) in pairs {
    out.push_str(&format!("|{}|{}|\n", label, cell(&value)));
  }
  out
}
