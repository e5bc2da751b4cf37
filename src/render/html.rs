//! Self-contained HTML document. Every piece of issue data passes through [`escape`].

use std::fmt::Write as _;

use anyhow::Result;

use super::{
  breakdown_title, criteria_rows, group_issue_cells, issue_cells, no_groups, no_ranked_groups, rank_headers,
  rank_rows, ranking_title, stats_rows, Renderer, GROUP_ISSUE_HEADERS, ISSUE_HEADERS, NO_ISSUES, TITLE,
};
use crate::model::Report;
use crate::util::DisplayTz;

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }
th { background: #f4f4f4; }
.empty { font-style: italic; }";

pub struct HtmlRenderer {
  pub tz: DisplayTz,
}

impl Renderer for HtmlRenderer {
  fn render(&self, report: &Report) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{} - {}</title>", TITLE, escape(&report.criteria.project))?;
    writeln!(out, "<style>\n{STYLE}\n</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>{TITLE}</h1>")?;

    writeln!(out, "<h2>Search Criteria</h2>")?;
    out.push_str(&pairs_table("criteria", criteria_rows(&report.criteria, &self.tz)));

    writeln!(out, "<h2>Summary</h2>")?;
    out.push_str(&pairs_table("summary", stats_rows(&report.overall)));

    writeln!(out, "<h2>Issues</h2>")?;
    if report.per_issue.is_empty() {
      writeln!(out, "<p class=\"empty\">{NO_ISSUES}</p>")?;
    } else {
      let rows: Vec<[String; 9]> = report.per_issue.iter().map(|r| issue_cells(r, &self.tz)).collect();
      out.push_str(&table("issues", &ISSUE_HEADERS, &rows));
    }

    for (dim, groups) in report.dimensions() {
      writeln!(out, "<h2>{}</h2>", ranking_title(dim))?;
      let rows = rank_rows(groups);
      if rows.is_empty() {
        writeln!(out, "<p class=\"empty\">{}</p>", no_ranked_groups(dim))?;
      } else {
        out.push_str(&table("ranking", &rank_headers(dim), &rows));
      }

      writeln!(out, "<h2>{}</h2>", breakdown_title(dim))?;
      if groups.is_empty() {
        writeln!(out, "<p class=\"empty\">{}</p>", no_groups(dim))?;
      }
      for g in groups {
        writeln!(out, "<h3>{}</h3>", escape(&g.key))?;
        out.push_str(&pairs_table("group-summary", stats_rows(&g.stats)));
        let rows: Vec<[String; 5]> = g.results(&report.per_issue).map(group_issue_cells).collect();
        out.push_str(&table("group-issues", &GROUP_ISSUE_HEADERS, &rows));
      }
    }

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
  }
}

pub fn escape(input: &str) -> String {
  input
    .replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#x27;")
}

fn table<const N: usize>(class: &str, headers: &[&str; N], rows: &[[String; N]]) -> String {
  let mut out = format!("<table class=\"{class}\">\n<thead><tr>");
  for h in headers {
    out.push_str("<th>");
    out.push_str(&escape(h));
    out.push_str("</th>");
  }
  out.push_str("</tr></thead>\n<tbody>\n");
  for row in rows {
    out.push_str("<tr>");
    for cell in row {
      out.push_str("<td>");
      out.push_str(&escape(cell));
      out.push_str("</td>");
    }
    out.push_str("</tr>\n");
  }
  out.push_str("</tbody>\n</table>\n");
  out
}

/// Two-column label/value table with the label as a row header.
fn pairs_table(class: &str, pairs: Vec<(&'static str, String)>) -> String {
  let mut out = format!("<table class=\"{class}\">\n");
  for (label, value) in pairs {
    out.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>\n", escape(label), escape(&value)));
  }
  out.push_str("</table>\n");
  out
}
