//! JQL for "issues that moved to a done status inside the window".

use crate::model::SearchCriteria;

/// Quote a JQL string literal, escaping backslashes and double quotes.
pub fn quote(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for ch in value.chars() {
    if ch == '"' || ch == '\\' {
      out.push('\\');
    }
    out.push(ch);
  }
  out.push('"');
  out
}

pub fn build_search_jql(c: &SearchCriteria) -> String {
  let done = c
    .done_statuses
    .iter()
    .map(|s| quote(s))
    .collect::<Vec<_>>()
    .join(", ");

  let mut parts = vec![
    format!("project = {}", quote(&c.project)),
    format!(
      "status CHANGED TO ({done}) DURING ({}, {})",
      quote(&format!("{} 00:00", c.range.start.format("%Y-%m-%d"))),
      quote(&format!("{} 23:59", c.range.end.format("%Y-%m-%d"))),
    ),
  ];

  for label in &c.labels {
    parts.push(format!("labels = {}", quote(label)));
  }

  if !c.team.is_empty() {
    parts.push(format!("\"Delivery Team\" ~ {}", quote(&c.team)));
  }

  parts.join(" AND ")
}
