// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map Jira issue JSON (search results with expanded changelog) to the Issue model
// role: jira/parse
// inputs: serde_json::Value for one issue
// outputs: Issue with labels, components, and status transitions in UTC
// invariants:
// - Only changelog items whose field is "status" become transitions
// - Timestamp offsets are honored; all instants are stored in UTC
// - Missing optional fields default to empty; an issue without a key is rejected
// errors: anyhow error for a missing key; unparseable timestamps are skipped with a warning
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::ext::serde_json::JsonFetch;
use crate::model::{Issue, StatusTransition};

/// Parse Jira's `2024-01-10T09:00:00.000+0000` form, falling back to RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
    .or_else(|_| DateTime::parse_from_rfc3339(raw))
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}

pub fn issue_from_json(v: &Value) -> Result<Issue> {
  let key = v
    .fetch("key")
    .str()
    .filter(|k| !k.is_empty())
    .ok_or_else(|| anyhow!("issue without a key in search results"))?
    .to_string();

  let summary = v.fetch("fields.summary").str().unwrap_or_default().to_string();
  let status = v.fetch("fields.status.name").str().unwrap_or_default().to_string();

  let labels = v
    .fetch("fields.labels")
    .items()
    .iter()
    .filter_map(Value::as_str)
    .map(str::to_string)
    .collect();

  let components = v
    .fetch("fields.components")
    .items()
    .iter()
    .filter_map(|c| c.fetch("name").str())
    .map(str::to_string)
    .collect();

  let mut transitions = Vec::new();
  for history in v.fetch("changelog.histories").items() {
    let created = history.fetch("created").str().unwrap_or_default();
    let status_items: Vec<&Value> = history
      .fetch("items")
      .items()
      .iter()
      .filter(|item| item.fetch("field").str() == Some("status"))
      .collect();
    if status_items.is_empty() {
      continue;
    }
    let Some(at) = parse_timestamp(created) else {
      warn!(issue = %key, created, "skipping changelog entry with unparseable timestamp");
      continue;
    };
    for item in status_items {
      transitions.push(StatusTransition {
        from_status: item.fetch("fromString").str().unwrap_or_default().to_string(),
        to_status: item.fetch("toString").str().unwrap_or_default().to_string(),
        at,
      });
    }
  }

  Ok(Issue {
    key,
    summary,
    status,
    labels,
    components,
    transitions,
  })
}
