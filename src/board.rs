// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Pure board-configuration logic for the column cleaner (lookup, cleaning, replacement, status search)
// role: board/logic
// inputs: Board configuration JSON (columnConfig.columns[].statuses[].id); a status-name resolver
// outputs: Cleaned column JSON plus kept/removed status ids
// invariants:
// - Column lookup is case-insensitive on the column name; the first match wins
// - Cleaning never reorders the statuses it keeps
// - Every other field of the column and configuration is preserved
// errors: anyhow errors for impossible removals and unresolvable keep lists
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Result};
use serde_json::Value;

use crate::ext::serde_json::JsonFetch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSummary {
  pub id: String,
  pub name: String,
  pub kind: String,
}

/// How to clean a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanMode {
  /// Keep statuses whose id or (case-insensitive) name is listed.
  Keep(Vec<String>),
  /// Drop the first N statuses.
  RemoveFirst(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
  pub column: Value,
  pub kept: Vec<String>,
  pub removed: Vec<String>,
}

/// Ids may be serialized as strings or numbers depending on the endpoint.
pub fn id_of(v: &Value) -> Option<String> {
  match v.fetch("id").value()? {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

pub fn boards_from_json(values: &[Value]) -> Vec<BoardSummary> {
  values
    .iter()
    .filter_map(|b| {
      Some(BoardSummary {
        id: id_of(b)?,
        name: b.fetch("name").str().unwrap_or("Unknown").to_string(),
        kind: b.fetch("type").str().unwrap_or("unknown").to_string(),
      })
    })
    .collect()
}

pub fn columns(config: &Value) -> &[Value] {
  config.fetch("columnConfig.columns").items()
}

pub fn column_name(column: &Value) -> &str {
  column.fetch("name").str().unwrap_or("")
}

pub fn find_column<'a>(config: &'a Value, name: &str) -> Option<&'a Value> {
  let wanted = name.trim().to_lowercase();
  columns(config)
    .iter()
    .find(|c| column_name(c).to_lowercase() == wanted)
}

pub fn status_ids(column: &Value) -> Vec<String> {
  column.fetch("statuses").items().iter().filter_map(id_of).collect()
}

fn is_status_id(s: &str) -> bool {
  !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Clean `column` according to `mode`. `name_of` resolves a status id to its display name and is
/// only consulted for keep lists that contain names.
pub fn clean_column<F>(column: &Value, mode: &CleanMode, mut name_of: F) -> Result<CleanOutcome>
where
  F: FnMut(&str) -> Option<String>,
{
  let statuses = column.fetch("statuses").items();

  let keep_flags: Vec<bool> = match mode {
    CleanMode::RemoveFirst(n) => {
      if *n >= statuses.len() {
        bail!(
          "Cannot remove {n} statuses - column '{}' only has {} statuses",
          column_name(column),
          statuses.len()
        );
      }
      (0..statuses.len()).map(|i| i >= *n).collect()
    }
    CleanMode::Keep(identifiers) => {
      if identifiers.is_empty() {
        bail!("No statuses specified to keep");
      }
      let (ids, names): (Vec<&String>, Vec<&String>) = identifiers.iter().partition(|s| is_status_id(s));
      let names: Vec<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();
      statuses
        .iter()
        .map(|s| {
          let Some(id) = id_of(s) else { return false };
          if ids.iter().any(|k| **k == id) {
            return true;
          }
          !names.is_empty()
            && name_of(&id)
              .map(|n| names.contains(&n.to_lowercase()))
              .unwrap_or(false)
        })
        .collect()
    }
  };

  let mut kept_values = Vec::new();
  let mut kept = Vec::new();
  let mut removed = Vec::new();
  for (s, keep) in statuses.iter().zip(keep_flags) {
    let id = id_of(s).unwrap_or_default();
    if keep {
      kept_values.push(s.clone());
      kept.push(id);
    } else {
      removed.push(id);
    }
  }

  let mut new_column = column.clone();
  if let Some(obj) = new_column.as_object_mut() {
    obj.insert("statuses".to_string(), Value::Array(kept_values));
  }

  Ok(CleanOutcome {
    column: new_column,
    kept,
    removed,
  })
}

/// Swap the first column matching `name` (case-insensitive) for `new_column`. Returns whether one was replaced.
pub fn replace_column(config: &mut Value, name: &str, new_column: Value) -> bool {
  let wanted = name.trim().to_lowercase();
  let Some(cols) = config
    .pointer_mut("/columnConfig/columns")
    .and_then(Value::as_array_mut)
  else {
    return false;
  };
  match cols.iter_mut().find(|c| column_name(c).to_lowercase() == wanted) {
    Some(slot) => {
      *slot = new_column;
      true
    }
    None => false,
  }
}

/// Statuses whose name contains `needle` (case-insensitive).
pub fn search_statuses<'a>(all: &'a Value, needle: &str) -> Vec<&'a Value> {
  let needle = needle.trim().to_lowercase();
  all
    .fetch("")
    .items()
    .iter()
    .filter(|s| {
      s.fetch("name")
        .str()
        .map(|n| n.to_lowercase().contains(&needle))
        .unwrap_or(false)
    })
    .collect()
}
