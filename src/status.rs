//! Status-name classification into canonical phases.

use std::collections::BTreeSet;

use crate::error::ConfigError;

pub const DEFAULT_IN_PROGRESS: &[&str] = &["In Progress", "In Development", "In Review", "In Testing"];
pub const DEFAULT_DONE: &[&str] = &["Done", "Closed", "Resolved"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  InProgress,
  Done,
  Other,
}

/// Normalized (trimmed, lowercased) status names per phase.
///
/// Built once at the configuration boundary; `classify` only does lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSets {
  in_progress: BTreeSet<String>,
  done: BTreeSet<String>,
  in_progress_display: Vec<String>,
  done_display: Vec<String>,
}

impl Default for StatusSets {
  fn default() -> Self {
    Self::build(
      DEFAULT_IN_PROGRESS.iter().map(|s| s.to_string()).collect(),
      DEFAULT_DONE.iter().map(|s| s.to_string()).collect(),
    )
  }
}

impl StatusSets {
  /// Build from optional comma-separated overrides. An override replaces its default entirely.
  pub fn from_overrides(in_progress: Option<&str>, done: Option<&str>) -> Result<Self, ConfigError> {
    let ip = match in_progress {
      Some(raw) => parse_list(raw),
      None => DEFAULT_IN_PROGRESS.iter().map(|s| s.to_string()).collect(),
    };
    let dn = match done {
      Some(raw) => parse_list(raw),
      None => DEFAULT_DONE.iter().map(|s| s.to_string()).collect(),
    };
    Self::from_names(ip, dn)
  }

  pub fn from_names(in_progress: Vec<String>, done: Vec<String>) -> Result<Self, ConfigError> {
    if in_progress.is_empty() {
      return Err(ConfigError::EmptyStatusSet("in-progress"));
    }
    if done.is_empty() {
      return Err(ConfigError::EmptyStatusSet("done"));
    }

    let sets = Self::build(in_progress, done);

    if let Some(shared) = sets.in_progress_display.iter().find(|s| sets.done.contains(&normalize(s))) {
      return Err(ConfigError::OverlappingStatus(shared.clone()));
    }

    Ok(sets)
  }

  fn build(in_progress: Vec<String>, done: Vec<String>) -> Self {
    Self {
      in_progress: in_progress.iter().map(|s| normalize(s)).collect(),
      done: done.iter().map(|s| normalize(s)).collect(),
      in_progress_display: in_progress,
      done_display: done,
    }
  }

  pub fn in_progress_names(&self) -> &[String] {
    &self.in_progress_display
  }

  pub fn done_names(&self) -> &[String] {
    &self.done_display
  }

  pub fn classify(&self, status: &str) -> Phase {
    classify(status, self)
  }
}

pub fn classify(status: &str, sets: &StatusSets) -> Phase {
  let key = normalize(status);
  if sets.in_progress.contains(&key) {
    Phase::InProgress
  } else if sets.done.contains(&key) {
    Phase::Done
  } else {
    Phase::Other
  }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_list(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}

fn normalize(s: &str) -> String {
  s.trim().to_lowercase()
}
