// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for display timezones, "today" overrides, output writing, and man page rendering
// role: utilities/helpers
// inputs: Timezone names; DateTime<Utc>; output targets; clap CommandFactory
// outputs: Formatted timestamps, written report files, man page text
// side_effects: write_output creates parent directories and writes files
// invariants:
// - format_instant output is locale-independent: %Y-%m-%d %H:%M in the chosen zone
// - "-" always means stdout
// errors: IO errors bubble with the target path in context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use clap::CommandFactory;

use crate::error::ConfigError;

/// Timezone used when printing transition timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayTz {
  Utc,
  Local,
  Named(Tz),
}

impl DisplayTz {
  pub fn parse(raw: &str) -> Result<Self, ConfigError> {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("utc") {
      return Ok(DisplayTz::Utc);
    }
    if s.eq_ignore_ascii_case("local") {
      return Ok(DisplayTz::Local);
    }
    s.parse::<Tz>()
      .map(DisplayTz::Named)
      .map_err(|_| ConfigError::UnknownTimezone(raw.to_string()))
  }

  pub fn label(&self) -> String {
    match self {
      DisplayTz::Utc => "UTC".into(),
      DisplayTz::Local => "local".into(),
      DisplayTz::Named(tz) => tz.name().to_string(),
    }
  }
}

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn format_instant(at: DateTime<Utc>, tz: &DisplayTz) -> String {
  match tz {
    DisplayTz::Utc => at.format(DATETIME_FORMAT).to_string(),
    DisplayTz::Local => at.with_timezone(&Local).format(DATETIME_FORMAT).to_string(),
    DisplayTz::Named(zone) => at.with_timezone(zone).format(DATETIME_FORMAT).to_string(),
  }
}

/// Returns the effective "today" given an optional override (tests pin it for determinism).
pub fn effective_today(override_today: Option<NaiveDate>) -> NaiveDate {
  override_today.unwrap_or_else(|| Local::now().date_naive())
}

/// Write `text` to stdout when `out` is "-", else to the file (creating parent directories).
pub fn write_output(out: &str, text: &str) -> Result<()> {
  if out == "-" {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(text.as_bytes()).context("writing report to stdout")?;
    return lock.flush().context("flushing stdout");
  }

  let path = Path::new(out);
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }
  std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
