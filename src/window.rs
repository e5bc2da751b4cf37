// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn the user's window selection (explicit dates, --month, --for phrase) into an inclusive DateRange
// role: configuration/windows
// inputs: WindowSpec; an effective "today" (overridable for tests)
// outputs: DateRange { start, end } with start <= end
// invariants:
// - Ranges are whole calendar days, both ends inclusive
// - Phrase ranges never end after today unless they also start after today
// - Resolution is pure given `today`
// errors: ConfigError::{InvalidDate, InvertedRange, InvalidWindow}
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{Datelike, Duration, Months, NaiveDate};
use chrono_english::{parse_duration, Interval};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::DateRange;

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum WindowSpec {
  Dates { start: String, end: String },
  Month { ym: String },
  ForPhrase { phrase: String },
}

pub fn resolve(window: &WindowSpec, today: NaiveDate) -> Result<DateRange, ConfigError> {
  match window {
    WindowSpec::Dates { start, end } => explicit_range(start, end),
    WindowSpec::Month { ym } => month_range(ym),
    WindowSpec::ForPhrase { phrase } => phrase_range(phrase, today),
  }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ConfigError> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate(raw.to_string()))
}

pub fn explicit_range(start: &str, end: &str) -> Result<DateRange, ConfigError> {
  let s = parse_date(start)?;
  let e = parse_date(end)?;
  checked(s, e)
}

fn checked(start: NaiveDate, end: NaiveDate) -> Result<DateRange, ConfigError> {
  if start > end {
    return Err(ConfigError::InvertedRange {
      start: start.to_string(),
      end: end.to_string(),
    });
  }
  Ok(DateRange { start, end })
}

/// `YYYY-MM` → first..last day of that month.
pub fn month_range(ym: &str) -> Result<DateRange, ConfigError> {
  let bad = || ConfigError::InvalidWindow(format!("invalid --month '{ym}', expected YYYY-MM"));
  let (y, m) = ym.trim().split_once('-').ok_or_else(bad)?;
  let y: i32 = y.parse().map_err(|_| bad())?;
  let m: u32 = m.parse().map_err(|_| bad())?;
  let first = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(bad)?;
  let last = last_day_of_month(first).ok_or_else(bad)?;
  Ok(DateRange { start: first, end: last })
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
  first.checked_add_months(Months::new(1))?.pred_opt()
}

fn start_of_week(d: NaiveDate) -> NaiveDate {
  d - Duration::days(d.weekday().num_days_from_monday() as i64)
}

static RE_LAST_N: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(?:the\s+)?(?:last|past)\s+(\d+)\s+(day|week|month)s?$").unwrap());

fn phrase_range(input: &str, today: NaiveDate) -> Result<DateRange, ConfigError> {
  let phrase = input.trim().to_lowercase();
  let invalid = || ConfigError::InvalidWindow(format!("could not understand --for '{input}'"));

  match phrase.as_str() {
    "today" => return checked(today, today),
    "yesterday" => {
      let y = today.pred_opt().ok_or_else(invalid)?;
      return checked(y, y);
    }
    "this week" => return checked(start_of_week(today), today),
    "last week" => {
      let this_monday = start_of_week(today);
      return checked(this_monday - Duration::days(7), this_monday - Duration::days(1));
    }
    "this month" => return checked(today.with_day(1).ok_or_else(invalid)?, today),
    "last month" => {
      let this_first = today.with_day(1).ok_or_else(invalid)?;
      let prev_first = this_first.checked_sub_months(Months::new(1)).ok_or_else(invalid)?;
      return checked(prev_first, this_first.pred_opt().ok_or_else(invalid)?);
    }
    _ => {}
  }

  // last N days|weeks|months, ending today
  if let Some(caps) = RE_LAST_N.captures(&phrase) {
    let n: u32 = caps[1].parse().map_err(|_| invalid())?;
    if n == 0 {
      return Err(invalid());
    }
    let start = match &caps[2] {
      "day" => today.checked_sub_signed(Duration::days(n as i64 - 1)),
      "week" => today.checked_sub_signed(Duration::days(7 * n as i64 - 1)),
      _ => today
        .checked_sub_months(Months::new(n))
        .and_then(|d| d.succ_opt()),
    }
    .ok_or_else(invalid)?;
    return checked(start, today);
  }

  // Durations like "2 weeks ago" or "3 days"
  if let Ok(interval) = parse_duration(&phrase) {
    let other = match interval {
      Interval::Seconds(secs) => today.checked_add_signed(Duration::days(secs as i64 / 86_400)),
      Interval::Days(days) => today.checked_add_signed(Duration::days(days as i64)),
      Interval::Months(months) if months < 0 => today.checked_sub_months(Months::new(months.unsigned_abs())),
      Interval::Months(months) => today.checked_add_months(Months::new(months as u32)),
    }
    .ok_or_else(invalid)?;
    return if other <= today { checked(other, today) } else { checked(today, other) };
  }

  // Calendar phrases via two_timer ("last year", "march 2024", ...)
  let noon = today.and_hms_opt(12, 0, 0).ok_or_else(invalid)?;
  let config = two_timer::Config::new().now(noon);
  if let Ok((start, end, _)) = two_timer::parse(&phrase, Some(config)) {
    // two_timer's end is exclusive.
    let start = start.date();
    let mut end = (end - Duration::seconds(1)).date();
    if start <= today && end > today {
      end = today;
    }
    return checked(start, end);
  }

  Err(invalid())
}
