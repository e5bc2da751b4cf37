// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Extract in-progress/done timestamps from changelogs and compute per-issue and batch cycle-time statistics
// role: computation/cycle-time
// inputs: Issues with unordered status transitions; normalized StatusSets
// outputs: CycleTimeResult per issue and SummaryStats for any subset of results
// invariants:
// - in_progress_at is the earliest in-progress transition; done_at is the latest done transition
// - cycle_days = floor(days between) and is never negative; anomalies are flagged, not computed
// - average is rounded half-up to one decimal using integer tenths (bit-identical across runs)
// errors: None; data-quality problems become absent values plus a DataQuality flag
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::model::{CycleTimeResult, DataQuality, Issue, SummaryStats};
use crate::status::{Phase, StatusSets};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
  pub in_progress_at: Option<DateTime<Utc>>,
  pub done_at: Option<DateTime<Utc>>,
}

/// Scan an issue's transitions (any order) for the first in-progress entry and the last done entry.
pub fn extract(issue: &Issue, sets: &StatusSets) -> Extraction {
  let mut in_progress_at: Option<DateTime<Utc>> = None;
  let mut done_at: Option<DateTime<Utc>> = None;

  for t in &issue.transitions {
    match sets.classify(&t.to_status) {
      Phase::InProgress => {
        if in_progress_at.map_or(true, |cur| t.at < cur) {
          in_progress_at = Some(t.at);
        }
      }
      Phase::Done => {
        if done_at.map_or(true, |cur| t.at > cur) {
          done_at = Some(t.at);
        }
      }
      Phase::Other => {}
    }
  }

  Extraction { in_progress_at, done_at }
}

/// Whole elapsed days between two instants; `None` when `end` precedes `start`.
pub fn cycle_days(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<i64> {
  if end < start {
    return None;
  }
  Some((end - start).num_days())
}

pub fn evaluate(issue: Issue, sets: &StatusSets) -> CycleTimeResult {
  let ex = extract(&issue, sets);

  let (days, quality) = match (ex.in_progress_at, ex.done_at) {
    (Some(start), Some(end)) => match cycle_days(start, end) {
      Some(d) => (Some(d), None),
      None => {
        warn!(
          issue = %issue.key,
          in_progress_at = %start,
          done_at = %end,
          "done transition precedes in-progress transition; cycle time left empty"
        );
        (None, Some(DataQuality::DoneBeforeInProgress))
      }
    },
    (None, None) if issue.transitions.is_empty() => (None, Some(DataQuality::NoTransitions)),
    (None, None) => (None, Some(DataQuality::MissingInProgress)),
    (None, Some(_)) => (None, Some(DataQuality::MissingInProgress)),
    (Some(_), None) => (None, Some(DataQuality::MissingDone)),
  };

  CycleTimeResult {
    issue,
    in_progress_at: ex.in_progress_at,
    done_at: ex.done_at,
    cycle_days: days,
    quality,
  }
}

/// Evaluate every issue (input order preserved) and summarize the batch.
pub fn compute(issues: Vec<Issue>, sets: &StatusSets) -> (Vec<CycleTimeResult>, SummaryStats) {
  let results: Vec<CycleTimeResult> = issues.into_iter().map(|i| evaluate(i, sets)).collect();
  let overall = summarize(results.iter());
  (results, overall)
}

pub fn summarize<'a, I>(results: I) -> SummaryStats
where
  I: IntoIterator<Item = &'a CycleTimeResult>,
{
  let mut count = 0usize;
  let mut days: Vec<i64> = Vec::new();

  for r in results {
    count += 1;
    if let Some(d) = r.cycle_days {
      days.push(d);
    }
  }

  if days.is_empty() {
    return SummaryStats {
      count,
      with_cycle_time: 0,
      average: None,
      min: None,
      max: None,
      total: None,
    };
  }

  let total: i64 = days.iter().sum();

  SummaryStats {
    count,
    with_cycle_time: days.len(),
    average: Some(mean_one_decimal(total, days.len())),
    min: days.iter().min().copied(),
    max: days.iter().max().copied(),
    total: Some(total),
  }
}

/// Mean of `n` non-negative values summing to `sum`, rounded half-up to one decimal.
pub fn mean_one_decimal(sum: i64, n: usize) -> f64 {
  let n = n as i64;
  // round(10 * sum / n) with halves rounded up: floor((20 * sum + n) / (2 * n))
  let tenths = (20 * sum + n).div_euclid(2 * n);
  tenths as f64 / 10.0
}
