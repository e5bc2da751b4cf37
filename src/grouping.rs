//! Multi-membership grouping of cycle-time results by component or label.
//!
//! Groups are built as an index (`key -> result positions`); an issue with several
//! components contributes its full cycle time to each of them.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::cycle::summarize;
use crate::model::{CycleTimeResult, Dimension, Group};

pub fn group_by(results: &[CycleTimeResult], dimension: Dimension) -> Vec<Group> {
  let mut index: BTreeMap<&str, Vec<usize>> = BTreeMap::new();

  for (pos, r) in results.iter().enumerate() {
    for key in dimension.keys(&r.issue) {
      index.entry(key.as_str()).or_default().push(pos);
    }
  }

  let mut groups: Vec<Group> = index
    .into_iter()
    .map(|(key, members)| {
      let stats = summarize(members.iter().map(|&i| &results[i]));
      Group {
        key: key.to_string(),
        members,
        stats,
      }
    })
    .collect();

  groups.sort_by(compare_groups);
  groups
}

/// Groups eligible for ranking (those with an average), in ranked order.
pub fn ranked(groups: &[Group]) -> Vec<&Group> {
  let mut out: Vec<&Group> = groups.iter().filter(|g| g.stats.average.is_some()).collect();
  out.sort_by(|a, b| compare_groups(a, b));
  out
}

/// Descending average, then descending ticket count with cycle time, then ascending key.
/// Groups without an average sort after all ranked groups, by key.
fn compare_groups(a: &Group, b: &Group) -> Ordering {
  match (a.stats.average, b.stats.average) {
    (Some(x), Some(y)) => y
      .total_cmp(&x)
      .then_with(|| b.stats.with_cycle_time.cmp(&a.stats.with_cycle_time))
      .then_with(|| a.key.cmp(&b.key)),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => a.key.cmp(&b.key),
  }
}
