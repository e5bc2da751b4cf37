use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use super::api::JiraApi;
use super::jql::build_search_jql;
use super::parse::issue_from_json;
use crate::ext::serde_json::JsonFetch;
use crate::model::{Issue, SearchCriteria};

/// Collect every page of a paginated Jira listing.
///
/// Stops when a page comes back empty or `startAt + page length >= total`.
pub fn collect_pages<F>(page_size: u32, items_key: &str, mut fetch: F) -> Result<Vec<Value>>
where
  F: FnMut(u32, u32) -> Result<Value>,
{
  let mut out = Vec::new();
  let mut start_at: u32 = 0;

  loop {
    let page = fetch(start_at, page_size)?;
    let items = page.fetch(items_key).items();
    let total: Option<u64> = page.fetch("total").to();
    debug!(start_at, got = items.len(), total, "fetched page");

    if items.is_empty() {
      break;
    }
    out.extend(items.iter().cloned());

    let next = start_at as u64 + items.len() as u64;
    let done = match total {
      Some(t) => next >= t,
      None => page.fetch("isLast").to::<bool>().unwrap_or(true),
    };
    if done {
      break;
    }
    start_at = u32::try_from(next).context("pagination offset overflow")?;
  }

  Ok(out)
}

/// Run the cycle-time search for `criteria` and map every hit to an [`Issue`], in Jira's order.
pub fn search_issues(api: &dyn JiraApi, criteria: &SearchCriteria, page_size: u32) -> Result<Vec<Issue>> {
  let jql = build_search_jql(criteria);
  info!(jql = %jql, "searching issues");

  let raw = collect_pages(page_size, "issues", |start, max| {
    api
      .search_page(&jql, start, max)
      .with_context(|| format!("searching issues (startAt={start})"))
  })?;

  let issues = raw.iter().map(issue_from_json).collect::<Result<Vec<_>>>()?;
  info!(count = issues.len(), "fetched issues");
  Ok(issues)
}
