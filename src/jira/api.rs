// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Jira REST seam (trait) with HTTP, env-fixture, and per-run cached implementations
// role: jira/api
// inputs: Base URL and basic-auth credentials; JCR_TEST_* env vars for fixture mode
// outputs: Raw serde_json::Value payloads; interpretation lives in jira::parse and board
// side_effects: Network calls to the configured Jira host (HTTP impl only)
// invariants:
// - Fixture mode never touches the network
// - Status lookups are memoized per run; board/search calls are not
// - A 404 from the status endpoint is Ok(None), not an error
// errors: Non-2xx responses become anyhow errors naming the endpoint, status code and a body excerpt
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use tracing::debug;

use crate::credentials::Credentials;
use crate::ext::serde_json::JsonFetch;

pub const SEARCH_FIELDS: &str = "summary,status,labels,components";

pub trait JiraApi {
  /// `GET /rest/api/2/myself`; doubles as a connection check.
  fn myself(&self) -> Result<Value>;
  fn search_page(&self, jql: &str, start_at: u32, max_results: u32) -> Result<Value>;
  fn boards_page(&self, start_at: u32, max_results: u32) -> Result<Value>;
  fn board_configuration(&self, board_id: &str) -> Result<Value>;
  fn status(&self, status_id: &str) -> Result<Option<Value>>;
  fn statuses(&self) -> Result<Value>;
  fn update_board_configuration(&self, board_id: &str, config: &Value) -> Result<()>;
}

// --- HTTP implementation ---

pub struct JiraHttpApi {
  base: String,
  auth: String,
  agent: ureq::Agent,
}

impl JiraHttpApi {
  pub fn new(creds: &Credentials) -> Self {
    let token = STANDARD.encode(format!("{}:{}", creds.username, creds.password));
    let agent = ureq::AgentBuilder::new()
      .timeout_connect(Duration::from_secs(10))
      .timeout(Duration::from_secs(60))
      .user_agent(concat!("jira-cycle-report/", env!("CARGO_PKG_VERSION")))
      .build();
    Self {
      base: creds.url.trim_end_matches('/').to_string(),
      auth: format!("Basic {token}"),
      agent,
    }
  }

  fn request(&self, method: &str, path: &str) -> ureq::Request {
    self
      .agent
      .request(method, &format!("{}{}", self.base, path))
      .set("Authorization", &self.auth)
      .set("Accept", "application/json")
  }

  fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
    let mut req = self.request("GET", path);
    for (k, v) in query {
      req = req.query(k, v);
    }
    debug!(path, "GET");
    read_json(path, req.call())
  }
}

fn read_json(path: &str, resp: std::result::Result<ureq::Response, ureq::Error>) -> Result<Value> {
  match resp {
    Ok(r) => r.into_json::<Value>().with_context(|| format!("decoding JSON from {path}")),
    Err(ureq::Error::Status(code, r)) => {
      let body = r.into_string().unwrap_or_default();
      Err(http_error(path, code, &body))
    }
    Err(e) => Err(anyhow!(e)).with_context(|| format!("requesting {path}")),
  }
}

fn http_error(path: &str, code: u16, body: &str) -> anyhow::Error {
  let excerpt: String = body.chars().take(300).collect();
  let hint = match code {
    401 => " (check username and password/API token)",
    403 => " (no permission)",
    404 => " (not found or not accessible)",
    _ => "",
  };
  anyhow!("Jira returned HTTP {code}{hint} for {path}: {excerpt}")
}

impl JiraApi for JiraHttpApi {
  fn myself(&self) -> Result<Value> {
    self.get_json("/rest/api/2/myself", &[])
  }

  fn search_page(&self, jql: &str, start_at: u32, max_results: u32) -> Result<Value> {
    let start = start_at.to_string();
    let max = max_results.to_string();
    self.get_json(
      "/rest/api/2/search",
      &[
        ("jql", jql),
        ("startAt", start.as_str()),
        ("maxResults", max.as_str()),
        ("fields", SEARCH_FIELDS),
        ("expand", "changelog"),
      ],
    )
  }

  fn boards_page(&self, start_at: u32, max_results: u32) -> Result<Value> {
    let start = start_at.to_string();
    let max = max_results.to_string();
    self.get_json("/rest/agile/1.0/board", &[("startAt", start.as_str()), ("maxResults", max.as_str())])
  }

  fn board_configuration(&self, board_id: &str) -> Result<Value> {
    self.get_json(&format!("/rest/agile/1.0/board/{board_id}/configuration"), &[])
  }

  fn status(&self, status_id: &str) -> Result<Option<Value>> {
    let path = format!("/rest/api/2/status/{status_id}");
    match self.request("GET", &path).call() {
      Err(ureq::Error::Status(404, _)) => Ok(None),
      other => read_json(&path, other).map(Some),
    }
  }

  fn statuses(&self) -> Result<Value> {
    self.get_json("/rest/api/2/status", &[])
  }

  fn update_board_configuration(&self, board_id: &str, config: &Value) -> Result<()> {
    let path = format!("/rest/agile/1.0/board/{board_id}/configuration");
    debug!(path = %path, "PUT");
    let resp = self
      .request("PUT", &path)
      .set("Content-Type", "application/json")
      .send_json(config.clone());
    match resp {
      Ok(_) => Ok(()),
      Err(ureq::Error::Status(code, r)) => Err(http_error(&path, code, &r.into_string().unwrap_or_default())),
      Err(e) => Err(anyhow!(e)).with_context(|| format!("requesting {path}")),
    }
  }
}

// --- Env fixture implementation (tests, offline demos) ---

pub const ENV_SEARCH: &str = "JCR_TEST_SEARCH_JSON";
pub const ENV_BOARDS: &str = "JCR_TEST_BOARDS_JSON";
pub const ENV_BOARD_CONFIG: &str = "JCR_TEST_BOARD_CONFIG_JSON";
pub const ENV_STATUSES: &str = "JCR_TEST_STATUSES_JSON";
pub const ENV_MYSELF: &str = "JCR_TEST_MYSELF_JSON";
pub const ENV_UPDATE_LOG: &str = "JCR_TEST_UPDATE_LOG";

/// Serves payloads from `JCR_TEST_*` variables.
///
/// `JCR_TEST_SEARCH_JSON` may hold a single search response or an array of issues; either way
/// it is paged locally so pagination logic is exercised. `JCR_TEST_UPDATE_LOG`, when set, names
/// a file that receives the JSON of every board update.
pub struct JiraEnvApi;

fn env_json(key: &str) -> Result<Option<Value>> {
  match std::env::var(key) {
    Ok(s) => serde_json::from_str(&s)
      .map(Some)
      .with_context(|| format!("parsing {key}")),
    Err(_) => Ok(None),
  }
}

fn page_of(all: &[Value], start_at: u32, max_results: u32, items_key: &str) -> Value {
  let start = (start_at as usize).min(all.len());
  let end = (start + max_results as usize).min(all.len());
  json!({
    "startAt": start_at,
    "maxResults": max_results,
    "total": all.len(),
    items_key: all[start..end].to_vec(),
  })
}

impl JiraApi for JiraEnvApi {
  fn myself(&self) -> Result<Value> {
    Ok(env_json(ENV_MYSELF)?.unwrap_or_else(|| json!({ "displayName": "Fixture User" })))
  }

  fn search_page(&self, _jql: &str, start_at: u32, max_results: u32) -> Result<Value> {
    let v = env_json(ENV_SEARCH)?.unwrap_or_else(|| json!([]));
    let issues = match &v {
      Value::Array(items) => items.as_slice(),
      other => other.fetch("issues").items(),
    };
    Ok(page_of(issues, start_at, max_results, "issues"))
  }

  fn boards_page(&self, start_at: u32, max_results: u32) -> Result<Value> {
    let v = env_json(ENV_BOARDS)?.unwrap_or_else(|| json!([]));
    let boards = match &v {
      Value::Array(items) => items.as_slice(),
      other => other.fetch("values").items(),
    };
    Ok(page_of(boards, start_at, max_results, "values"))
  }

  fn board_configuration(&self, board_id: &str) -> Result<Value> {
    env_json(ENV_BOARD_CONFIG)?.ok_or_else(|| anyhow!("board {board_id} not found ({ENV_BOARD_CONFIG} unset)"))
  }

  fn status(&self, status_id: &str) -> Result<Option<Value>> {
    let all = self.statuses()?;
    Ok(
      all
        .fetch("")
        .items()
        .iter()
        .find(|s| s.fetch("id").str() == Some(status_id))
        .cloned(),
    )
  }

  fn statuses(&self) -> Result<Value> {
    Ok(env_json(ENV_STATUSES)?.unwrap_or_else(|| json!([])))
  }

  fn update_board_configuration(&self, _board_id: &str, config: &Value) -> Result<()> {
    if let Ok(path) = std::env::var(ENV_UPDATE_LOG) {
      let text = serde_json::to_string_pretty(config)?;
      std::fs::write(&path, text).with_context(|| format!("writing {path}"))?;
    }
    Ok(())
  }
}

pub fn env_wants_mock() -> bool {
  [ENV_SEARCH, ENV_BOARDS, ENV_BOARD_CONFIG, ENV_STATUSES, ENV_MYSELF]
    .iter()
    .any(|k| std::env::var_os(k).is_some())
}

// --- Per-run memo of status lookups ---

pub struct JiraCachedApi {
  inner: Box<dyn JiraApi>,
  status: RefCell<HashMap<String, Option<Value>>>,
  statuses: RefCell<Option<Value>>,
}

impl JiraCachedApi {
  pub fn new(inner: Box<dyn JiraApi>) -> Self {
    Self {
      inner,
      status: RefCell::new(HashMap::new()),
      statuses: RefCell::new(None),
    }
  }
}

impl JiraApi for JiraCachedApi {
  fn myself(&self) -> Result<Value> {
    self.inner.myself()
  }

  fn search_page(&self, jql: &str, start_at: u32, max_results: u32) -> Result<Value> {
    self.inner.search_page(jql, start_at, max_results)
  }

  fn boards_page(&self, start_at: u32, max_results: u32) -> Result<Value> {
    self.inner.boards_page(start_at, max_results)
  }

  fn board_configuration(&self, board_id: &str) -> Result<Value> {
    self.inner.board_configuration(board_id)
  }

  fn status(&self, status_id: &str) -> Result<Option<Value>> {
    if let Some(v) = self.status.borrow().get(status_id).cloned() {
      return Ok(v);
    }
    let v = self.inner.status(status_id)?;
    self.status.borrow_mut().insert(status_id.to_string(), v.clone());
    Ok(v)
  }

  fn statuses(&self) -> Result<Value> {
    if let Some(v) = self.statuses.borrow().clone() {
      return Ok(v);
    }
    let v = self.inner.statuses()?;
    *self.statuses.borrow_mut() = Some(v.clone());
    Ok(v)
  }

  fn update_board_configuration(&self, board_id: &str, config: &Value) -> Result<()> {
    self.inner.update_board_configuration(board_id, config)
  }
}

/// Fixture API when any `JCR_TEST_*` payload is set, otherwise HTTP (credentials required).
pub fn build_api(creds: Option<&Credentials>) -> Result<Box<dyn JiraApi>> {
  let inner: Box<dyn JiraApi> = if env_wants_mock() {
    debug!("using JCR_TEST_* fixtures instead of HTTP");
    Box::new(JiraEnvApi)
  } else if let Some(c) = creds {
    Box::new(JiraHttpApi::new(c))
  } else {
    bail!("Jira credentials are required");
  };
  Ok(Box::new(JiraCachedApi::new(inner)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;
  use std::rc::Rc;

  struct CountingApi {
    status_calls: Rc<Cell<usize>>,
  }

  impl JiraApi for CountingApi {
    fn myself(&self) -> Result<Value> {
      Ok(json!({}))
    }
    fn search_page(&self, _: &str, _: u32, _: u32) -> Result<Value> {
      Ok(json!({}))
    }
    fn boards_page(&self, _: u32, _: u32) -> Result<Value> {
      Ok(json!({}))
    }
    fn board_configuration(&self, _: &str) -> Result<Value> {
      Ok(json!({}))
    }
    fn status(&self, id: &str) -> Result<Option<Value>> {
      self.status_calls.set(self.status_calls.get() + 1);
      Ok((id != "404").then(|| json!({ "id": id, "name": format!("S{id}") })))
    }
    fn statuses(&self) -> Result<Value> {
      Ok(json!([]))
    }
    fn update_board_configuration(&self, _: &str, _: &Value) -> Result<()> {
      Ok(())
    }
  }

  #[test]
  fn cached_api_memoizes_status_lookups_including_misses() {
    let calls = Rc::new(Cell::new(0));
    let api = JiraCachedApi::new(Box::new(CountingApi {
      status_calls: Rc::clone(&calls),
    }));
    for _ in 0..3 {
      assert_eq!(api.status("1").unwrap().unwrap().fetch("name").str(), Some("S1"));
      assert!(api.status("404").unwrap().is_none());
    }
    assert_eq!(calls.get(), 2);
  }

  #[test]
  fn page_of_slices_and_reports_total() {
    let all: Vec<Value> = (0..5).map(|i| json!({ "key": format!("P-{i}") })).collect();
    let p = page_of(&all, 4, 2, "issues");
    assert_eq!(p.fetch("total").to::<usize>(), Some(5));
    assert_eq!(p.fetch("issues").items().len(), 1);
    let past_end = page_of(&all, 10, 2, "issues");
    assert!(past_end.fetch("issues").items().is_empty());
  }

  #[test]
  fn http_error_mentions_code_and_hint() {
    let e = http_error("/rest/api/2/myself", 401, "Unauthorized");
    let msg = e.to_string();
    assert!(msg.contains("401"));
    assert!(msg.contains("API token"));
    assert!(msg.contains("/rest/api/2/myself"));
  }

  #[test]
  fn basic_auth_header_is_base64_of_user_colon_password() {
    let api = JiraHttpApi::new(&Credentials {
      url: "https://x.atlassian.net/".into(),
      username: "me@x.com".into(),
      password: "token".into(),
    });
    assert_eq!(api.base, "https://x.atlassian.net");
    assert_eq!(api.auth, format!("Basic {}", STANDARD.encode("me@x.com:token")));
  }
}
