use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use jira_cycle_report::cli::{normalize, Cli};
use jira_cycle_report::ext::serde_json::JsonFetch;
use jira_cycle_report::{credentials, init_tracing, jira, report, util, window};

fn main() -> Result<()> {
  // .env must land before clap reads JIRA_* defaults
  credentials::load_env_file(Path::new(".env"))?;
  let cli = Cli::parse();
  init_tracing();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI and resolve the window
  let cfg = normalize(cli)?;
  let range = window::resolve(&cfg.window, util::effective_today(cfg.today_override))?;
  let criteria = cfg.criteria(range);
  info!(start = %criteria.range.start, end = %criteria.range.end, "resolved date range");

  // Phase 2: connect
  let api = if jira::env_wants_mock() {
    jira::build_api(None)?
  } else {
    let creds = credentials::resolve(cfg.credentials.clone(), cfg.interactive)?;
    jira::build_api(Some(&creds))?
  };
  let me = api.myself()?;
  info!(user = me.fetch("displayName").str().unwrap_or("unknown"), "connected to Jira");

  // Phase 3: fetch, compute, render
  let issues = jira::search_issues(api.as_ref(), &criteria, cfg.page_size)?;
  let text = report::generate(criteria, issues, &cfg.report)?;
  util::write_output(&cfg.out, &text)
}
