use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use crate::credentials::CredentialFlags;
use crate::model::{DateRange, SearchCriteria};
use crate::render::OutputFormat;
use crate::report::ReportConfig;
use crate::status::{parse_list, StatusSets};
use crate::util::DisplayTz;
use crate::window::{parse_date, WindowSpec};

#[derive(Parser, Debug)]
#[command(
  name = "jira-cycle-report",
  version,
  about = "Cycle time report for Jira issues completed in a date range",
  long_about = None
)]
pub struct Cli {
  /// Jira project key, e.g. PROJ
  #[arg(required_unless_present = "gen_man")]
  pub project: Option<String>,

  /// Delivery team matched against the "Delivery Team" field (empty string = any)
  #[arg(required_unless_present = "gen_man")]
  pub team: Option<String>,

  /// Comma-separated labels; every label must be present (empty string = no label filter)
  #[arg(required_unless_present = "gen_man")]
  pub labels: Option<String>,

  /// First day of the window (YYYY-MM-DD); must be paired with END_DATE
  pub start_date: Option<String>,

  /// Last day of the window, inclusive (YYYY-MM-DD)
  pub end_date: Option<String>,

  /// Calendar month, e.g. 2024-01
  #[arg(long)]
  pub month: Option<String>,

  /// Natural language window, e.g. "last month" or "last 30 days"
  #[arg(long = "for")]
  pub for_str: Option<String>,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
  pub format: OutputFormat,

  /// Rank components by average cycle time
  #[arg(long)]
  pub component_analysis: bool,

  /// Rank labels by average cycle time
  #[arg(long)]
  pub label_analysis: bool,

  /// Convenience: both --component-analysis and --label-analysis
  #[arg(long)]
  pub detailed: bool,

  /// Comma-separated statuses that start the clock (replaces the defaults)
  #[arg(long)]
  pub in_progress_statuses: Option<String>,

  /// Comma-separated statuses that stop the clock (replaces the defaults)
  #[arg(long)]
  pub done_statuses: Option<String>,

  /// Timezone for printed timestamps: utc, local, or an IANA name
  #[arg(long, default_value = "utc")]
  pub tz: String,

  /// Output file ("-" = stdout)
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Issues requested per search page
  #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=1000))]
  pub page_size: u32,

  /// Jira base URL, e.g. https://company.atlassian.net
  #[arg(long, env = "JIRA_URL")]
  pub jira_url: Option<String>,

  /// Jira username (email for Jira Cloud)
  #[arg(long, env = "JIRA_USERNAME")]
  pub username: Option<String>,

  /// Jira password or API token
  #[arg(long, env = "JIRA_PASSWORD", hide_env_values = true)]
  pub password: Option<String>,

  /// Never prompt for missing credentials
  #[arg(long)]
  pub no_input: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Pin "today" for relative windows (hidden; tests only)
  #[arg(long = "today-override", hide = true)]
  pub today_override: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub project: String,
  pub team: String,
  pub labels: Vec<String>,
  pub window: WindowSpec,
  pub report: ReportConfig,
  pub out: String,
  pub page_size: u32,
  pub today_override: Option<NaiveDate>,
  pub credentials: CredentialFlags,
  pub interactive: bool,
}

impl EffectiveConfig {
  pub fn criteria(&self, range: DateRange) -> SearchCriteria {
    SearchCriteria {
      project: self.project.clone(),
      team: self.team.clone(),
      labels: self.labels.clone(),
      range,
      in_progress_statuses: self.report.statuses.in_progress_names().to_vec(),
      done_statuses: self.report.statuses.done_names().to_vec(),
    }
  }
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let project = cli.project.as_deref().map(str::trim).unwrap_or_default().to_string();
  if project.is_empty() {
    bail!("PROJECT_KEY must not be empty");
  }

  let window = match (&cli.start_date, &cli.end_date, &cli.month, &cli.for_str) {
    (Some(s), Some(e), None, None) => WindowSpec::Dates {
      start: s.clone(),
      end: e.clone(),
    },
    (None, None, Some(ym), None) => WindowSpec::Month { ym: ym.clone() },
    (None, None, None, Some(p)) => WindowSpec::ForPhrase { phrase: p.clone() },
    (Some(_), None, None, None) => bail!("START_DATE needs an END_DATE"),
    (None, None, None, None) => bail!("Provide START_DATE END_DATE, --month, or --for"),
    _ => bail!("Ambiguous time selection: choose only one of START_DATE/END_DATE | --month | --for"),
  };

  let statuses = StatusSets::from_overrides(cli.in_progress_statuses.as_deref(), cli.done_statuses.as_deref())?;
  let tz = DisplayTz::parse(&cli.tz)?;

  let today_override = cli
    .today_override
    .as_deref()
    .map(parse_date)
    .transpose()
    .context("parsing --today-override")?;

  let report = ReportConfig {
    format: cli.format,
    component_analysis: cli.component_analysis || cli.detailed,
    label_analysis: cli.label_analysis || cli.detailed,
    statuses,
    tz,
  };

  Ok(EffectiveConfig {
    project,
    team: cli.team.as_deref().map(str::trim).unwrap_or_default().to_string(),
    labels: parse_list(cli.labels.as_deref().unwrap_or_default()),
    window,
    report,
    out: cli.out,
    page_size: cli.page_size,
    today_override,
    credentials: CredentialFlags {
      url: cli.jira_url,
      username: cli.username,
      password: cli.password,
    },
    interactive: !cli.no_input,
  })
}
