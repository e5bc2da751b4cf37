// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: CLI and command runner for jira-column-cleaner (inspect boards, clean a column's statuses)
// role: cleaner/orchestration
// inputs: CleanerCli flags; a JiraApi; an output writer; a confirmation callback
// outputs: Human-readable text on the writer; at most one PUT of the full board configuration
// side_effects: update_board_configuration when cleaning without --dry-run and with confirmation
// invariants:
// - Nothing is written to Jira in dry-run mode, when the column is already clean, or when confirmation is declined
// - The PUT carries the whole configuration with only the target column replaced
// errors: ConfigError for missing/conflicting arguments; anyhow errors for API failures
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use crate::board::{self, CleanMode};
use crate::error::ConfigError;
use crate::ext::serde_json::JsonFetch;
use crate::jira::search::collect_pages;
use crate::jira::JiraApi;
use crate::status::parse_list;

const BOARD_PAGE_SIZE: u32 = 50;
const MAX_NAME_LOOKUPS: usize = 20;
const MAX_IDS_SHOWN: usize = 10;

#[derive(Parser, Debug)]
#[command(
  name = "jira-column-cleaner",
  version,
  about = "Remove unwanted statuses from a Jira board column",
  long_about = None
)]
pub struct CleanerCli {
  /// Board id (from the board URL, e.g. 123)
  pub board_id: Option<String>,

  /// Column to clean, matched case-insensitively
  pub column: Option<String>,

  /// Comma-separated status ids or names to keep in the column
  pub keep_statuses: Option<String>,

  /// Show what would change without updating the board
  #[arg(long)]
  pub dry_run: bool,

  /// List all boards visible to the user
  #[arg(long)]
  pub list_boards: bool,

  /// Show the board's columns and their statuses
  #[arg(long)]
  pub show_config: bool,

  /// Find statuses whose name contains this text
  #[arg(long)]
  pub find_status: Option<String>,

  /// List the statuses mapped to this column
  #[arg(long)]
  pub list_column_statuses: Option<String>,

  /// Remove the first N statuses instead of giving a keep list
  #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
  pub remove_count: Option<u64>,

  /// Skip the confirmation prompt
  #[arg(long, short = 'y')]
  pub yes: bool,

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
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanerCommand {
  FindStatus(String),
  ListColumnStatuses { board: String, column: String },
  ListBoards,
  ShowConfig { board: String },
  Clean(CleanPlan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPlan {
  pub board: String,
  pub column: String,
  pub mode: CleanMode,
  pub dry_run: bool,
  pub assume_yes: bool,
}

/// Decide which command the flags select. Informational flags win over cleaning, in the
/// order: --find-status, --list-column-statuses, --list-boards, --show-config.
pub fn plan(cli: &CleanerCli) -> Result<CleanerCommand, ConfigError> {
  if let Some(name) = &cli.find_status {
    return Ok(CleanerCommand::FindStatus(name.clone()));
  }
  if let Some(column) = &cli.list_column_statuses {
    let board = cli.board_id.clone().ok_or(ConfigError::MissingArgument("BOARD_ID"))?;
    return Ok(CleanerCommand::ListColumnStatuses {
      board,
      column: column.clone(),
    });
  }
  if cli.list_boards {
    return Ok(CleanerCommand::ListBoards);
  }

  let board = cli.board_id.clone().ok_or(ConfigError::MissingArgument("BOARD_ID"))?;
  if cli.show_config {
    return Ok(CleanerCommand::ShowConfig { board });
  }

  let column = cli.column.clone().ok_or(ConfigError::MissingArgument("COLUMN"))?;
  let mode = match (cli.remove_count, cli.keep_statuses.as_deref()) {
    (Some(_), Some(_)) => {
      return Err(ConfigError::ConflictingOptions(
        "use either --remove-count or KEEP_STATUSES, not both",
      ))
    }
    (Some(n), None) => CleanMode::RemoveFirst(n as usize),
    (None, Some(raw)) => {
      let keep = parse_list(raw);
      if keep.is_empty() {
        return Err(ConfigError::MissingArgument("KEEP_STATUSES"));
      }
      CleanMode::Keep(keep)
    }
    (None, None) => return Err(ConfigError::MissingArgument("KEEP_STATUSES (or --remove-count)")),
  };

  Ok(CleanerCommand::Clean(CleanPlan {
    board,
    column,
    mode,
    dry_run: cli.dry_run,
    assume_yes: cli.yes,
  }))
}

pub type Confirm<'a> = &'a mut dyn FnMut(&str) -> Result<bool>;

pub fn run(cmd: &CleanerCommand, api: &dyn JiraApi, out: &mut dyn Write, confirm: Confirm<'_>) -> Result<()> {
  let me = api.myself().context("connecting to Jira")?;
  writeln!(out, "Connected as: {}", me.fetch("displayName").str().unwrap_or("Unknown"))?;

  match cmd {
    CleanerCommand::FindStatus(name) => find_status(api, out, name),
    CleanerCommand::ListColumnStatuses { board, column } => list_column_statuses(api, out, board, column),
    CleanerCommand::ListBoards => list_boards(api, out),
    CleanerCommand::ShowConfig { board } => show_config(api, out, board),
    CleanerCommand::Clean(plan) => clean(api, out, plan, confirm),
  }
}

fn status_name(api: &dyn JiraApi, id: &str) -> Option<String> {
  api
    .status(id)
    .ok()
    .flatten()
    .and_then(|s| s.fetch("name").str().map(str::to_string))
}

fn status_label(api: &dyn JiraApi, id: &str) -> String {
  match status_name(api, id) {
    Some(name) => format!("{name} (ID: {id})"),
    None => format!("ID_{id}"),
  }
}

fn find_status(api: &dyn JiraApi, out: &mut dyn Write, needle: &str) -> Result<()> {
  let all = api.statuses().context("listing statuses")?;
  let hits = board::search_statuses(&all, needle);
  if hits.is_empty() {
    writeln!(out, "No statuses found containing '{needle}'")?;
    return Ok(());
  }
  writeln!(out, "Found {} matching status(es):", hits.len())?;
  for s in &hits {
    writeln!(
      out,
      "  ID: {} | Name: '{}' | Description: {}",
      board::id_of(s).unwrap_or_default(),
      s.fetch("name").str().unwrap_or_default(),
      s.fetch("description").str().filter(|d| !d.is_empty()).unwrap_or("No description"),
    )?;
  }
  Ok(())
}

fn load_config(api: &dyn JiraApi, board_id: &str) -> Result<serde_json::Value> {
  api
    .board_configuration(board_id)
    .with_context(|| format!("getting configuration for board {board_id}"))
}

fn missing_column(config: &serde_json::Value, column: &str) -> anyhow::Error {
  let available: Vec<&str> = board::columns(config).iter().map(board::column_name).collect();
  anyhow::anyhow!("Column '{column}' not found. Available columns: {}", available.join(", "))
}

fn list_column_statuses(api: &dyn JiraApi, out: &mut dyn Write, board_id: &str, column: &str) -> Result<()> {
  let config = load_config(api, board_id)?;
  let col = board::find_column(&config, column).ok_or_else(|| missing_column(&config, column))?;
  let ids = board::status_ids(col);
  if ids.is_empty() {
    writeln!(out, "Column '{}' has no statuses", board::column_name(col))?;
    return Ok(());
  }
  writeln!(out, "Statuses in '{}' ({} total):", board::column_name(col), ids.len())?;
  for id in &ids {
    writeln!(out, "  {}", status_label(api, id))?;
  }
  Ok(())
}

fn list_boards(api: &dyn JiraApi, out: &mut dyn Write) -> Result<()> {
  let raw = collect_pages(BOARD_PAGE_SIZE, "values", |start, max| {
    api.boards_page(start, max).context("listing boards")
  })?;
  let boards = board::boards_from_json(&raw);
  writeln!(out, "Available Boards ({} total):", boards.len())?;
  for b in &boards {
    writeln!(out, "  {}: {} ({})", b.id, b.name, b.kind)?;
  }
  Ok(())
}

fn show_config(api: &dyn JiraApi, out: &mut dyn Write, board_id: &str) -> Result<()> {
  let config = load_config(api, board_id)?;
  writeln!(out, "Board Configuration:")?;
  writeln!(out, "  Name: {}", config.fetch("name").str().unwrap_or("Unknown"))?;
  writeln!(out, "  Type: {}", config.fetch("type").str().unwrap_or("Unknown"))?;

  let cols = board::columns(&config);
  writeln!(out, "\nColumns ({}):", cols.len())?;
  for (i, col) in cols.iter().enumerate() {
    let ids = board::status_ids(col);
    writeln!(out, "  {}. {}", i + 1, board::column_name(col))?;
    if ids.is_empty() {
      writeln!(out, "     No statuses")?;
    } else if ids.len() <= MAX_NAME_LOOKUPS {
      let names: Vec<String> = ids
        .iter()
        .map(|id| status_name(api, id).unwrap_or_else(|| format!("ID_{id}")))
        .collect();
      writeln!(out, "     Statuses ({}): {}", ids.len(), names.join(", "))?;
    } else {
      let shown: Vec<&str> = ids.iter().take(MAX_IDS_SHOWN).map(String::as_str).collect();
      writeln!(out, "     Status IDs ({}): {}...", ids.len(), shown.join(", "))?;
      writeln!(out, "     (too many statuses to fetch names)")?;
    }
  }
  Ok(())
}

fn clean(api: &dyn JiraApi, out: &mut dyn Write, plan: &CleanPlan, confirm: Confirm<'_>) -> Result<()> {
  let mut config = load_config(api, &plan.board)?;
  let col = board::find_column(&config, &plan.column).ok_or_else(|| missing_column(&config, &plan.column))?;
  let col_name = board::column_name(col).to_string();

  writeln!(out, "Target column: {col_name}")?;
  match &plan.mode {
    CleanMode::RemoveFirst(n) => writeln!(out, "Will remove the first {n} statuses")?,
    CleanMode::Keep(keep) => writeln!(out, "Statuses to keep: {}", keep.join(", "))?,
  }
  if plan.dry_run {
    writeln!(out, "DRY RUN - no changes will be made")?;
  }

  let outcome = board::clean_column(col, &plan.mode, |id| status_name(api, id))?;

  if outcome.removed.is_empty() {
    writeln!(out, "Column '{col_name}' is already clean - nothing to remove")?;
    return Ok(());
  }

  let removed: Vec<String> = outcome.removed.iter().map(|id| status_label(api, id)).collect();
  let kept: Vec<String> = outcome.kept.iter().map(|id| status_label(api, id)).collect();
  writeln!(out, "\nStatuses to be removed:")?;
  for r in &removed {
    writeln!(out, "  - {r}")?;
  }
  writeln!(out, "\nStatuses that will remain:")?;
  for k in &kept {
    writeln!(out, "  + {k}")?;
  }

  if plan.dry_run {
    writeln!(
      out,
      "\nDRY RUN: would remove {} statuses from '{col_name}'",
      removed.len()
    )?;
    return Ok(());
  }

  if !plan.assume_yes {
    let prompt = format!("Remove {} statuses from '{col_name}'? This updates the board permanently", removed.len());
    if !confirm(&prompt)? {
      writeln!(out, "Operation cancelled")?;
      return Ok(());
    }
  }

  if !board::replace_column(&mut config, &col_name, outcome.column) {
    bail!("column '{col_name}' disappeared from the configuration");
  }
  api
    .update_board_configuration(&plan.board, &config)
    .with_context(|| format!("updating board {}", plan.board))?;
  info!(board = %plan.board, column = %col_name, removed = removed.len(), "board updated");

  writeln!(out, "\nCleaned '{col_name}'")?;
  writeln!(out, "  Kept: {}", kept.join(", "))?;
  writeln!(out, "  Removed: {}", removed.join(", "))?;
  Ok(())
}
