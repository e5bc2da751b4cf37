use std::path::Path;

use anyhow::{bail, Result};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm};
use is_terminal::IsTerminal;

use jira_cycle_report::cleaner::{plan, run, CleanerCli};
use jira_cycle_report::credentials::{self, CredentialFlags};
use jira_cycle_report::{init_tracing, jira, util};

fn confirm_on_terminal(prompt: &str) -> Result<bool> {
  if !std::io::stdin().is_terminal() {
    bail!("refusing to update the board without confirmation; pass --yes");
  }
  Ok(
    Confirm::with_theme(&ColorfulTheme::default())
      .with_prompt(prompt)
      .default(false)
      .interact()?,
  )
}

fn main() -> Result<()> {
  credentials::load_env_file(Path::new(".env"))?;
  let cli = CleanerCli::parse();
  init_tracing();

  if cli.gen_man {
    print!("{}", util::render_man_page::<CleanerCli>()?);
    return Ok(());
  }

  let cmd = plan(&cli)?;

  let api = if jira::env_wants_mock() {
    jira::build_api(None)?
  } else {
    let flags = CredentialFlags {
      url: cli.jira_url.clone(),
      username: cli.username.clone(),
      password: cli.password.clone(),
    };
    let creds = credentials::resolve(flags, !cli.no_input)?;
    jira::build_api(Some(&creds))?
  };

  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  let mut confirm = confirm_on_terminal;
  run(&cmd, api.as_ref(), &mut out, &mut confirm)
}
