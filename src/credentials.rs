// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Load a .env file and resolve Jira URL/username/password from flags, environment, or prompts
// role: configuration/credentials
// inputs: Optional values from clap (flags or JIRA_* env); a .env path; whether prompting is allowed
// outputs: Credentials with all three fields present and non-empty
// side_effects: load_env_file sets process environment variables that were not already set
// invariants:
// - Variables already present in the environment are never overwritten by .env
// - The password is never printed (Debug redacts it)
// errors: Missing values without an interactive terminal fail with the list of missing items
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, Password};
use is_terminal::IsTerminal;
use tracing::debug;

/// Values as given on the command line or via `JIRA_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialFlags {
  pub url: Option<String>,
  pub username: Option<String>,
  pub password: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  pub url: String,
  pub username: String,
  pub password: String,
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("url", &self.url)
      .field("username", &self.username)
      .field("password", &"***")
      .finish()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Url,
  Username,
  Password,
}

impl Field {
  pub fn label(self) -> &'static str {
    match self {
      Field::Url => "Jira URL (e.g., https://company.atlassian.net)",
      Field::Username => "Jira username",
      Field::Password => "Jira password or API token",
    }
  }

  fn env_name(self) -> &'static str {
    match self {
      Field::Url => "JIRA_URL",
      Field::Username => "JIRA_USERNAME",
      Field::Password => "JIRA_PASSWORD",
    }
  }
}

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped, an optional
/// `export ` prefix is accepted, and matching surrounding quotes are stripped.
pub fn parse_env_lines(text: &str) -> Vec<(String, String)> {
  text
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty() && !l.starts_with('#'))
    .filter_map(|l| {
      let l = l.strip_prefix("export ").unwrap_or(l);
      let (k, v) = l.split_once('=')?;
      let k = k.trim();
      if k.is_empty() {
        return None;
      }
      Some((k.to_string(), unquote(v.trim()).to_string()))
    })
    .collect()
}

fn unquote(v: &str) -> &str {
  for q in ['"', '\''] {
    if v.len() >= 2 && v.starts_with(q) && v.ends_with(q) {
      return &v[1..v.len() - 1];
    }
  }
  v
}

/// Load `path` into the process environment if it exists. Returns how many variables were set.
pub fn load_env_file(path: &Path) -> Result<usize> {
  if !path.exists() {
    return Ok(0);
  }
  let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
  let mut set = 0;
  for (k, v) in parse_env_lines(&text) {
    if std::env::var_os(&k).is_none() {
      std::env::set_var(&k, v);
      set += 1;
    }
  }
  debug!(path = %path.display(), set, "loaded env file");
  Ok(set)
}

/// Fill missing values by prompting on an interactive terminal; otherwise fail listing what is missing.
pub fn resolve(flags: CredentialFlags, interactive: bool) -> Result<Credentials> {
  let mut prompt = prompt_terminal;
  let prompter: Option<Prompter<'_>> = if interactive && std::io::stdin().is_terminal() {
    Some(&mut prompt)
  } else {
    None
  };
  resolve_with(flags, prompter)
}

type Prompter<'a> = &'a mut dyn FnMut(Field) -> Result<String>;

pub fn resolve_with(flags: CredentialFlags, mut prompter: Option<Prompter<'_>>) -> Result<Credentials> {
  let url = take(flags.url, Field::Url, &mut prompter)?;
  let username = take(flags.username, Field::Username, &mut prompter)?;
  let password = take(flags.password, Field::Password, &mut prompter)?;

  match (url, username, password) {
    (Some(url), Some(username), Some(password)) => Ok(Credentials {
      url: url.trim_end_matches('/').to_string(),
      username,
      password,
    }),
    (url, username, password) => {
      let missing: Vec<String> = [
        (url.is_none(), Field::Url),
        (username.is_none(), Field::Username),
        (password.is_none(), Field::Password),
      ]
      .into_iter()
      .filter(|(m, _)| *m)
      .map(|(_, f)| format!("--{} / {}", flag_name(f), f.env_name()))
      .collect();
      bail!("missing Jira credentials: {}", missing.join(", "))
    }
  }
}

fn take(value: Option<String>, field: Field, prompter: &mut Option<Prompter<'_>>) -> Result<Option<String>> {
  if let Some(v) = present(value) {
    return Ok(Some(v));
  }
  match prompter {
    Some(p) => Ok(present(Some((*p)(field)?))),
    None => Ok(None),
  }
}

fn flag_name(f: Field) -> &'static str {
  match f {
    Field::Url => "jira-url",
    Field::Username => "username",
    Field::Password => "password",
  }
}

fn present(v: Option<String>) -> Option<String> {
  v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn prompt_terminal(field: Field) -> Result<String> {
  let theme = ColorfulTheme::default();
  let value = match field {
    Field::Password => Password::with_theme(&theme)
      .with_prompt(field.label())
      .interact()
      .context("reading password")?,
    _ => Input::<String>::with_theme(&theme)
      .with_prompt(field.label())
      .interact_text()
      .with_context(|| format!("reading {}", field.label()))?,
  };
  Ok(value)
}
