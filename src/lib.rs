//! Jira cycle-time reporting and board column maintenance.
//!
//! `jira-cycle-report` searches a project for issues completed in a date window, measures the
//! time each spent between its first in-progress and last done transition, and renders the
//! result as console text, Markdown, HTML, Confluence wiki markup, or CSV.
//! `jira-column-cleaner` inspects and trims the statuses mapped to a board column.

pub mod board;
pub mod cleaner;
pub mod cli;
pub mod credentials;
pub mod cycle;
pub mod error;
pub mod ext;
pub mod grouping;
pub mod jira;
pub mod model;
pub mod render;
pub mod report;
pub mod status;
pub mod util;
pub mod window;

/// Install the stderr fmt subscriber. `RUST_LOG` wins; otherwise only warnings are shown.
pub fn init_tracing() {
  use tracing_subscriber::{fmt, EnvFilter};
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}
