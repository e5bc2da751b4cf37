use thiserror::Error;

/// Invalid run configuration. Raised before any issue is fetched or computed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  #[error("unknown output format '{0}' (expected one of: console, markdown, html, confluence, csv)")]
  UnknownFormat(String),

  #[error("{0} status list is empty")]
  EmptyStatusSet(&'static str),

  #[error("status '{0}' is listed as both in-progress and done")]
  OverlappingStatus(String),

  #[error("invalid date '{0}', expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("start date {start} is after end date {end}")]
  InvertedRange { start: String, end: String },

  #[error("invalid date window: {0}")]
  InvalidWindow(String),

  #[error("unknown timezone '{0}' (use utc, local, or an IANA name like Europe/Berlin)")]
  UnknownTimezone(String),

  #[error("{0} is required")]
  MissingArgument(&'static str),

  #[error("{0}")]
  ConflictingOptions(&'static str),
}
