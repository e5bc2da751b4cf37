use predicates::prelude::*;
use test_support::{cmd_bin, fixture_env};

fn report() -> assert_cmd::Command {
  let mut cmd = cmd_bin("jira-cycle-report");
  fixture_env(&mut cmd, &[("JCR_TEST_SEARCH_JSON", "search.json")]);
  cmd
}

#[test]
fn errors_when_no_time_selection() {
  report()
    .args(["PROJ", "", ""])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Provide START_DATE END_DATE, --month, or --for"));
}

#[test]
fn errors_on_ambiguous_time_selection() {
  report()
    .args(["PROJ", "", "", "2024-01-01", "2024-01-31", "--month", "2024-01"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Ambiguous time selection"));
}

#[test]
fn inverted_dates_are_rejected_before_fetching() {
  report()
    .args(["PROJ", "", "", "2024-02-01", "2024-01-01"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("start date 2024-02-01 is after end date 2024-01-01"));
}

#[test]
fn month_window_is_echoed() {
  report()
    .args(["PROJ", "", "", "--month", "2024-02"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Date Range: 2024-02-01 to 2024-02-29"));
}

#[test]
fn for_phrase_uses_pinned_today() {
  report()
    .args(["PROJ", "", "", "--for", "last month", "--today-override", "2025-08-15"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Date Range: 2025-07-01 to 2025-07-31"));
}

#[test]
fn unknown_for_phrase_fails() {
  report()
    .args(["PROJ", "", "", "--for", "whenever you like", "--today-override", "2025-08-15"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid date window"));
}
