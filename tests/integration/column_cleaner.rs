use predicates::prelude::*;
use test_support::{cmd_bin, fixture_env, tempdir};

fn cleaner() -> assert_cmd::Command {
  let mut cmd = cmd_bin("jira-column-cleaner");
  fixture_env(
    &mut cmd,
    &[
      ("JCR_TEST_BOARD_CONFIG_JSON", "board_config.json"),
      ("JCR_TEST_STATUSES_JSON", "statuses.json"),
      ("JCR_TEST_BOARDS_JSON", "boards.json"),
      ("JCR_TEST_MYSELF_JSON", "myself.json"),
    ],
  );
  cmd
}

#[test]
fn lists_boards() {
  cleaner()
    .arg("--list-boards")
    .assert()
    .success()
    .stdout(predicate::str::contains("Connected as: Fixture Tester"))
    .stdout(predicate::str::contains("Available Boards (2 total):"))
    .stdout(predicate::str::contains("42: Platform Board (kanban)"));
}

#[test]
fn shows_config_with_status_names() {
  cleaner()
    .args(["42", "--show-config"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Name: Platform Board"))
    .stdout(predicate::str::contains("Statuses (3): In Progress, Doing, In Progress (old)"));
}

#[test]
fn finds_statuses_by_substring() {
  cleaner()
    .args(["--find-status", "progress"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Found 2 matching status(es):"))
    .stdout(predicate::str::contains("ID: 10002 | Name: 'In Progress (old)' | Description: No description"));
}

#[test]
fn lists_column_statuses() {
  cleaner()
    .args(["42", "--list-column-statuses", "in progress"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Doing (ID: 10001)"));
}

#[test]
fn dry_run_never_updates() {
  let td = tempdir();
  let log = td.path().join("update.json");
  cleaner()
    .env("JCR_TEST_UPDATE_LOG", &log)
    .args(["42", "In Progress", "3", "--dry-run"])
    .assert()
    .success()
    .stdout(predicate::str::contains("DRY RUN: would remove 2 statuses from 'In Progress'"));
  assert!(!log.exists());
}

#[test]
fn confirmed_update_sends_whole_configuration() {
  let td = tempdir();
  let log = td.path().join("update.json");
  cleaner()
    .env("JCR_TEST_UPDATE_LOG", &log)
    .args(["42", "in progress", "In Progress,10002", "--yes"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Cleaned 'In Progress'"));

  let sent: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&log).unwrap()).unwrap();
  assert_eq!(sent["name"], "Platform Board");
  assert_eq!(sent["columnConfig"]["constraintType"], "issueCount");
  let columns = sent["columnConfig"]["columns"].as_array().unwrap();
  assert_eq!(columns.len(), 3);
  assert_eq!(columns[1]["max"], 5);
  let ids: Vec<&str> = columns[1]["statuses"]
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["id"].as_str().unwrap())
    .collect();
  assert_eq!(ids, vec!["3", "10002"]);
}

#[test]
fn unconfirmed_update_without_terminal_is_refused() {
  let td = tempdir();
  let log = td.path().join("update.json");
  cleaner()
    .env("JCR_TEST_UPDATE_LOG", &log)
    .args(["42", "In Progress", "--remove-count", "1"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("pass --yes"));
  assert!(!log.exists());
}

#[test]
fn remove_count_must_leave_a_status() {
  cleaner()
    .args(["42", "In Progress", "--remove-count", "3", "--yes"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("only has 3 statuses"));
}

#[test]
fn keep_list_and_remove_count_conflict() {
  cleaner()
    .args(["42", "In Progress", "3", "--remove-count", "1"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("either --remove-count or KEEP_STATUSES"));
}

#[test]
fn unknown_column_lists_choices() {
  cleaner()
    .args(["42", "Review", "3", "--dry-run"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Available columns: To Do, In Progress, Done"));
}
