use predicates::prelude::*;
use test_support::{cmd_bin, fixture_env, tempdir};

const WINDOW: [&str; 5] = ["PROJ", "Platform", "", "2024-01-01", "2024-01-31"];

fn report() -> assert_cmd::Command {
  let mut cmd = cmd_bin("jira-cycle-report");
  fixture_env(
    &mut cmd,
    &[
      ("JCR_TEST_SEARCH_JSON", "search.json"),
      ("JCR_TEST_MYSELF_JSON", "myself.json"),
    ],
  );
  cmd
}

#[test]
fn console_report_lists_issues_and_summary() {
  let out = report().args(WINDOW).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let s = String::from_utf8_lossy(&out.stdout);

  assert!(s.starts_with("Cycle Time Report\n================="));
  assert!(s.contains("Project: PROJ"));
  assert!(s.contains("Delivery Team: Platform"));
  assert!(s.contains("Labels: (any)"));
  assert!(s.contains("Total Issues: 3"));
  assert!(s.contains("Issues With Cycle Time: 2"));
  assert!(s.contains("Average Cycle Time (days): 2.5"));
  assert!(s.contains("Min Cycle Time (days): 2"));
  assert!(s.contains("Max Cycle Time (days): 3"));
  assert!(s.contains("PROJ-1: Fix login | redirect"));
  assert!(s.contains("  In Progress: 2024-01-10 09:00"));
  assert!(s.contains("  Note: done before in progress"));
  // no grouping without an analysis flag
  assert!(!s.contains("Component Ranking"));
}

#[test]
fn detailed_adds_both_dimensions() {
  let out = report().args(WINDOW).arg("--detailed").output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  let component = s.find("Component Ranking").expect("component ranking");
  let label = s.find("Label Ranking").expect("label ranking");
  assert!(component < label);
  assert!(s.contains("Component Breakdown"));
  assert!(s.contains("[Web]"));
  assert!(s.contains("[API]"));
  assert!(s.contains("[bug]"));
}

#[test]
fn display_timezone_shifts_timestamps() {
  report()
    .args(WINDOW)
    .args(["--tz", "America/New_York"])
    .assert()
    .success()
    .stdout(predicate::str::contains("In Progress: 2024-01-10 04:00"))
    .stdout(predicate::str::contains("Timezone: America/New_York"));
}

#[test]
fn custom_status_sets_change_the_result() {
  // "In Review" as the only in-progress status: PROJ-2 measures from 01-09 10:00 to 01-10 12:00
  report()
    .args(WINDOW)
    .args(["--in-progress-statuses", "In Review", "--done-statuses", "Closed"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Issues With Cycle Time: 1"))
    .stdout(predicate::str::contains("Average Cycle Time (days): 1.0"));
}

#[test]
fn overlapping_status_sets_are_rejected() {
  report()
    .args(WINDOW)
    .args(["--in-progress-statuses", "Done", "--done-statuses", "done"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("listed as both in-progress and done"));
}

#[test]
fn empty_search_reports_no_issues() {
  let mut cmd = cmd_bin("jira-cycle-report");
  cmd.env("JCR_TEST_SEARCH_JSON", "[]");
  cmd
    .args(WINDOW)
    .assert()
    .success()
    .stdout(predicate::str::contains("No matching issues found."))
    .stdout(predicate::str::contains("Average Cycle Time (days): N/A"));
}

#[test]
fn out_writes_file_and_creates_directories() {
  let td = tempdir();
  let target = td.path().join("reports/jan.md");
  let out = report()
    .args(WINDOW)
    .args(["--format", "markdown", "--out"])
    .arg(&target)
    .output()
    .unwrap();
  assert!(out.status.success());
  assert!(out.stdout.is_empty());
  let text = std::fs::read_to_string(&target).unwrap();
  assert!(text.starts_with("# Cycle Time Report"));
  assert!(text.contains(r"Fix login \| redirect"));
}

#[test]
fn dotenv_in_working_directory_is_loaded() {
  let td = tempdir();
  std::fs::write(td.path().join(".env"), "# fixtures\nexport JCR_TEST_SEARCH_JSON='[]'\n").unwrap();
  cmd_bin("jira-cycle-report")
    .current_dir(td.path())
    .args(WINDOW)
    .assert()
    .success()
    .stdout(predicate::str::contains("No matching issues found."));
}

#[test]
fn missing_credentials_fail_without_prompting() {
  cmd_bin("jira-cycle-report")
    .args(WINDOW)
    .arg("--no-input")
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing Jira credentials"));
}

#[test]
fn unknown_format_is_a_usage_error() {
  report()
    .args(WINDOW)
    .args(["--format", "pdf"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("pdf"));
}
