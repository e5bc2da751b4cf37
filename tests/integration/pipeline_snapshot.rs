use jira_cycle_report::jira::api::JiraEnvApi;
use jira_cycle_report::jira::parse::issue_from_json;
use jira_cycle_report::jira::search_issues;
use jira_cycle_report::model::{DateRange, Issue, SearchCriteria};
use jira_cycle_report::report::{build_report, ReportConfig};
use jira_cycle_report::status::StatusSets;
use serial_test::serial;
use test_support::{init_insta, read_fixture_json, read_fixture_text, with_env};

fn criteria() -> SearchCriteria {
  let sets = StatusSets::default();
  SearchCriteria {
    project: "PROJ".into(),
    team: String::new(),
    labels: vec![],
    range: DateRange {
      start: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      end: chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    },
    in_progress_statuses: sets.in_progress_names().to_vec(),
    done_statuses: sets.done_names().to_vec(),
  }
}

fn fixture_issues() -> Vec<Issue> {
  let v: serde_json::Value = read_fixture_json("search.json");
  v["issues"]
    .as_array()
    .unwrap()
    .iter()
    .map(|i| issue_from_json(i).unwrap())
    .collect()
}

#[test]
fn overall_stats_snapshot() {
  init_insta();
  let report = build_report(criteria(), fixture_issues(), &ReportConfig::default());
  insta::assert_json_snapshot!(report.overall, @r###"
  {
    "count": 3,
    "with_cycle_time": 2,
    "average": 2.5,
    "min": 2,
    "max": 3,
    "total": 5
  }
  "###);
}

#[test]
fn groups_are_ranked_and_multi_membership() {
  let cfg = ReportConfig {
    component_analysis: true,
    label_analysis: true,
    ..ReportConfig::default()
  };
  let report = build_report(criteria(), fixture_issues(), &cfg);

  let components = report.component_groups.as_ref().unwrap();
  let keys: Vec<&str> = components.iter().map(|g| g.key.as_str()).collect();
  assert_eq!(keys, vec!["Web", "API"]);
  // PROJ-2 counts toward both of its components
  assert_eq!(components[0].stats.average, Some(2.5));
  assert_eq!(components[1].stats.average, Some(2.0));

  let labels = report.label_groups.as_ref().unwrap();
  assert_eq!(labels[0].key, "bug");
  assert_eq!(labels[0].stats.count, 2);
  assert_eq!(labels[0].stats.with_cycle_time, 1);
  assert_eq!(labels[0].stats.average, Some(3.0));
}

#[test]
#[serial]
fn env_fixture_api_pages_through_search() {
  let payload = read_fixture_text("search.json");
  let _env = with_env(&[("JCR_TEST_SEARCH_JSON", payload.as_str())]);
  let issues = search_issues(&JiraEnvApi, &criteria(), 2).unwrap();
  let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
  assert_eq!(keys, vec!["PROJ-1", "PROJ-2", "PROJ-3"]);
}
