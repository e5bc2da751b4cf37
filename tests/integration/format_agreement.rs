use once_cell::sync::Lazy;
use regex::Regex;
use test_support::{cmd_bin, fixture_env};

static RE_AVERAGE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"Average Cycle Time \(days\)[^0-9N]*(N/A|[0-9]+\.[0-9])").unwrap());
static RE_MIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"Min Cycle Time \(days\)[^0-9N]*(N/A|[0-9]+)").unwrap());
static RE_MAX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Max Cycle Time \(days\)[^0-9N]*(N/A|[0-9]+)").unwrap());
static RE_CONSOLE_CYCLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^  Cycle Time \(days\): (\S+)$").unwrap());
static RE_HTML_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"<td>(.*?)</td>").unwrap());

fn render(format: &str, search: Option<&str>) -> String {
  render_with(format, search, &["--detailed"])
}

fn render_with(format: &str, search: Option<&str>, extra: &[&str]) -> String {
  let mut cmd = cmd_bin("jira-cycle-report");
  match search {
    Some(file) => fixture_env(&mut cmd, &[("JCR_TEST_SEARCH_JSON", file)]),
    None => {
      cmd.env("JCR_TEST_SEARCH_JSON", "[]");
    }
  }
  let out = cmd
    .args(["PROJ", "", "bug", "2024-01-01", "2024-01-31", "--format", format])
    .args(extra)
    .output()
    .unwrap();
  assert!(out.status.success(), "{format}: {}", String::from_utf8_lossy(&out.stderr));
  String::from_utf8(out.stdout).unwrap()
}

fn first_capture(re: &Regex, text: &str) -> String {
  re.captures(text)
    .map(|c| c[1].to_string())
    .unwrap_or_else(|| panic!("no match for {} in:\n{text}", re.as_str()))
}

fn average_in(text: &str) -> String {
  first_capture(&RE_AVERAGE, text)
}

/// The per-issue "Cycle Time (days)" cells, in listing order.
fn issue_cycle_cells(format: &str, text: &str) -> Vec<String> {
  // Table formats: the cycle cell sits just before the trailing note cell, which keeps
  // escaped pipes in summaries from shifting the count.
  let from_end = |line: &str| {
    let cells: Vec<&str> = line.split('|').collect();
    cells[cells.len() - 3].trim().to_string()
  };
  match format {
    "console" => RE_CONSOLE_CYCLE.captures_iter(text).map(|c| c[1].to_string()).collect(),
    "markdown" => text.lines().filter(|l| l.starts_with("| PROJ-")).map(from_end).collect(),
    "confluence" => text.lines().filter(|l| l.starts_with("|PROJ-")).map(from_end).collect(),
    "html" => text
      .lines()
      .filter(|l| l.starts_with("<tr><td>PROJ-"))
      .map(|l| {
        let cells: Vec<String> = RE_HTML_CELL.captures_iter(l).map(|c| c[1].to_string()).collect();
        cells[7].clone()
      })
      .collect(),
    "csv" => {
      let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
      reader
        .records()
        .map(|r| r.unwrap())
        .filter(|r| r.len() == 9 && r.get(0).is_some_and(|k| k.starts_with("PROJ-")))
        .map(|r| r[7].to_string())
        .collect()
    }
    other => panic!("unknown format {other}"),
  }
}

const FORMATS: [&str; 5] = ["console", "markdown", "html", "confluence", "csv"];

#[test]
fn every_format_reports_the_same_overall_average() {
  for format in FORMATS {
    assert_eq!(average_in(&render(format, Some("search.json"))), "2.5", "{format}");
  }
}

#[test]
fn every_format_agrees_on_min_max_and_issue_cycle_cells() {
  for format in FORMATS {
    let text = render_with(format, Some("search.json"), &[]);
    assert_eq!(first_capture(&RE_MIN, &text), "2", "{format}");
    assert_eq!(first_capture(&RE_MAX, &text), "3", "{format}");
    assert_eq!(issue_cycle_cells(format, &text), vec!["3", "2", "N/A"], "{format}");
  }
}

#[test]
fn every_format_marks_missing_average_the_same_way() {
  for format in FORMATS {
    let text = render(format, None);
    assert_eq!(average_in(&text), "N/A", "{format}");
    assert!(text.contains("No matching issues found."), "{format}");
  }
}

#[test]
fn html_is_a_standalone_escaped_document() {
  let html = render("html", Some("search.json"));
  assert!(html.starts_with("<!DOCTYPE html>"));
  assert!(html.contains("<title>Cycle Time Report - PROJ</title>"));
  assert!(html.contains("Add &lt;export&gt; &amp; import"));
  assert!(!html.contains("<export>"));
  assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn confluence_uses_wiki_tables_and_escapes_pipes() {
  let wiki = render("confluence", Some("search.json"));
  assert!(wiki.starts_with("h1. Cycle Time Report"));
  assert!(wiki.contains("||Metric||Value||"));
  assert!(wiki.contains(r"Fix login \| redirect"));
  assert!(wiki.contains("h2. Component Ranking"));
}

#[test]
fn csv_parses_and_carries_group_rows() {
  let text = render("csv", Some("search.json"));
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .from_reader(text.as_bytes());
  let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

  let average = records
    .iter()
    .find(|r| r.get(0) == Some("Average Cycle Time (days)"))
    .unwrap();
  assert_eq!(average.get(1), Some("2.5"));

  let summary = records.iter().find(|r| r.get(0) == Some("PROJ-1")).unwrap();
  assert_eq!(summary.get(1), Some("Fix login | redirect"));

  let criteria_labels = records.iter().find(|r| r.get(0) == Some("Labels")).unwrap();
  assert_eq!(criteria_labels.get(1), Some("bug"));
}
