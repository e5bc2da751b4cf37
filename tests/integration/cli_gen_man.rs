use test_support::cmd_bin;

#[test]
fn report_cli_generates_man_page() {
  let out = cmd_bin("jira-cycle-report").args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage starting with .TH and mentions the binary name
  assert!(s.contains(".TH"));
  assert!(s.contains("jira-cycle-report"));
}

#[test]
fn cleaner_cli_generates_man_page() {
  let out = cmd_bin("jira-column-cleaner").args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  assert!(String::from_utf8_lossy(&out.stdout).contains("jira-column-cleaner"));
}
