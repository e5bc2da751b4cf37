// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Jira collaborator: REST seam, JQL construction, paginated search, payload mapping
// role: module/aggregation
// outputs: JiraApi implementations and search_issues() producing Vec<Issue>
// invariants: Everything network-facing sits behind JiraApi so tests can run on fixtures
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod jql;
pub mod parse;
pub mod search;

pub use api::{build_api, env_wants_mock, JiraApi};
pub use search::search_issues;
