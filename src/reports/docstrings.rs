use super::{read_report, ExternalIssue, IssueReport};
use crate::errors::AuditResult;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// `pkg/mod.py:12 in public method `run`:` header line.
static LOCATION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<file>\S[^:]*):(?P<line>\d+)\b").unwrap());

/// Indented `D102: Missing docstring in public method` detail line.
static DETAIL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+(?P<code>D\d{3}):\s*(?P<message>.*)$").unwrap());

/// Parse pydocstyle output, where each violation is a location line followed
/// by an indented code line.
pub fn parse_pydocstyle(text: &str) -> IssueReport {
    let mut issues = Vec::new();
    let mut pending: Option<(PathBuf, usize)> = None;

    for line in text.lines() {
        if let Some(caps) = DETAIL_LINE.captures(line) {
            if let Some((file, line_no)) = pending.take() {
                issues.push(ExternalIssue {
                    file,
                    line: line_no,
                    code: Some(caps["code"].to_string()),
                    message: caps["message"].trim().to_string(),
                });
            }
        } else if let Some(caps) = LOCATION_LINE.captures(line) {
            pending = caps["line"]
                .parse()
                .ok()
                .map(|line_no| (PathBuf::from(&caps["file"]), line_no));
        }
    }

    IssueReport::from_issues(issues)
}

pub fn parse_pydocstyle_file(path: &Path) -> AuditResult<IssueReport> {
    Ok(parse_pydocstyle(&read_report(path)?))
}
