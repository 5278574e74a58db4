use super::{read_report, ExternalIssue, IssueReport};
use crate::errors::{AuditError, AuditResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `path:line:col: CODE message`, the concise format of ruff and flake8.
static CONCISE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<file>[^:\n]+):(?P<line>\d+):(?P<col>\d+): (?P<code>[A-Z]+\d+) (?P<message>.*)$")
        .unwrap()
});

#[derive(Debug, Deserialize)]
struct RuffDiagnostic {
    filename: PathBuf,
    #[serde(default)]
    code: Option<String>,
    message: String,
    location: RuffLocation,
}

#[derive(Debug, Deserialize)]
struct RuffLocation {
    row: usize,
}

/// Parse concise text output. Lines that are not diagnostics (summaries,
/// "Found N errors") are skipped.
pub fn parse_lint_text(text: &str) -> IssueReport {
    IssueReport::from_issues(text.lines().filter_map(|line| {
        let caps = CONCISE_LINE.captures(line.trim_end())?;
        Some(ExternalIssue {
            file: caps["file"].into(),
            line: caps["line"].parse().ok()?,
            code: Some(caps["code"].to_string()),
            message: caps["message"].to_string(),
        })
    }))
}

/// Parse `ruff check --output-format json`.
pub fn parse_ruff_json(text: &str) -> Result<IssueReport, serde_json::Error> {
    let diagnostics: Vec<RuffDiagnostic> = serde_json::from_str(text)?;
    Ok(IssueReport::from_issues(diagnostics.into_iter().map(|d| {
        ExternalIssue {
            file: d.filename,
            line: d.location.row,
            code: d.code,
            message: d.message,
        }
    })))
}

/// Parse either format, JSON when the text starts with `[`.
pub fn parse_lint(path: &Path, text: &str) -> AuditResult<IssueReport> {
    if text.trim_start().starts_with('[') {
        parse_ruff_json(text).map_err(|e| AuditError::report(path, format!("invalid ruff JSON: {e}")))
    } else {
        Ok(parse_lint_text(text))
    }
}

pub fn parse_lint_file(path: &Path) -> AuditResult<IssueReport> {
    parse_lint(path, &read_report(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_concise_text() {
        let report = parse_lint_text(indoc! {"
            pkg/mod.py:3:1: F401 [*] `os` imported but unused
            pkg/mod.py:10:80: E501 Line too long (91 > 79)
            ./pkg/util.py:7:5: W605 invalid escape sequence '\\d'
            Found 3 errors.
            [*] 1 fixable with the `--fix` option.
        "});
        let issues = report.issues_for(Path::new("pkg/mod.py"));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].code.as_deref(), Some("F401"));
        assert_eq!(issues[1].line, 10);
        assert_eq!(report.issues_for(Path::new("pkg/util.py")).len(), 1);
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_ruff_json() {
        let report = parse_lint(
            Path::new("ruff.json"),
            indoc! {r#"
                [
                  {
                    "code": "F841",
                    "filename": "/work/repo/pkg/mod.py",
                    "location": {"column": 5, "row": 14},
                    "end_location": {"column": 6, "row": 14},
                    "message": "Local variable `x` is assigned to but never used",
                    "fix": null,
                    "noqa_row": 14,
                    "url": "https://docs.astral.sh/ruff/rules/unused-variable"
                  }
                ]
            "#},
        )
        .unwrap();
        let issues = report.issues_for(Path::new("/work/repo/pkg/mod.py"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 14);
        assert_eq!(issues[0].code.as_deref(), Some("F841"));
    }

    #[test]
    fn test_malformed_json_is_report_error() {
        let err = parse_lint(Path::new("ruff.json"), "[{\"code\": 1}]").unwrap_err();
        assert!(matches!(err, AuditError::Report { .. }));
    }
}
