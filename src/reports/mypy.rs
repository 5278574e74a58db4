use super::{read_report, ExternalIssue, IssueReport};
use crate::errors::AuditResult;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static ERROR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<file>[^:\n]+):(?P<line>\d+)(?::\d+)?: error: (?P<message>.*?)(?:\s+\[(?P<code>[\w-]+)\])?\s*$",
    )
    .unwrap()
});

/// Parse mypy's default text output. Only `error:` lines count; notes and
/// the trailing summary line are ignored.
pub fn parse_mypy(text: &str) -> IssueReport {
    IssueReport::from_issues(text.lines().filter_map(|line| {
        let caps = ERROR_LINE.captures(line)?;
        Some(ExternalIssue {
            file: caps["file"].into(),
            line: caps["line"].parse().ok()?,
            code: caps.name("code").map(|m| m.as_str().to_string()),
            message: caps["message"].to_string(),
        })
    }))
}

pub fn parse_mypy_file(path: &Path) -> AuditResult<IssueReport> {
    Ok(parse_mypy(&read_report(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_errors_notes_and_summary() {
        let report = parse_mypy(indoc! {r#"
            pkg/mod.py:12: error: Incompatible return value type (got "int", expected "str")  [return-value]
            pkg/mod.py:12: note: Revealed type is "int"
            pkg/mod.py:30:5: error: Missing positional argument "x" in call to "f"  [call-arg]
            pkg/other.py:1: error: Cannot find implementation or library stub
            Found 3 errors in 2 files (checked 5 source files)
        "#});

        let issues = report.issues_for(Path::new("pkg/mod.py"));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line, 12);
        assert_eq!(issues[0].code.as_deref(), Some("return-value"));
        assert_eq!(
            issues[0].message,
            r#"Incompatible return value type (got "int", expected "str")"#
        );
        assert_eq!(issues[1].line, 30);

        let other = report.issues_for(Path::new("pkg/other.py"));
        assert_eq!(other[0].code, None);
        assert_eq!(report.total(), 3);
    }
}
