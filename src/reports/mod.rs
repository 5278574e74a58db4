//! Parsers for externally produced reports: mypy, ruff/flake8 and
//! pydocstyle. The tools themselves are never run, only their output read.

pub mod docstrings;
pub mod lint;
pub mod mypy;

use crate::common::{normalize_path, ModuleResolver};
use crate::errors::{AuditError, AuditResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One finding from an external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIssue {
    pub file: PathBuf,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

/// Findings of one tool, grouped by the path the tool reported.
#[derive(Debug, Clone, Default)]
pub struct IssueReport {
    issues: BTreeMap<PathBuf, Vec<ExternalIssue>>,
}

impl IssueReport {
    pub fn from_issues(issues: impl IntoIterator<Item = ExternalIssue>) -> Self {
        let mut grouped: BTreeMap<PathBuf, Vec<ExternalIssue>> = BTreeMap::new();
        for issue in issues {
            grouped.entry(normalize_path(&issue.file)).or_default().push(issue);
        }
        Self { issues: grouped }
    }

    /// Issues reported under exactly `path`, modulo a leading `./`.
    pub fn issues_for(&self, path: &Path) -> &[ExternalIssue] {
        self.issues
            .get(&normalize_path(path))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Regroup by audited module. Issues on files outside the module set
    /// are dropped.
    pub fn resolve(&self, modules: &ModuleResolver) -> BTreeMap<PathBuf, Vec<ExternalIssue>> {
        let mut resolved: BTreeMap<PathBuf, Vec<ExternalIssue>> = BTreeMap::new();
        for (reported, issues) in &self.issues {
            match modules.resolve(reported) {
                Some(module) => resolved
                    .entry(module.to_path_buf())
                    .or_default()
                    .extend(issues.iter().cloned()),
                None => tracing::trace!(
                    file = %reported.display(),
                    issues = issues.len(),
                    "Report entry matches no audited module"
                ),
            }
        }
        for issues in resolved.values_mut() {
            issues.sort_by_key(|issue| issue.line);
        }
        resolved
    }

    pub fn file_count(&self) -> usize {
        self.issues.len()
    }

    pub fn total(&self) -> usize {
        self.issues.values().map(Vec::len).sum()
    }
}

/// The external reports supplied for a run. `None` means the report was not
/// supplied, so counts derived from it are unknown rather than zero.
#[derive(Debug, Clone, Default)]
pub struct ExternalReports {
    pub mypy: Option<IssueReport>,
    pub lint: Option<IssueReport>,
    pub docstrings: Option<IssueReport>,
}

impl ExternalReports {
    /// Attribute every supplied report to the audited modules.
    pub fn resolve(&self, modules: &ModuleResolver) -> ModuleIssues {
        let resolve = |report: &Option<IssueReport>| report.as_ref().map(|r| r.resolve(modules));
        ModuleIssues {
            mypy: resolve(&self.mypy),
            lint: resolve(&self.lint),
            docstrings: resolve(&self.docstrings),
        }
    }
}

/// External findings keyed by audited module path.
#[derive(Debug, Clone, Default)]
pub struct ModuleIssues {
    mypy: Option<BTreeMap<PathBuf, Vec<ExternalIssue>>>,
    lint: Option<BTreeMap<PathBuf, Vec<ExternalIssue>>>,
    docstrings: Option<BTreeMap<PathBuf, Vec<ExternalIssue>>>,
}

impl ModuleIssues {
    /// Issues of `module` across all supplied reports. A supplied report
    /// with nothing for the module yields an empty list: checked and clean.
    pub fn for_file(&self, module: &Path) -> FileIssues {
        let module = normalize_path(module);
        let lookup = |report: &Option<BTreeMap<PathBuf, Vec<ExternalIssue>>>| {
            report
                .as_ref()
                .map(|r| r.get(&module).cloned().unwrap_or_default())
        };
        FileIssues {
            mypy: lookup(&self.mypy),
            lint: lookup(&self.lint),
            docstrings: lookup(&self.docstrings),
        }
    }
}

/// Issues and counts of one file across all supplied reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIssues {
    pub mypy: Option<Vec<ExternalIssue>>,
    pub lint: Option<Vec<ExternalIssue>>,
    pub docstrings: Option<Vec<ExternalIssue>>,
}

pub(crate) fn read_report(path: &Path) -> AuditResult<String> {
    std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))
}
