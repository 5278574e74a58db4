use crate::comparison::{ClassDiff, MethodDiff, ModuleDiff};
use crate::complexity::ComplexityMap;
use crate::coverage::CoverageRecord;
use crate::errors::{AuditError, MergeWarning};
use crate::priority::SeverityScore;
use crate::reports::FileIssues;
use crate::testing::MissingTest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Which version of a module a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Original,
    Refactored,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Original => write!(f, "original"),
            Side::Refactored => write!(f, "refactored"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuditStatus {
    Measured,
    /// One side did not parse. All metrics are empty and the record is left
    /// out of ranking.
    ParseFailed {
        side: Side,
        line: Option<usize>,
        message: String,
    },
}

/// External finding counts. `None` means the report was not supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCounts {
    pub mypy: Option<usize>,
    pub lint: Option<usize>,
    pub docstrings: Option<usize>,
}

impl ExternalCounts {
    pub fn from_issues(issues: &FileIssues) -> Self {
        Self {
            mypy: issues.mypy.as_ref().map(Vec::len),
            lint: issues.lint.as_ref().map(Vec::len),
            docstrings: issues.docstrings.as_ref().map(Vec::len),
        }
    }
}

/// Everything known about one audited file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub path: PathBuf,
    pub status: AuditStatus,
    pub classes: BTreeMap<String, ClassDiff>,
    pub functions: MethodDiff,
    pub complexity: ComplexityMap,
    pub coverage: BTreeMap<String, CoverageRecord>,
    /// No coverage source referenced the file.
    pub coverage_fallback: bool,
    pub counts: ExternalCounts,
    pub issues: FileIssues,
    pub missing_tests: Vec<MissingTest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MergeWarning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityScore>,
}

impl AuditRecord {
    /// A record for a module one side of which failed to parse.
    pub fn degraded(path: impl Into<PathBuf>, side: Side, error: &AuditError) -> Self {
        let (line, message) = match error {
            AuditError::Parse { line, message, .. } => (*line, message.clone()),
            other => (None, other.to_string()),
        };
        Self {
            path: path.into(),
            status: AuditStatus::ParseFailed {
                side,
                line,
                message,
            },
            classes: BTreeMap::new(),
            functions: MethodDiff::default(),
            complexity: ComplexityMap::new(),
            coverage: BTreeMap::new(),
            coverage_fallback: false,
            counts: ExternalCounts::default(),
            issues: FileIssues::default(),
            missing_tests: Vec::new(),
            warnings: Vec::new(),
            severity: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, AuditStatus::ParseFailed { .. })
    }

    pub fn diff(&self) -> ModuleDiff {
        ModuleDiff {
            classes: self.classes.clone(),
            functions: self.functions.clone(),
        }
    }

    pub fn method_count(&self) -> usize {
        self.complexity.len()
    }

    /// Mean complexity, 0 for a file without methods.
    pub fn average_complexity(&self) -> f64 {
        crate::complexity::average_complexity(&self.complexity)
    }

    /// Mean coverage percent, 100 for a file without methods.
    pub fn average_coverage(&self) -> f64 {
        if self.coverage.is_empty() {
            return 100.0;
        }
        self.coverage.values().map(|r| r.coverage).sum::<f64>() / self.coverage.len() as f64
    }
}
