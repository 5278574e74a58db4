//! Error types for audit operations.
//!
//! Errors are split by how far they propagate:
//!
//! - `Parse` is per-file. The pipeline turns it into a degraded `AuditRecord`
//!   and keeps going.
//! - `CoverageSource` is per-source. The source is skipped, files it would
//!   have covered fall back to zero coverage.
//! - `Configuration` is fatal and is raised before any file is processed.
//! - `Report` and `Io` come from the input adapters.
//!
//! Data-quality problems found while merging (`MergeWarning`) are not errors
//! at all: they are attached to the affected record.
//!
//! # Example
//!
//! ```rust
//! use refactor_audit::errors::AuditError;
//!
//! let err = AuditError::parse("pkg/mod.py", Some(12), "unexpected indent");
//! assert!(err.is_per_file());
//! assert!(!AuditError::config("negative weight").is_per_file());
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unified error type for the audit pipeline and its adapters.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Source text the parser cannot handle.
    #[error("parse error in {}{}: {message}", .path.display(), .line.map(|l| format!(":{l}")).unwrap_or_default())]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    /// A coverage report that could not be read or parsed.
    #[error("coverage source {} unusable: {message}", .path.display())]
    CoverageSource { path: PathBuf, message: String },

    /// Invalid severity weights, thresholds or other settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An external lint/type/docstring/test report that could not be parsed.
    #[error("report {} unusable: {message}", .path.display())]
    Report { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AuditError {
    pub fn parse(path: impl Into<PathBuf>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn coverage_source(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CoverageSource {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn report(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Report {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is isolated to a single file or source and must not
    /// abort the run.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::CoverageSource { .. })
    }
}

pub type AuditResult<T> = Result<T, AuditError>;

/// A data-quality problem detected while merging, attached to the record it
/// affects instead of aborting anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeWarning {
    /// A source reported more executed lines than the method has.
    CoverageClamped {
        method: String,
        reported_hits: usize,
        lines: usize,
    },
    /// Coverage data referenced a method the structural model does not have.
    UnknownMethodCoverage { method: String },
    /// Executed lines past the end of the file, usually a stale report.
    LinesBeyondEndOfFile { count: usize },
    /// The extractor collapsed two definitions with the same qualified name.
    DuplicateDefinition { qualified_name: String, kept_line: usize },
}

impl std::fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoverageClamped {
                method,
                reported_hits,
                lines,
            } => write!(
                f,
                "{method}: {reported_hits} executed lines reported for {lines} executable lines, clamped"
            ),
            Self::UnknownMethodCoverage { method } => {
                write!(f, "coverage for unknown method '{method}' dropped")
            }
            Self::LinesBeyondEndOfFile { count } => {
                write!(f, "{count} executed lines past the end of the file")
            }
            Self::DuplicateDefinition {
                qualified_name,
                kept_line,
            } => write!(
                f,
                "duplicate definition of '{qualified_name}', kept the one at line {kept_line}"
            ),
        }
    }
}
