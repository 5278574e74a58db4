//! Coverage correlation.
//!
//! Coverage reports are parsed into `CoverageSource`s, merged once per run
//! into a read-only `LineHitIndex`, and then attributed to method line
//! ranges by the `CoverageCorrelator`.

pub mod correlator;
pub mod coverage_py;
pub mod index;
pub mod lcov;

use crate::errors::{AuditError, MergeWarning};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use correlator::CoverageCorrelator;
pub use index::LineHitIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineHit {
    pub line: usize,
    pub hits: u64,
}

/// Line hit counts from one coverage report, keyed by the path the report
/// uses for each file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSource {
    pub name: String,
    pub files: BTreeMap<PathBuf, Vec<LineHit>>,
}

impl CoverageSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: BTreeMap::new(),
        }
    }

    pub fn with_file<I>(mut self, path: impl Into<PathBuf>, lines: I) -> Self
    where
        I: IntoIterator<Item = (usize, u64)>,
    {
        self.files.insert(
            path.into(),
            lines
                .into_iter()
                .map(|(line, hits)| LineHit { line, hits })
                .collect(),
        );
        self
    }
}

/// Coverage attributed to one method or free function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRecord {
    /// Distinct executed lines within the method, after clamping.
    pub hits: usize,
    /// Executable lines within the method.
    pub lines: usize,
    /// Percent in `[0, 100]`.
    pub coverage: f64,
    /// No coverage source referenced the file.
    pub fallback: bool,
    /// `lines == 0`, coverage reported as 0.
    pub undefined: bool,
    pub clamped: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uncovered_lines: Vec<usize>,
}

impl CoverageRecord {
    pub fn fallback(lines: usize) -> Self {
        Self {
            hits: 0,
            lines,
            coverage: 0.0,
            fallback: true,
            undefined: lines == 0,
            clamped: false,
            uncovered_lines: Vec::new(),
        }
    }

    /// Build a record, clamping `hits` to `lines`.
    pub fn measured(hits: usize, lines: usize) -> Self {
        let clamped = hits > lines;
        let hits = hits.min(lines);
        let coverage = if lines == 0 {
            0.0
        } else {
            (hits as f64 / lines as f64 * 100.0).min(100.0)
        };
        Self {
            hits,
            lines,
            coverage,
            fallback: false,
            undefined: lines == 0,
            clamped,
            uncovered_lines: Vec::new(),
        }
    }
}

/// Per-method coverage of one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub fallback: bool,
    /// Keyed by qualified name.
    pub records: BTreeMap<String, CoverageRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MergeWarning>,
}

impl FileCoverage {
    pub fn average(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.values().map(|r| r.coverage).sum();
        Some(sum / self.records.len() as f64)
    }
}

/// Parse a coverage report, picking the format by extension: `.json` is
/// coverage.py JSON, anything else is LCOV.
pub fn load_coverage_source(path: &Path) -> Result<CoverageSource, AuditError> {
    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => coverage_py::parse_coverage_json_file(path),
        _ => lcov::parse_lcov_file(path),
    };
    parsed.map_err(|e| AuditError::coverage_source(path, format!("{e:#}")))
}

/// Load every report. Unusable sources are logged and skipped so the files
/// they would have covered fall back to zero coverage.
pub fn load_coverage_sources(paths: &[PathBuf]) -> Vec<CoverageSource> {
    paths
        .iter()
        .filter_map(|path| match load_coverage_source(path) {
            Ok(source) => {
                tracing::debug!(
                    source = %path.display(),
                    files = source.files.len(),
                    "Loaded coverage source"
                );
                Some(source)
            }
            Err(e) => {
                tracing::warn!("{e}, skipping");
                None
            }
        })
        .collect()
}
