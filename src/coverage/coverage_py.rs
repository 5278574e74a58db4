use super::{CoverageSource, LineHit};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The subset of `coverage json` output that carries line data.
#[derive(Debug, Deserialize)]
struct CoverageJson {
    files: BTreeMap<PathBuf, FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    #[serde(default)]
    executed_lines: Vec<usize>,
    #[serde(default)]
    missing_lines: Vec<usize>,
}

/// Parse coverage.py JSON text. Executed lines get one hit, missing lines
/// zero.
pub fn parse_coverage_json(name: &str, text: &str) -> Result<CoverageSource> {
    let report: CoverageJson =
        serde_json::from_str(text).context("Failed to parse coverage.py JSON")?;

    let mut source = CoverageSource::new(name);
    for (path, entry) in report.files {
        let mut lines: Vec<LineHit> = entry
            .executed_lines
            .iter()
            .map(|&line| LineHit { line, hits: 1 })
            .chain(entry.missing_lines.iter().map(|&line| LineHit { line, hits: 0 }))
            .collect();
        lines.sort_by_key(|hit| hit.line);
        source.files.insert(path, lines);
    }
    Ok(source)
}

pub fn parse_coverage_json_file(path: &Path) -> Result<CoverageSource> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read coverage file: {}", path.display()))?;
    parse_coverage_json(&path.display().to_string(), &text)
}
