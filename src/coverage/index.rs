//! Merged line-hit index shared by every per-file task of a run.
//!
//! Built once from all coverage sources and never mutated afterwards, so it
//! can be handed to rayon workers by shared reference.

use super::CoverageSource;
use crate::common::{normalize_path, strip_any_prefix, ModuleResolver};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Executed lines of one file, unioned across sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHits {
    pub executed: BTreeSet<usize>,
    /// Every line any source mentioned, executed or not.
    pub instrumented: BTreeSet<usize>,
}

impl FileHits {
    pub fn executed_in(&self, start: usize, end: usize) -> impl Iterator<Item = usize> + '_ {
        self.executed.range(start..=end).copied()
    }
}

/// Line hits keyed by audited module path.
#[derive(Debug, Clone, Default)]
pub struct LineHitIndex {
    files: BTreeMap<PathBuf, FileHits>,
    source_count: usize,
    unresolved: usize,
}

impl LineHitIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge `sources` under the module each reported path resolves to,
    /// after stripping the first matching prefix. Every spelling of one
    /// file, from every source, lands in the same entry.
    pub fn build(
        sources: &[CoverageSource],
        strip_prefixes: &[String],
        modules: &ModuleResolver,
    ) -> Self {
        let mut files: BTreeMap<PathBuf, FileHits> = BTreeMap::new();
        let mut unresolved = 0;
        for source in sources {
            for (path, lines) in &source.files {
                let stripped = strip_any_prefix(path, strip_prefixes);
                let Some(module) = modules.resolve(&stripped) else {
                    tracing::trace!(
                        source = %source.name,
                        file = %path.display(),
                        "Coverage entry matches no audited module"
                    );
                    unresolved += 1;
                    continue;
                };
                let entry = files.entry(module.to_path_buf()).or_default();
                for hit in lines {
                    entry.instrumented.insert(hit.line);
                    if hit.hits > 0 {
                        entry.executed.insert(hit.line);
                    }
                }
            }
        }
        tracing::debug!(
            sources = sources.len(),
            files = files.len(),
            unresolved,
            "Built line-hit index"
        );
        Self {
            files,
            source_count: sources.len(),
            unresolved,
        }
    }

    /// `None` when no source references `module`.
    pub fn get(&self, module: &Path) -> Option<&FileHits> {
        self.files.get(&normalize_path(module))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn source_count(&self) -> usize {
        self.source_count
    }

    /// Reported files that matched no audited module.
    pub fn unresolved_count(&self) -> usize {
        self.unresolved
    }
}
