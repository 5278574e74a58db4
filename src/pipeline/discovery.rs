//! Pairs the modules of the original and refactored trees by relative path.

use super::ModuleSource;
use crate::io::walker::find_python_files;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Every `*.py` file under either root, read into a `ModuleSource`. A module
/// present on one side only has `None` for the other.
pub fn discover_modules(
    original_root: &Path,
    refactored_root: &Path,
    excludes: &[String],
) -> Result<Vec<ModuleSource>> {
    let original = find_python_files(original_root, excludes)?;
    let refactored = find_python_files(refactored_root, excludes)?;
    let original_set: BTreeSet<&PathBuf> = original.iter().collect();
    let refactored_set: BTreeSet<&PathBuf> = refactored.iter().collect();

    let modules = original_set
        .union(&refactored_set)
        .map(|relative| {
            let read_side = |root: &Path, present: bool| -> Result<Option<String>> {
                if !present {
                    return Ok(None);
                }
                let path = root.join(relative);
                std::fs::read_to_string(&path)
                    .map(Some)
                    .with_context(|| format!("Failed to read {}", path.display()))
            };
            Ok(ModuleSource {
                path: (*relative).clone(),
                original: read_side(original_root, original_set.contains(relative))?,
                refactored: read_side(refactored_root, refactored_set.contains(relative))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        modules = modules.len(),
        original = original.len(),
        refactored = refactored.len(),
        "Discovered modules"
    );
    Ok(modules)
}
