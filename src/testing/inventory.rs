//! Test inventory: which source methods the test suite references.
//!
//! Either loaded from a JSON list produced by a test collector, or
//! discovered from a test directory by naming convention:
//!
//! - `test_<module>.py` targets `<module>.py`
//! - `Test<Class>.test_<method>` references `<Class>.<method>`
//! - a top-level `test_<function>` references `<function>`

use crate::common::paths_match;
use crate::errors::{AuditError, AuditResult};
use crate::extraction::extract_structure;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReference {
    pub test_id: String,
    /// Source file the test targets.
    pub file: PathBuf,
    /// `Class.method` or function name the test exercises.
    pub qualified_name: String,
}

impl TestReference {
    /// Whether this reference exercises `qualified_name`.
    ///
    /// Accepts a module-qualified reference (`pkg.mod.Foo.bar`) and a
    /// descriptive suffix on the test name (`Foo.bar_rejects_empty`).
    pub fn covers(&self, qualified_name: &str) -> bool {
        let reference = self.qualified_name.as_str();
        reference == qualified_name
            || reference
                .strip_suffix(qualified_name)
                .is_some_and(|prefix| prefix.ends_with('.'))
            || reference
                .strip_prefix(qualified_name)
                .is_some_and(|rest| rest.starts_with('_'))
    }

    pub fn targets(&self, module: &Path) -> bool {
        self.file.as_os_str().is_empty() || paths_match(module, &self.file)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestInventory {
    pub entries: Vec<TestReference>,
}

impl TestInventory {
    pub fn new(entries: Vec<TestReference>) -> Self {
        Self { entries }
    }

    pub fn from_json(path: &Path, text: &str) -> AuditResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| AuditError::report(path, format!("invalid test inventory: {e}")))
    }

    pub fn load(path: &Path) -> AuditResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
        Self::from_json(path, &text)
    }

    /// Build an inventory from the test files under `dir`. Test files that
    /// fail to parse are skipped with a warning.
    pub fn discover(dir: &Path) -> AuditResult<Self> {
        if !dir.is_dir() {
            return Err(AuditError::io(
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "test directory not found"),
            ));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let Some(module) = target_module(path) else {
                continue;
            };
            let source = match std::fs::read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!("Skipping unreadable test file {}: {e}", path.display());
                    continue;
                }
            };
            match extract_structure(path, &source) {
                Ok(model) => entries.extend(references_in(path, &module, &model)),
                Err(e) => tracing::warn!("Skipping test file: {e}"),
            }
        }

        tracing::debug!(dir = %dir.display(), references = entries.len(), "Discovered tests");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any test targeting `module` exercises `qualified_name`.
    pub fn references(&self, module: &Path, qualified_name: &str) -> bool {
        self.entries
            .iter()
            .any(|r| r.targets(module) && r.covers(qualified_name))
    }
}

/// `tests/test_orders.py` targets `orders.py`.
fn target_module(test_file: &Path) -> Option<PathBuf> {
    if test_file.extension()? != "py" {
        return None;
    }
    let stem = test_file.file_stem()?.to_str()?;
    let module = stem.strip_prefix("test_")?;
    (!module.is_empty()).then(|| PathBuf::from(format!("{module}.py")))
}

fn references_in(
    test_file: &Path,
    module: &Path,
    model: &crate::core::StructuralModel,
) -> Vec<TestReference> {
    let file_id = test_file.display().to_string();
    let reference = |test_name: &str, target: String| TestReference {
        test_id: format!("{file_id}::{test_name}"),
        file: module.to_path_buf(),
        qualified_name: target,
    };

    let methods = model.classes.iter().flat_map(|class| {
        let target_class = class.name.strip_prefix("Test").filter(|c| !c.is_empty());
        class.methods.iter().filter_map(move |method| {
            let target_class = target_class?;
            let target = method.name.strip_prefix("test_")?;
            Some(reference(
                &method.qualified_name,
                format!("{target_class}.{target}"),
            ))
        })
    });

    let functions = model.functions.iter().filter_map(|function| {
        let target = function.name.strip_prefix("test_")?;
        Some(reference(&function.name, target.to_string()))
    });

    methods.chain(functions).collect()
}
