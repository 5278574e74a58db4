use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Method-level difference for one class (or for the module's free
/// functions). `missing`, `added` and `common` are disjoint;
/// `signature_changed` is a subset of `common`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDiff {
    pub missing: BTreeSet<String>,
    pub added: BTreeSet<String>,
    pub common: BTreeSet<String>,
    #[serde(default)]
    pub signature_changed: BTreeSet<String>,
}

impl MethodDiff {
    pub fn is_unchanged(&self) -> bool {
        self.missing.is_empty() && self.added.is_empty() && self.signature_changed.is_empty()
    }

    /// Methods present on the refactored side.
    pub fn present(&self) -> impl Iterator<Item = &String> {
        self.added.iter().chain(self.common.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassStatus {
    /// Present on both sides.
    Retained,
    /// Only in the refactored module.
    New,
    /// Only in the original module.
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDiff {
    pub status: ClassStatus,
    pub methods: MethodDiff,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDiff {
    /// Keyed by class name.
    pub classes: BTreeMap<String, ClassDiff>,
    pub functions: MethodDiff,
}

impl ModuleDiff {
    pub fn total_added(&self) -> usize {
        self.classes.values().map(|c| c.methods.added.len()).sum::<usize>() + self.functions.added.len()
    }

    pub fn total_missing(&self) -> usize {
        self.classes.values().map(|c| c.methods.missing.len()).sum::<usize>()
            + self.functions.missing.len()
    }

    pub fn classes_with_status(&self, status: ClassStatus) -> impl Iterator<Item = &str> {
        self.classes
            .iter()
            .filter(move |(_, diff)| diff.status == status)
            .map(|(name, _)| name.as_str())
    }
}
