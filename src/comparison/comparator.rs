use std::collections::{BTreeMap, BTreeSet};

use crate::comparison::types::*;
use crate::core::{FunctionInfo, StructuralModel};

/// Compares the original and refactored model of one module.
///
/// Matching is by exact name only: a class is compared with the class of the
/// same name, a method with the method of the same name in that class.
pub struct Comparator<'a> {
    original: &'a StructuralModel,
    refactored: &'a StructuralModel,
}

impl<'a> Comparator<'a> {
    pub fn new(original: &'a StructuralModel, refactored: &'a StructuralModel) -> Self {
        Self {
            original,
            refactored,
        }
    }

    pub fn compare(&self) -> ModuleDiff {
        ModuleDiff {
            classes: self.compare_classes(),
            functions: diff_methods(&self.original.functions, &self.refactored.functions),
        }
    }

    fn compare_classes(&self) -> BTreeMap<String, ClassDiff> {
        let names: BTreeSet<&str> = self
            .original
            .classes
            .iter()
            .chain(self.refactored.classes.iter())
            .map(|c| c.name.as_str())
            .collect();

        names
            .into_iter()
            .map(|name| {
                let before = self.original.class(name);
                let after = self.refactored.class(name);
                let status = match (before, after) {
                    (Some(_), Some(_)) => ClassStatus::Retained,
                    (None, _) => ClassStatus::New,
                    (Some(_), None) => ClassStatus::Removed,
                };
                let empty = Vec::new();
                let methods = diff_methods(
                    before.map(|c| &c.methods).unwrap_or(&empty),
                    after.map(|c| &c.methods).unwrap_or(&empty),
                );
                (name.to_string(), ClassDiff { status, methods })
            })
            .collect()
    }
}

/// Diff two method lists by bare name.
pub fn diff_methods(original: &[FunctionInfo], refactored: &[FunctionInfo]) -> MethodDiff {
    let before: BTreeMap<&str, &FunctionInfo> =
        original.iter().map(|m| (m.name.as_str(), m)).collect();
    let after: BTreeMap<&str, &FunctionInfo> =
        refactored.iter().map(|m| (m.name.as_str(), m)).collect();

    let mut diff = MethodDiff::default();
    for (name, old) in &before {
        match after.get(name) {
            Some(new) => {
                diff.common.insert(name.to_string());
                if signature_differs(old, new) {
                    diff.signature_changed.insert(name.to_string());
                }
            }
            None => {
                diff.missing.insert(name.to_string());
            }
        }
    }
    diff.added = after
        .keys()
        .filter(|name| !before.contains_key(*name))
        .map(|name| name.to_string())
        .collect();
    diff
}

fn signature_differs(old: &FunctionInfo, new: &FunctionInfo) -> bool {
    old.parameters != new.parameters || old.has_return_annotation != new.has_return_annotation
}

/// Diff the original and refactored model of a module.
pub fn diff_models(original: &StructuralModel, refactored: &StructuralModel) -> ModuleDiff {
    Comparator::new(original, refactored).compare()
}
