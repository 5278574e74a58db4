use super::inventory::TestInventory;
use crate::comparison::{MethodDiff, ModuleDiff};
use crate::core::is_private_name;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A method on the refactored side that no test references.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissingTest {
    pub class: Option<String>,
    pub method: String,
}

impl MissingTest {
    pub fn qualified_name(&self) -> String {
        match &self.class {
            Some(class) => format!("{class}.{}", self.method),
            None => self.method.clone(),
        }
    }
}

/// Methods of `diff`'s refactored side that lack tests.
///
/// Private helpers (single leading underscore, not dunder) are never
/// reported. Of the rest:
///
/// - `fallback` (no coverage data for the module): every added or common
///   method is reported, whatever the inventory says.
/// - otherwise, with an inventory: the methods no test references.
/// - otherwise nothing is reported, there is no evidence either way.
pub fn find_missing_tests(
    module: &Path,
    diff: &ModuleDiff,
    inventory: Option<&TestInventory>,
    fallback: bool,
) -> Vec<MissingTest> {
    if !fallback && inventory.is_none() {
        return Vec::new();
    }

    let classes = diff
        .classes
        .iter()
        .flat_map(|(class, class_diff)| candidates(Some(class.as_str()), &class_diff.methods));
    let functions = candidates(None, &diff.functions);

    classes
        .chain(functions)
        .filter(|missing| !is_private_name(&missing.method))
        .filter(|missing| {
            if fallback {
                return true;
            }
            !inventory
                .map(|inv| inv.references(module, &missing.qualified_name()))
                .unwrap_or(false)
        })
        .collect()
}

fn candidates<'a>(class: Option<&'a str>, methods: &'a MethodDiff) -> impl Iterator<Item = MissingTest> + 'a {
    methods.present().map(move |method| MissingTest {
        class: class.map(str::to_string),
        method: method.clone(),
    })
}
