//! Path reconciliation between audited modules and external reports.
//!
//! Coverage tools, linters and type checkers rarely agree on how to spell a
//! path: some emit absolute paths from the CI checkout, some emit paths
//! relative to the project root, some prefix `./`.
//!
//! Report entries are attributed to modules through [`ModuleResolver`].
//! [`paths_match`] is the looser check used where only one module is in
//! question, such as a test file naming its target. It is component-wise
//! and tries, in order:
//!
//! 1. exact equality
//! 2. the query path ends with the reported path
//! 3. the reported path ends with the normalized query path
//! 4. normalized equality

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Normalize a path by removing a leading `./`
pub fn normalize_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let cleaned = path_str.strip_prefix("./").unwrap_or(&path_str);
    PathBuf::from(cleaned)
}

/// Strip the first matching prefix, then normalize.
pub fn strip_any_prefix(path: &Path, prefixes: &[String]) -> PathBuf {
    prefixes
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix).ok())
        .map(normalize_path)
        .unwrap_or_else(|| normalize_path(path))
}

/// Strategy 2: query="/home/user/project/pkg/mod.py" matches reported="pkg/mod.py"
fn matches_suffix_strategy(query_path: &Path, reported: &Path) -> bool {
    !reported.as_os_str().is_empty() && query_path.ends_with(reported)
}

/// Strategy 3: reported="/ci/checkout/pkg/mod.py" matches query="./pkg/mod.py"
fn matches_reverse_suffix_strategy(query_path: &Path, reported: &Path) -> bool {
    let normalized_query = normalize_path(query_path);
    !normalized_query.as_os_str().is_empty() && reported.ends_with(&normalized_query)
}

/// Strategy 4: reported="./pkg/mod.py" matches query="pkg/mod.py"
fn matches_normalized_equality_strategy(query_path: &Path, reported: &Path) -> bool {
    normalize_path(reported) == normalize_path(query_path)
}

/// Whether a reported path refers to the queried module path.
pub fn paths_match(query_path: &Path, reported: &Path) -> bool {
    query_path == reported
        || matches_suffix_strategy(query_path, reported)
        || matches_reverse_suffix_strategy(query_path, reported)
        || matches_normalized_equality_strategy(query_path, reported)
}

/// Resolves reported paths onto the set of audited module paths.
///
/// A reported path belongs to a module when it ends with the module's whole
/// relative path, component-wise. When several modules qualify, as `utils.py`
/// and `pkg/utils.py` both do for `/ci/pkg/utils.py`, the longest one wins.
/// A reported path shorter than a module never resolves to it: `utils.py`
/// does not stand for `pkg/utils.py`.
#[derive(Debug, Clone, Default)]
pub struct ModuleResolver {
    modules: BTreeSet<PathBuf>,
}

impl ModuleResolver {
    pub fn new<I, P>(modules: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            modules: modules
                .into_iter()
                .map(|module| normalize_path(module.as_ref()))
                .filter(|module| !module.as_os_str().is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// The module `reported` refers to, if any.
    pub fn resolve(&self, reported: &Path) -> Option<&Path> {
        let reported = normalize_path(reported);
        self.modules
            .iter()
            .filter(|module| reported.ends_with(module))
            .max_by_key(|module| module.components().count())
            .map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_strategy_matches_relative_report() {
        let query = PathBuf::from("/home/user/project/pkg/mod.py");
        assert!(paths_match(&query, Path::new("pkg/mod.py")));
    }

    #[test]
    fn test_reverse_suffix_strategy_matches_absolute_report() {
        let query = PathBuf::from("./pkg/mod.py");
        assert!(paths_match(&query, Path::new("/ci/checkout/pkg/mod.py")));
    }

    #[test]
    fn test_normalized_equality() {
        assert!(paths_match(Path::new("pkg/mod.py"), Path::new("./pkg/mod.py")));
    }

    #[test]
    fn test_suffix_matching_is_component_wise() {
        assert!(!paths_match(Path::new("pkg/mod.py"), Path::new("/ci/otherpkg/mod.py")));
        assert!(!paths_match(Path::new("pkg/xmod.py"), Path::new("mod.py")));
    }

    #[test]
    fn test_different_files_do_not_match() {
        assert!(!paths_match(Path::new("pkg/a.py"), Path::new("pkg/b.py")));
    }

    #[test]
    fn test_strip_any_prefix() {
        let prefixes = vec!["/ci/checkout".to_string()];
        assert_eq!(
            strip_any_prefix(Path::new("/ci/checkout/pkg/mod.py"), &prefixes),
            PathBuf::from("pkg/mod.py")
        );
        assert_eq!(
            strip_any_prefix(Path::new("./pkg/mod.py"), &prefixes),
            PathBuf::from("pkg/mod.py")
        );
    }

    fn resolver() -> ModuleResolver {
        ModuleResolver::new(["utils.py", "pkg/utils.py", "pkg/mod.py"])
    }

    #[test]
    fn test_resolve_prefers_longest_module() {
        let modules = resolver();
        assert_eq!(
            modules.resolve(Path::new("/ci/checkout/pkg/utils.py")),
            Some(Path::new("pkg/utils.py"))
        );
        assert_eq!(
            modules.resolve(Path::new("/ci/checkout/utils.py")),
            Some(Path::new("utils.py"))
        );
    }

    #[test]
    fn test_shorter_report_never_claims_nested_module() {
        let modules = ModuleResolver::new(["pkg/utils.py"]);
        assert_eq!(modules.resolve(Path::new("utils.py")), None);
        assert_eq!(modules.resolve(Path::new("other/pkg/utils.py")), Some(Path::new("pkg/utils.py")));
    }

    #[test]
    fn test_resolve_normalizes_both_sides() {
        let modules = ModuleResolver::new(["./pkg/mod.py"]);
        assert_eq!(modules.len(), 1);
        assert_eq!(modules.resolve(Path::new("./pkg/mod.py")), Some(Path::new("pkg/mod.py")));
        assert_eq!(modules.resolve(Path::new("pkg/xmod.py")), None);
    }
}
