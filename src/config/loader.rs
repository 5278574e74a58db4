use std::fs;
use std::path::{Path, PathBuf};

use super::AuditConfig;
use crate::errors::{AuditError, AuditResult};

pub const CONFIG_FILE_NAME: &str = ".refactor-audit.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate config from a TOML string.
pub fn parse_and_validate_config(contents: &str) -> AuditResult<AuditConfig> {
    let config = toml::from_str::<AuditConfig>(contents)
        .map_err(|e| AuditError::config(format!("failed to parse {CONFIG_FILE_NAME}: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Load an explicit config file. A missing or invalid file is an error.
pub fn load_config_from(path: &Path) -> AuditResult<AuditConfig> {
    let contents = fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
    let config = parse_and_validate_config(&contents).map_err(|e| match e {
        AuditError::Configuration(message) => {
            AuditError::config(format!("{}: {message}", path.display()))
        }
        other => other,
    })?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Directories from `start` upwards, at most `max_depth` of them.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest config file searching upwards from `start`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Load the nearest `.refactor-audit.toml` above the current directory, or
/// defaults when there is none. A config file that exists but is invalid is
/// an error, never silently replaced by defaults.
pub fn load_config() -> AuditResult<AuditConfig> {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!("Failed to get current directory: {e}. Using default config.");
            return Ok(AuditConfig::default());
        }
    };
    load_config_near(&current)
}

pub fn load_config_near(start: &Path) -> AuditResult<AuditConfig> {
    match find_config_file(start) {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!(
                "No {CONFIG_FILE_NAME} found after checking {MAX_TRAVERSAL_DEPTH} directories. Using default config."
            );
            Ok(AuditConfig::default())
        }
    }
}

/// The default configuration as commented TOML, written by `init`.
pub fn default_config_toml() -> String {
    let defaults = AuditConfig::default();
    format!(
        r#"# refactor-audit configuration

[scoring]
# score = mypy * mypy_errors + lint * lint_findings
#       + complexity * max(avg_complexity - 1, 0)
#       + coverage * (100 - avg_coverage) / 10
mypy = {:.1}
lint = {:.1}
complexity = {:.1}
coverage = {:.1}

[tiers]
high = {:.1}
medium = {:.1}

[thresholds]
high_complexity = {}

[coverage]
# Prefixes removed from paths in coverage reports before matching.
strip_prefixes = []

[output]
top_offenders = {}
"#,
        defaults.scoring.mypy,
        defaults.scoring.lint,
        defaults.scoring.complexity,
        defaults.scoring.coverage,
        defaults.tiers.high,
        defaults.tiers.medium,
        defaults.thresholds.high_complexity,
        defaults.output.top_offenders,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_toml_round_trips() {
        let parsed = parse_and_validate_config(&default_config_toml()).unwrap();
        assert_eq!(parsed, AuditConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = parse_and_validate_config(indoc! {r#"
            [tiers]
            high = 40.0

            [coverage]
            strip_prefixes = ["/ci/"]
        "#})
        .unwrap();
        assert_eq!(config.tiers.high, 40.0);
        assert_eq!(config.tiers.medium, 15.0);
        assert_eq!(config.coverage.strip_prefixes, vec!["/ci/"]);
        assert_eq!(config.scoring.complexity, 2.0);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let err = parse_and_validate_config("[scoring]\nmypy = -3.0\n").unwrap_err();
        assert!(matches!(err, AuditError::Configuration(_)));
        let err = parse_and_validate_config("[scoring\n").unwrap_err();
        assert!(matches!(err, AuditError::Configuration(_)));
    }

    #[test]
    fn test_finds_config_in_ancestor() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[output]\ntop_offenders = 3\n",
        )
        .unwrap();

        let config = load_config_near(&nested).unwrap();
        assert_eq!(config.output.top_offenders, 3);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config_from(&temp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, AuditError::Io { .. }));
    }

    #[test]
    fn test_directory_ancestors_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }
}
