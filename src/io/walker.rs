use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds Python sources under a root, skipping excluded paths.
pub struct FileWalker {
    root: PathBuf,
    ignore_patterns: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    /// Exclude paths matching any glob. Patterns are matched against the
    /// path relative to the root.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.ignore_patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern: {p}")))
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// Python files relative to the root, sorted.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("Failed to walk {}", self.root.display()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "py") {
                continue;
            }
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            if self.should_process(relative) {
                files.push(relative.to_path_buf());
            }
        }
        Ok(files)
    }

    fn should_process(&self, relative: &Path) -> bool {
        !self
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative))
    }
}

pub fn find_python_files(root: &Path, excludes: &[String]) -> Result<Vec<PathBuf>> {
    FileWalker::new(root.to_path_buf())
        .with_ignore_patterns(excludes)?
        .walk()
}
