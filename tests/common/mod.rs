// Test utility module for refactor-audit integration tests
#![allow(dead_code)]

use refactor_audit::config::AuditConfig;
use refactor_audit::pipeline::{run_audit, AuditInputs, AuditReport, ModuleSource};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An original and a refactored tree on disk.
pub struct ProjectPair {
    pub dir: TempDir,
}

impl ProjectPair {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("before")).unwrap();
        fs::create_dir_all(dir.path().join("after")).unwrap();
        Self { dir }
    }

    pub fn original_root(&self) -> PathBuf {
        self.dir.path().join("before")
    }

    pub fn refactored_root(&self) -> PathBuf {
        self.dir.path().join("after")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_original(&self, relative: &str, source: &str) -> &Self {
        write(&self.original_root().join(relative), source);
        self
    }

    pub fn write_refactored(&self, relative: &str, source: &str) -> &Self {
        write(&self.refactored_root().join(relative), source);
        self
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        write(&path, contents);
        path
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

pub fn module(path: &str, original: &str, refactored: &str) -> ModuleSource {
    ModuleSource::new(path, Some(original), Some(refactored))
}

pub fn audit(inputs: AuditInputs) -> AuditReport {
    run_audit(&inputs, &AuditConfig::default()).unwrap()
}
