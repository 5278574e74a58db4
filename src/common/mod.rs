//! Common utilities shared across the audit pipeline.
//!
//! Key components:
//! - **Path matching**: reconcile paths written by coverage tools, linters and
//!   test inventories with the relative module paths the pipeline audits

pub mod paths;

pub use paths::{normalize_path, paths_match, strip_any_prefix, ModuleResolver};
