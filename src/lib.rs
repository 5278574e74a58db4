// Export modules for library usage
pub mod audit;
pub mod cli;
pub mod commands;
pub mod common;
pub mod comparison;
pub mod complexity;
pub mod config;
pub mod core;
pub mod coverage;
pub mod errors;
pub mod extraction;
pub mod io;
pub mod pipeline;
pub mod priority;
pub mod reports;
pub mod testing;

// Re-export commonly used types
pub use crate::core::{ClassInfo, FunctionInfo, LineSpan, MethodInfo, StructuralModel};

pub use crate::errors::{AuditError, AuditResult, MergeWarning};

pub use crate::extraction::extract_structure;

pub use crate::comparison::{diff_models, ClassDiff, ClassStatus, MethodDiff, ModuleDiff};

pub use crate::complexity::{analyze_model, analyze_source, ComplexityMap, ComplexityRecord};

pub use crate::coverage::{
    load_coverage_sources, CoverageCorrelator, CoverageRecord, CoverageSource, LineHitIndex,
};

pub use crate::audit::{AuditRecord, AuditStatus, ExternalCounts};

pub use crate::priority::{PriorityTier, RunSummary, SeverityScore, SeverityScorer};

pub use crate::testing::{find_missing_tests, MissingTest, TestInventory, TestReference};

pub use crate::config::AuditConfig;

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::pipeline::{run_audit, AuditInputs, AuditReport, ModuleSource};
