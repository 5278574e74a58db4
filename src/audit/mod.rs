//! Audit merger: one `AuditRecord` per file.

pub mod merger;
pub mod record;

pub use merger::{merge, MergeInputs};
pub use record::{AuditRecord, AuditStatus, ExternalCounts, Side};
