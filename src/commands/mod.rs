//! CLI command implementations.
//!
//! - **audit**: compare an original and a refactored tree and rank files
//! - **init**: write a default `.refactor-audit.toml`

pub mod audit;
pub mod init;

pub use audit::{handle_audit, AuditOptions};
pub use init::init_config;
