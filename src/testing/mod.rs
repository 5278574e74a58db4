//! Test-discovery correlation: flags refactored methods no test references.

pub mod correlator;
pub mod inventory;

pub use correlator::{find_missing_tests, MissingTest};
pub use inventory::{TestInventory, TestReference};
