//! Module diff engine: classifies methods of the original and refactored
//! version of a module as missing, added or common.

pub mod comparator;
pub mod types;

pub use comparator::{diff_methods, diff_models, Comparator};
pub use types::{ClassDiff, ClassStatus, MethodDiff, ModuleDiff};
