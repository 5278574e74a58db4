//! Structural extraction of Python modules.

pub mod extractor;
pub mod python;

pub use extractor::{build_model, extract_file, extract_structure};
pub use python::{parse_python, ParsedSource, SyntaxItem};
