//! Structural model shared by every pipeline stage.

pub mod types;

pub use types::{
    is_private_name, ClassInfo, DuplicateDefinition, FunctionInfo, LineSpan, MethodInfo,
    StructuralModel,
};
