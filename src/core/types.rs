use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Leading underscore and not a dunder: `_helper` and `__mangled` are
/// private, `__init__` is not.
pub fn is_private_name(name: &str) -> bool {
    name.starts_with('_') && !(name.starts_with("__") && name.ends_with("__"))
}

/// 1-based inclusive line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    /// Build a span, swapping the bounds if they arrive inverted.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }

    pub fn overlaps(&self, other: &LineSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// A method or free function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    /// `Class.method`, `Outer.Inner.method`, or the bare function name.
    pub qualified_name: String,
    pub class_name: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    pub parameters: Vec<String>,
    pub has_return_annotation: bool,
    pub has_docstring: bool,
    pub is_async: bool,
    /// Lines inside the span where a statement starts. These are the lines a
    /// line-coverage tool can report as executed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statement_lines: Vec<usize>,
}

/// Methods and free functions share one representation.
pub type MethodInfo = FunctionInfo;

impl FunctionInfo {
    /// A function whose every line in `start..=end` is a statement line.
    pub fn new(name: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        let name = name.into();
        let span = LineSpan::new(start_line, end_line);
        Self {
            qualified_name: name.clone(),
            name,
            class_name: None,
            start_line: span.start,
            end_line: span.end,
            parameters: Vec::new(),
            has_return_annotation: false,
            has_docstring: false,
            is_async: false,
            statement_lines: (span.start..=span.end).collect(),
        }
    }

    /// Attach the function to a class, rewriting its qualified name.
    pub fn in_class(mut self, class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        self.qualified_name = format!("{}.{}", class_name, self.name);
        self.class_name = Some(class_name);
        self
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn span(&self) -> LineSpan {
        LineSpan::new(self.start_line, self.end_line)
    }

    /// Number of lines a coverage tool could mark as executed.
    pub fn executable_lines(&self) -> usize {
        self.statement_lines.len()
    }

    pub fn is_private(&self) -> bool {
        is_private_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Unique within the file. Nested classes are named `Outer.Inner`.
    pub name: String,
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, start_line: usize, end_line: usize) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            start_line,
            end_line,
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: FunctionInfo) -> Self {
        self.methods.push(method.in_class(self.name.clone()));
        self
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A definition dropped because a later one in the same scope reused its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateDefinition {
    pub qualified_name: String,
    pub dropped_line: usize,
    pub kept_line: usize,
}

/// Declared classes and functions of one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralModel {
    pub path: PathBuf,
    pub classes: Vec<ClassInfo>,
    pub functions: Vec<FunctionInfo>,
    /// Physical line count of the source text.
    pub line_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<DuplicateDefinition>,
}

impl StructuralModel {
    /// The model of a module that does not exist on one side of the diff.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            classes: Vec::new(),
            functions: Vec::new(),
            line_count: 0,
            duplicates: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Every method and free function, classes first, in source order.
    pub fn all_functions(&self) -> impl Iterator<Item = &FunctionInfo> {
        self.classes
            .iter()
            .flat_map(|c| c.methods.iter())
            .chain(self.functions.iter())
    }

    pub fn function_count(&self) -> usize {
        self.all_functions().count()
    }

    pub fn find(&self, qualified_name: &str) -> Option<&FunctionInfo> {
        self.all_functions()
            .find(|f| f.qualified_name == qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_span_orders_bounds() {
        let span = LineSpan::new(9, 3);
        assert_eq!(span.start, 3);
        assert_eq!(span.end, 9);
        assert_eq!(span.len(), 7);
    }

    #[test]
    fn test_line_span_overlap() {
        assert!(LineSpan::new(1, 5).overlaps(&LineSpan::new(5, 8)));
        assert!(!LineSpan::new(1, 4).overlaps(&LineSpan::new(5, 8)));
    }

    #[test]
    fn test_privacy_rules() {
        assert!(FunctionInfo::new("_helper", 1, 2).is_private());
        assert!(!FunctionInfo::new("__init__", 1, 2).is_private());
        assert!(FunctionInfo::new("__mangled", 1, 2).is_private());
        assert!(!FunctionInfo::new("run", 1, 2).is_private());
    }

    #[test]
    fn test_class_builder_qualifies_methods() {
        let class = ClassInfo::new("Foo", "m.py", 1, 10).with_method(FunctionInfo::new("bar", 2, 5));
        assert_eq!(class.methods[0].qualified_name, "Foo.bar");
        assert_eq!(class.methods[0].class_name.as_deref(), Some("Foo"));
        assert_eq!(class.methods[0].executable_lines(), 4);
    }
}
