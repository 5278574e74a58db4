//! Build a `StructuralModel` from a parsed source file.
//!
//! Within one scope (module or class body) a later definition with the same
//! name replaces an earlier one, the way Python rebinds the name at runtime.
//! Every replacement is recorded on the model as a `DuplicateDefinition`.

use super::python::{parse_python, ClassNode, FunctionNode, ParsedSource, SyntaxItem};
use crate::core::{ClassInfo, DuplicateDefinition, FunctionInfo, LineSpan, StructuralModel};
use crate::errors::AuditResult;
use std::collections::BTreeMap;
use std::path::Path;

/// Parse `source` and extract its declared classes and functions.
pub fn extract_structure(path: &Path, source: &str) -> AuditResult<StructuralModel> {
    let parsed = parse_python(path, source)?;
    Ok(build_model(&parsed))
}

/// Read and extract a file from disk.
pub fn extract_file(path: &Path) -> AuditResult<StructuralModel> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| crate::errors::AuditError::io(path, e))?;
    extract_structure(path, &source)
}

pub fn build_model(parsed: &ParsedSource) -> StructuralModel {
    let mut model = StructuralModel::empty(parsed.path());
    model.line_count = parsed.line_count();

    let mut functions = Scope::default();
    let mut classes = Scope::default();
    for item in parsed.items() {
        match item {
            SyntaxItem::Function(node) => {
                let info = function_info(&node, None);
                functions.insert(info.name.clone(), info.start_line, info);
            }
            SyntaxItem::Class(node) => {
                collect_class(&node, None, parsed.path(), &mut classes, &mut model.duplicates);
            }
        }
    }

    model.functions = functions.finish(&mut model.duplicates, |name| name.to_string());
    model.classes = drop_orphaned_nested(
        parsed.path(),
        classes.finish(&mut model.duplicates, |name| name.to_string()),
    );
    model.classes.sort_by_key(|c| c.start_line);
    model.functions.sort_by_key(|f| f.start_line);

    for duplicate in &model.duplicates {
        tracing::warn!(
            file = %parsed.path().display(),
            name = %duplicate.qualified_name,
            dropped = duplicate.dropped_line,
            kept = duplicate.kept_line,
            "Duplicate definition, keeping the later one"
        );
    }
    model
}

/// Last-definition-wins bookkeeping for one scope.
struct Scope<T> {
    entries: BTreeMap<String, (usize, T)>,
    dropped: Vec<(String, usize)>,
}

impl<T> Default for Scope<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            dropped: Vec::new(),
        }
    }
}

impl<T> Scope<T> {
    fn insert(&mut self, name: String, line: usize, value: T) {
        if let Some((old_line, _)) = self.entries.insert(name.clone(), (line, value)) {
            self.dropped.push((name, old_line));
        }
    }

    fn finish(
        self,
        duplicates: &mut Vec<DuplicateDefinition>,
        qualify: impl Fn(&str) -> String,
    ) -> Vec<T> {
        for (name, dropped_line) in self.dropped {
            let kept_line = self.entries.get(&name).map(|(line, _)| *line).unwrap_or(0);
            duplicates.push(DuplicateDefinition {
                qualified_name: qualify(&name),
                dropped_line,
                kept_line,
            });
        }
        self.entries.into_values().map(|(_, value)| value).collect()
    }
}

fn collect_class(
    node: &ClassNode<'_>,
    outer: Option<&str>,
    file: &Path,
    classes: &mut Scope<ClassInfo>,
    duplicates: &mut Vec<DuplicateDefinition>,
) {
    let name = match outer {
        Some(outer) => format!("{outer}.{}", node.name),
        None => node.name.clone(),
    };

    let mut methods = Scope::default();
    for member in &node.members {
        match member {
            SyntaxItem::Function(function) => {
                let info = function_info(function, Some(&name));
                methods.insert(info.name.clone(), info.start_line, info);
            }
            SyntaxItem::Class(inner) => collect_class(inner, Some(&name), file, classes, duplicates),
        }
    }

    let mut class = ClassInfo::new(name.clone(), file, node.span.start, node.span.end);
    class.methods = methods.finish(duplicates, |method| format!("{name}.{method}"));
    class.methods.sort_by_key(|m| m.start_line);
    classes.insert(name, node.span.start, class);
}

/// Nested classes live in the module-wide class scope, so replacing `Outer`
/// leaves the old `Outer.Inner` behind. Keep a nested class only while every
/// enclosing class that survived still contains it.
fn drop_orphaned_nested(file: &Path, classes: Vec<ClassInfo>) -> Vec<ClassInfo> {
    let spans: BTreeMap<String, LineSpan> = classes
        .iter()
        .map(|c| (c.name.clone(), LineSpan::new(c.start_line, c.end_line)))
        .collect();
    classes
        .into_iter()
        .filter(|class| {
            let enclosed = class.name.match_indices('.').all(|(i, _)| {
                spans
                    .get(&class.name[..i])
                    .is_some_and(|outer| outer.contains(class.start_line))
            });
            if !enclosed {
                tracing::debug!(
                    file = %file.display(),
                    class = %class.name,
                    "Dropping nested class of a replaced definition"
                );
            }
            enclosed
        })
        .collect()
}

fn function_info(node: &FunctionNode<'_>, class_name: Option<&str>) -> FunctionInfo {
    let mut info = FunctionInfo::new(node.name.clone(), node.span.start, node.span.end)
        .with_parameters(node.parameters.iter().cloned());
    info.has_return_annotation = node.has_return_annotation;
    info.has_docstring = node.has_docstring;
    info.is_async = node.is_async;
    info.statement_lines = node.statement_lines.clone();
    match class_name {
        Some(class_name) => info.in_class(class_name),
        None => info,
    }
}
