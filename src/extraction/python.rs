//! Tree-sitter parsing and lowering of Python definitions.
//!
//! The raw syntax tree is lowered into `SyntaxItem` variants once; later
//! stages pattern-match on the variants instead of inspecting node kinds.

use crate::core::LineSpan;
use crate::errors::{AuditError, AuditResult};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Node kinds that mark a line a line-coverage tool can report as executed.
const STATEMENT_LIKE: &[&str] = &[
    "function_definition",
    "class_definition",
    "decorator",
    "elif_clause",
    "except_clause",
    "except_group_clause",
    "case_clause",
];

/// A successfully parsed source file. Owns the text and the tree.
pub struct ParsedSource {
    path: PathBuf,
    source: String,
    tree: Tree,
}

/// A definition recovered from the tree.
#[derive(Debug, Clone)]
pub enum SyntaxItem<'t> {
    Class(ClassNode<'t>),
    Function(FunctionNode<'t>),
}

#[derive(Debug, Clone)]
pub struct ClassNode<'t> {
    pub name: String,
    pub span: LineSpan,
    pub members: Vec<SyntaxItem<'t>>,
}

#[derive(Debug, Clone)]
pub struct FunctionNode<'t> {
    pub name: String,
    /// Starts at the first decorator when the definition is decorated.
    pub span: LineSpan,
    pub parameters: Vec<String>,
    pub has_return_annotation: bool,
    pub has_docstring: bool,
    pub is_async: bool,
    pub statement_lines: Vec<usize>,
    /// The `block` node. `None` only for trees tree-sitter recovered oddly.
    pub body: Option<Node<'t>>,
}

impl ParsedSource {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Lower the module's top-level definitions.
    pub fn items(&self) -> Vec<SyntaxItem<'_>> {
        lower_block(self.root(), self.source.as_bytes())
    }
}

/// Parse Python source text. Any ERROR or MISSING node makes the file a
/// parse failure, reported at the first offending line.
pub fn parse_python(path: &Path, source: &str) -> AuditResult<ParsedSource> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| AuditError::parse(path, None, format!("failed to load Python grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| AuditError::parse(path, None, "parser produced no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, message) = match first_error(root) {
            Some(node) if node.is_missing() => (
                Some(node.start_position().row + 1),
                format!("missing '{}'", node.kind()),
            ),
            Some(node) => (Some(node.start_position().row + 1), "invalid syntax".to_string()),
            None => (None, "invalid syntax".to_string()),
        };
        return Err(AuditError::parse(path, line, message));
    }

    Ok(ParsedSource {
        path: path.to_path_buf(),
        source: source.to_string(),
        tree,
    })
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

fn text<'a>(node: Node<'_>, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or_default()
}

/// Convert a node's end position to a 1-based inclusive line.
fn end_line(node: Node<'_>) -> usize {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        end.row
    } else {
        end.row + 1
    }
}

fn lower_block<'t>(block: Node<'t>, src: &[u8]) -> Vec<SyntaxItem<'t>> {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .filter_map(|child| lower_definition(child, child, src))
        .collect()
}

/// `outer` is the node whose start line opens the definition: the
/// `decorated_definition` when there is one, the definition itself otherwise.
fn lower_definition<'t>(node: Node<'t>, outer: Node<'t>, src: &[u8]) -> Option<SyntaxItem<'t>> {
    match node.kind() {
        "decorated_definition" => node
            .child_by_field_name("definition")
            .and_then(|definition| lower_definition(definition, outer, src)),
        "function_definition" => Some(SyntaxItem::Function(lower_function(node, outer, src))),
        "class_definition" => Some(SyntaxItem::Class(lower_class(node, outer, src))),
        _ => None,
    }
}

fn lower_class<'t>(node: Node<'t>, outer: Node<'t>, src: &[u8]) -> ClassNode<'t> {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, src).to_string())
        .unwrap_or_default();
    let members = node
        .child_by_field_name("body")
        .map(|body| lower_block(body, src))
        .unwrap_or_default();

    ClassNode {
        name,
        span: LineSpan::new(outer.start_position().row + 1, end_line(node)),
        members,
    }
}

fn lower_function<'t>(node: Node<'t>, outer: Node<'t>, src: &[u8]) -> FunctionNode<'t> {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, src).to_string())
        .unwrap_or_default();
    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| {
            let mut cursor = params.walk();
            params
                .named_children(&mut cursor)
                .filter_map(|p| parameter_name(p, src))
                .collect()
        })
        .unwrap_or_default();
    let body = node.child_by_field_name("body");
    let is_async = node
        .child(0)
        .map(|first| first.kind() == "async")
        .unwrap_or(false);

    let mut statement_lines = Vec::new();
    collect_statement_lines(outer, &mut statement_lines);
    statement_lines.sort_unstable();
    statement_lines.dedup();

    FunctionNode {
        name,
        span: LineSpan::new(outer.start_position().row + 1, end_line(node)),
        parameters,
        has_return_annotation: node.child_by_field_name("return_type").is_some(),
        has_docstring: body.map(has_docstring).unwrap_or(false),
        is_async,
        statement_lines,
        body,
    }
}

fn parameter_name(node: Node<'_>, src: &[u8]) -> Option<String> {
    match node.kind() {
        "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {
            Some(text(node, src).to_string())
        }
        "default_parameter" | "typed_default_parameter" => node
            .child_by_field_name("name")
            .map(|n| text(n, src).to_string()),
        "typed_parameter" => node.named_child(0).and_then(|n| parameter_name(n, src)),
        "keyword_separator" => Some("*".to_string()),
        "positional_separator" => Some("/".to_string()),
        _ => None,
    }
}

fn is_statement_like(kind: &str) -> bool {
    kind.ends_with("_statement") || STATEMENT_LIKE.contains(&kind)
}

fn collect_statement_lines(node: Node<'_>, lines: &mut Vec<usize>) {
    if is_statement_like(node.kind()) {
        lines.push(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_statement_lines(child, lines);
    }
}

/// Non-comment statements of a block.
pub(crate) fn block_statements<'t>(block: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

fn is_string_statement(statement: Node<'_>) -> bool {
    statement.kind() == "expression_statement"
        && statement
            .named_child(0)
            .map(|expr| matches!(expr.kind(), "string" | "concatenated_string"))
            .unwrap_or(false)
}

fn has_docstring(block: Node<'_>) -> bool {
    block_statements(block)
        .first()
        .map(|first| is_string_statement(*first))
        .unwrap_or(false)
}

/// A body made only of `pass`, `...`, a docstring, or
/// `raise NotImplementedError`.
pub fn is_stub_body(block: Node<'_>, src: &[u8]) -> bool {
    let statements = block_statements(block);
    !statements.is_empty()
        && statements.iter().all(|statement| match statement.kind() {
            "pass_statement" => true,
            "expression_statement" => statement
                .named_child(0)
                .map(|expr| matches!(expr.kind(), "ellipsis" | "string" | "concatenated_string"))
                .unwrap_or(false),
            "raise_statement" => text(*statement, src).contains("NotImplementedError"),
            _ => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn functions<'t>(items: &[SyntaxItem<'t>]) -> Vec<FunctionNode<'t>> {
        items
            .iter()
            .filter_map(|item| match item {
                SyntaxItem::Function(f) => Some(f.clone()),
                SyntaxItem::Class(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let source = indoc! {"
            def ok():
                return 1

            def broken(:
                pass
        "};
        let err = parse_python(Path::new("m.py"), source).err().unwrap();
        match err {
            AuditError::Parse { line, .. } => assert_eq!(line, Some(4)),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_decorated_function_span_includes_decorator() {
        let source = indoc! {"
            import functools

            @functools.cache
            def cached(x):
                return x * 2
        "};
        let parsed = parse_python(Path::new("m.py"), source).unwrap();
        let items = parsed.items();
        let funcs = functions(&items);
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].span, LineSpan::new(3, 5));
        assert_eq!(funcs[0].statement_lines, vec![3, 4, 5]);
    }

    #[test]
    fn test_parameters_are_rendered_by_name() {
        let source = indoc! {"
            def f(self, a, b: int, c=1, d: str = 'x', *args, e, **kwargs) -> None:
                pass

            def g(a, /, b, *, c):
                pass
        "};
        let parsed = parse_python(Path::new("m.py"), source).unwrap();
        let items = parsed.items();
        let funcs = functions(&items);
        assert_eq!(
            funcs[0].parameters,
            vec!["self", "a", "b", "c", "d", "*args", "e", "**kwargs"]
        );
        assert!(funcs[0].has_return_annotation);
        assert_eq!(funcs[1].parameters, vec!["a", "/", "b", "*", "c"]);
        assert!(!funcs[1].has_return_annotation);
    }

    #[test]
    fn test_docstring_and_async_detection() {
        let source = indoc! {r#"
            async def fetch():
                """Fetch things."""
                return await thing()

            def plain():
                x = "not a docstring"
                return x
        "#};
        let parsed = parse_python(Path::new("m.py"), source).unwrap();
        let items = parsed.items();
        let funcs = functions(&items);
        assert!(funcs[0].is_async);
        assert!(funcs[0].has_docstring);
        assert!(!funcs[1].is_async);
        assert!(!funcs[1].has_docstring);
    }

    #[test]
    fn test_stub_bodies() {
        let source = indoc! {r#"
            def a():
                ...

            def b():
                """Docs only."""

            def c():
                raise NotImplementedError("later")

            def d():
                return 1
        "#};
        let parsed = parse_python(Path::new("m.py"), source).unwrap();
        let src = parsed.source().as_bytes();
        let items = parsed.items();
        let stubs: Vec<bool> = functions(&items)
            .iter()
            .map(|f| is_stub_body(f.body.unwrap(), src))
            .collect();
        assert_eq!(stubs, vec![true, true, true, false]);
    }

    #[test]
    fn test_multiline_statement_counts_once() {
        let source = indoc! {"
            def f():
                total = compute(
                    1,
                    2,
                )
                return total
        "};
        let parsed = parse_python(Path::new("m.py"), source).unwrap();
        let items = parsed.items();
        let funcs = functions(&items);
        assert_eq!(funcs[0].span, LineSpan::new(1, 6));
        assert_eq!(funcs[0].statement_lines, vec![1, 2, 6]);
    }
}
